//! Upward search for `.kubecontext` marker files.
//!
//! The walk is purely path based: it visits `start` and each of its
//! ancestors via [`Path::ancestors`], up to and including the filesystem
//! root. The process working directory is never changed.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, Result};

/// Name of the per-directory marker file.
pub const MARKER_FILE: &str = ".kubecontext";

/// Discover marker files from the current working directory upward.
///
/// See [`discover_from`] for ordering.
///
/// # Errors
///
/// Returns `CurrentDir` if the working directory cannot be determined,
/// or `Discovery` if a directory on the way up cannot be inspected.
pub fn discover() -> Result<Vec<PathBuf>> {
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    discover_from(&cwd)
}

/// Discover marker files from `start` upward.
///
/// Paths are returned outermost first (closest to the filesystem root
/// first, `start`'s own marker last), which is the order the loader
/// merges them in so that deeper directories win.
///
/// # Errors
///
/// Returns `Discovery` if any directory on the walk cannot be inspected.
/// There is no partial result.
pub fn discover_from(start: &Path) -> Result<Vec<PathBuf>> {
    let start = std::path::absolute(start).map_err(ConfigError::CurrentDir)?;
    let mut found = walk(&start, marker_in)?;
    found.reverse();
    Ok(found)
}

/// Visit `start` and its ancestors, nearest first, collecting what `probe`
/// reports for each directory.
fn walk<F>(start: &Path, mut probe: F) -> Result<Vec<PathBuf>>
where
    F: FnMut(&Path) -> Result<Option<PathBuf>>,
{
    let mut found = Vec::new();
    for dir in start.ancestors() {
        debug!("looking for {MARKER_FILE} in {}", dir.display());
        if let Some(marker) = probe(dir)? {
            debug!("found {}", marker.display());
            found.push(marker);
        }
    }
    Ok(found)
}

fn marker_in(dir: &Path) -> Result<Option<PathBuf>> {
    let inspect = |source| ConfigError::Discovery {
        dir: dir.to_path_buf(),
        source,
    };

    let meta = fs::metadata(dir).map_err(inspect)?;
    if !meta.is_dir() {
        return Err(inspect(std::io::Error::new(
            ErrorKind::NotADirectory,
            "not a directory",
        )));
    }

    let candidate = dir.join(MARKER_FILE);
    match fs::metadata(&candidate) {
        Ok(meta) if meta.is_file() => Ok(Some(candidate)),
        Ok(_) => {
            debug!("ignoring {}: not a regular file", candidate.display());
            Ok(None)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(inspect(e)),
    }
}
