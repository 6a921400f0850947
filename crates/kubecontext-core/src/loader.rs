//! Reading marker files and folding them into one [`Settings`].

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::settings::Settings;

/// Read and parse a single marker file.
///
/// An empty or comment-only file yields default settings. A relative
/// `kubeconfig` is anchored to the directory containing `path`.
///
/// # Errors
///
/// Returns `ReadMarker` if the file cannot be read, or `ParseMarker` if it
/// is not a valid settings document.
pub fn load_marker(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadMarker {
        path: path.to_path_buf(),
        source,
    })?;

    let mut settings = if contents.trim().is_empty() {
        Settings::default()
    } else {
        serde_yaml::from_str::<Option<Settings>>(&contents)
            .map_err(|source| ConfigError::ParseMarker {
                path: path.to_path_buf(),
                source,
            })?
            .unwrap_or_default()
    };

    if let Some(dir) = path.parent() {
        settings.anchor_paths(dir);
    }
    debug!("{} has config: {settings:?}", path.display());
    Ok(settings)
}

/// Load every marker in `paths`, outermost first, and merge them.
///
/// Later paths take precedence. Loading stops at the first failure.
///
/// # Errors
///
/// Propagates the first `ReadMarker` or `ParseMarker` error.
pub fn load_layers<P: AsRef<Path>>(paths: &[P]) -> Result<Settings> {
    let layers = paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            info!("processing configuration from {}", path.display());
            load_marker(path)
        })
        .collect::<Result<Vec<_>>>()?;
    let merged = Settings::merged(layers);
    debug!("merged config is: {merged:?}");
    Ok(merged)
}
