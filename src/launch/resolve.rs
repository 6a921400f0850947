//! Choosing and locating the command to launch.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use kubecontext_core::Settings;
use tracing::debug;

use crate::config::{COMMAND_NAME_VAR, DEFAULT_COMMAND, PATH_VAR, RuntimeOptions};
use crate::error::{KubecontextError, Result};

/// Pick the command name.
///
/// Precedence: the marker `command` key, then `K_COMMANDNAME` from the
/// merged `environment` map, then `K_COMMANDNAME` from the process
/// environment, then `kubectl`.
#[must_use]
pub fn command_name<'a>(settings: &'a Settings, options: &'a RuntimeOptions) -> &'a str {
    settings
        .command()
        .or_else(|| {
            settings
                .environment
                .get(COMMAND_NAME_VAR)
                .map(String::as_str)
                .filter(|v| !v.trim().is_empty())
        })
        .or(options.command_name.as_deref())
        .unwrap_or(DEFAULT_COMMAND)
}

/// The `PATH` the launched tool will see: a marker override if any,
/// otherwise the inherited one.
#[must_use]
pub fn search_path(settings: &Settings, options: &RuntimeOptions) -> Option<OsString> {
    settings
        .environment
        .get(PATH_VAR)
        .map(OsString::from)
        .or_else(|| options.search_path.clone())
}

/// Locate `name` as an executable.
///
/// Names containing a path separator are checked as given. Bare names are
/// looked up in each entry of `search_path`, in order. On Windows a name
/// without an extension also matches with each `PATHEXT` extension.
///
/// # Errors
///
/// Returns `CommandNotFound` if no executable file matches.
pub fn resolve(name: &str, search_path: Option<&OsStr>) -> Result<PathBuf> {
    let not_found = || KubecontextError::CommandNotFound {
        name: name.to_string(),
    };

    if name.is_empty() {
        return Err(not_found());
    }

    let as_path = Path::new(name);
    if as_path.components().count() > 1 {
        return lookup_names(as_path)
            .into_iter()
            .find(|candidate| is_executable(candidate))
            .ok_or_else(not_found);
    }

    let search_path = search_path.ok_or_else(not_found)?;
    for dir in std::env::split_paths(search_path) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        for candidate in lookup_names(&dir.join(name)) {
            if is_executable(&candidate) {
                debug!("resolved {name} to {}", candidate.display());
                return Ok(candidate);
            }
        }
    }
    Err(not_found())
}

#[cfg(windows)]
fn lookup_names(base: &Path) -> Vec<PathBuf> {
    with_extensions(base, std::env::var_os("PATHEXT").as_deref())
}

#[cfg(not(windows))]
fn lookup_names(base: &Path) -> Vec<PathBuf> {
    vec![base.to_path_buf()]
}

/// `base` itself, then `base` with each `;`-separated extension of
/// `pathext` appended (`.exe`, `.cmd`, `.bat` when unset). A `base` that
/// already has an extension is returned alone.
#[cfg_attr(not(windows), allow(dead_code))]
fn with_extensions(base: &Path, pathext: Option<&OsStr>) -> Vec<PathBuf> {
    const DEFAULT_PATHEXT: &str = ".exe;.cmd;.bat";

    let mut names = vec![base.to_path_buf()];
    if base.extension().is_some() {
        return names;
    }
    let pathext = pathext
        .and_then(OsStr::to_str)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(DEFAULT_PATHEXT);
    for ext in pathext.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let mut name = base.as_os_str().to_owned();
        name.push(ext);
        names.push(PathBuf::from(name));
    }
    names
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
