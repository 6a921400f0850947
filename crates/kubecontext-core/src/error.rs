//! Error types for `kubecontext-core`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while discovering and loading `.kubecontext` files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The working directory could not be determined.
    #[error("discovery: cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    /// A directory on the walk could not be inspected.
    #[error("discovery: cannot inspect {}: {source}", dir.display())]
    Discovery {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A marker file was found but could not be read.
    #[error("load: cannot read {}: {source}", path.display())]
    ReadMarker {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A marker file contains malformed YAML or wrongly typed values.
    #[error("load: invalid configuration in {}: {source}", path.display())]
    ParseMarker {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ConfigError {
    /// Path of the marker file or directory this error concerns, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::CurrentDir(_) => None,
            Self::Discovery { dir, .. } => Some(dir),
            Self::ReadMarker { path, .. } | Self::ParseMarker { path, .. } => Some(path),
        }
    }
}

/// Result type using `ConfigError`.
pub type Result<T> = std::result::Result<T, ConfigError>;
