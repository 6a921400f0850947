//! Error types for `kubecontext`.
//!
//! Every stage of the pipeline returns these; only `main` turns them into
//! an exit status.

use std::path::PathBuf;
use std::process::ExitStatus;

use kubecontext_core::ConfigError;
use thiserror::Error;

/// Primary error type for the launcher.
#[derive(Error, Debug)]
pub enum KubecontextError {
    // === Discovery / Loading ===
    /// Marker discovery or loading failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    // === Applying ===
    /// `config use-context` exited unsuccessfully.
    #[error("apply: failed to set context {context}: {status}")]
    SetContext { context: String, status: ExitStatus },

    /// `config set-context --current --namespace` exited unsuccessfully.
    #[error("apply: failed to set namespace {namespace}: {status}")]
    SetNamespace {
        namespace: String,
        status: ExitStatus,
    },

    /// The cluster tool could not be started at all.
    #[error("apply: failed to run {}: {source}", program.display())]
    ToolInvocation {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An environment variable cannot be represented in a process environment.
    #[error("apply: failed to set environment variable {name:?}: {reason}")]
    InvalidEnvVar { name: String, reason: &'static str },

    /// Writing the temporary kubeconfig snapshot failed.
    #[error("apply: failed to snapshot kubeconfig: {0}")]
    Snapshot(String),

    // === Launching ===
    /// The command to launch is not on the search path.
    #[error("launch: command not found: {name}")]
    CommandNotFound { name: String },

    /// Replacing or spawning the process failed.
    #[error("launch: failed to execute {}: {source}", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl KubecontextError {
    #[must_use]
    pub fn invalid_env_var(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            reason,
        }
    }
}

/// Result type using `KubecontextError`.
pub type Result<T> = std::result::Result<T, KubecontextError>;
