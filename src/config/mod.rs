//! Runtime options for `kubecontext`.
//!
//! Options come only from the process environment; the launcher has no
//! flags of its own because every argument belongs to the launched tool.
//!
//! - `K_LOGLEVEL` - `debug` or `info`; anything else logs warnings and up
//! - `K_COMMANDNAME` - command to run instead of `kubectl`
//! - `K_SNAPSHOT` - work on a temporary copy of the kubeconfig

use std::ffi::OsString;

/// Log verbosity selector.
pub const LOG_LEVEL_VAR: &str = "K_LOGLEVEL";
/// Command-name override.
pub const COMMAND_NAME_VAR: &str = "K_COMMANDNAME";
/// Kubeconfig snapshot toggle.
pub const SNAPSHOT_VAR: &str = "K_SNAPSHOT";
/// Credentials-file location understood by kubectl.
pub const KUBECONFIG_VAR: &str = "KUBECONFIG";
/// Executable search path.
pub const PATH_VAR: &str = "PATH";
/// Tool launched when nothing overrides it.
pub const DEFAULT_COMMAND: &str = "kubectl";

/// Verbosity of diagnostics written to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
}

impl LogLevel {
    /// Parse a `K_LOGLEVEL` value. Unknown values fall back to `Warn`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Self::Debug,
            "info" => Self::Info,
            _ => Self::Warn,
        }
    }

    #[must_use]
    pub const fn as_tracing(self) -> tracing::Level {
        match self {
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
        }
    }
}

/// Options read from the environment once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub log_level: LogLevel,
    /// Value of `K_COMMANDNAME`, if set and non-empty.
    pub command_name: Option<String>,
    /// Work on a temporary kubeconfig instead of the user's own.
    pub snapshot_kubeconfig: bool,
    /// Inherited `PATH`, used when no marker file overrides it.
    pub search_path: Option<OsString>,
}

impl RuntimeOptions {
    /// Read options from the real process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Read options through `lookup`, which maps a variable name to its value.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let text = |name: &str| lookup(name).map(|v| v.to_string_lossy().into_owned());

        Self {
            log_level: text(LOG_LEVEL_VAR)
                .map(|v| LogLevel::parse(&v))
                .unwrap_or_default(),
            command_name: text(COMMAND_NAME_VAR).filter(|v| !v.trim().is_empty()),
            snapshot_kubeconfig: text(SNAPSHOT_VAR).is_some_and(|v| is_truthy(&v)),
            search_path: lookup(PATH_VAR),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
