//! Environment overrides carried through the pipeline.
//!
//! [`EnvOverlay`] holds the variables the launcher wants to change. It is
//! layered over the inherited environment of every child process and of the
//! final launch via [`Command::envs`]; the launcher's own environment is
//! never modified.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::process::Command;

use crate::error::{KubecontextError, Result};

/// Ordered set of environment-variable overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay {
    vars: BTreeMap<String, OsString>,
}

impl EnvOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any earlier override.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEnvVar` if `name` is empty or contains `=` or NUL,
    /// or if `value` contains NUL. Such variables cannot be passed to a
    /// child process.
    pub fn set(&mut self, name: &str, value: impl Into<OsString>) -> Result<()> {
        let value = value.into();
        if name.is_empty() {
            return Err(KubecontextError::invalid_env_var(name, "empty name"));
        }
        if name.contains('=') {
            return Err(KubecontextError::invalid_env_var(name, "name contains '='"));
        }
        if name.contains('\0') {
            return Err(KubecontextError::invalid_env_var(name, "name contains NUL"));
        }
        if value.as_encoded_bytes().contains(&0) {
            return Err(KubecontextError::invalid_env_var(name, "value contains NUL"));
        }
        self.vars.insert(name.to_string(), value);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OsStr> {
        self.vars.get(name).map(OsString::as_os_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_os_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Layer these overrides onto `cmd`'s inherited environment.
    pub fn apply_to(&self, cmd: &mut Command) {
        cmd.envs(self.iter());
    }
}
