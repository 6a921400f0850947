//! Handing control to the cluster tool.
//!
//! On Unix the launcher normally replaces its own process image with the
//! tool (`CommandExt::exec`), so the tool's exit code is the exit code of
//! the run and signals reach it directly.
//!
//! Elsewhere, and whenever a temporary kubeconfig must be cleaned up
//! afterwards, the tool is spawned as a child with inherited stdio instead;
//! the launcher waits and exits with the child's code. The only observable
//! difference is signal delivery: signals sent to the launcher's pid are
//! not forwarded to the child.

pub mod resolve;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use tracing::debug;

use crate::env::EnvOverlay;
use crate::error::{KubecontextError, Result};

pub use resolve::{command_name, resolve, search_path};

/// How control passes to the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Replace the current process image; never returns on success.
    Replace,
    /// Spawn a child, wait for it, return its exit code.
    Spawn,
}

/// A fully resolved launch: executable, arguments and environment.
#[derive(Debug)]
pub struct Launch {
    program: PathBuf,
    name: OsString,
    args: Vec<OsString>,
    env: EnvOverlay,
}

impl Launch {
    /// `name` is what the tool sees as `argv[0]`; `args` are forwarded
    /// unchanged.
    #[must_use]
    pub fn new(
        program: PathBuf,
        name: impl Into<OsString>,
        args: Vec<OsString>,
        env: EnvOverlay,
    ) -> Self {
        Self {
            program,
            name: name.into(),
            args,
            env,
        }
    }

    /// Build the command that would be executed.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        self.env.apply_to(&mut cmd);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(&self.name);
        }
        cmd
    }

    /// Hand control to the tool.
    ///
    /// Returns the exit code to terminate with. In `Replace` mode on Unix
    /// this only returns if the exec itself failed.
    ///
    /// # Errors
    ///
    /// Returns `Launch` if the process image cannot be replaced or the
    /// child cannot be spawned.
    pub fn run(self, mode: LaunchMode) -> Result<i32> {
        debug!(
            "executing {} with args: {:?}",
            self.program.display(),
            self.args
        );
        let mut cmd = self.command();
        match mode {
            LaunchMode::Replace => replace(&mut cmd, &self.program),
            LaunchMode::Spawn => spawn_and_wait(&mut cmd, &self.program),
        }
    }
}

#[cfg(unix)]
fn replace(cmd: &mut Command, program: &std::path::Path) -> Result<i32> {
    use std::os::unix::process::CommandExt;

    let source = cmd.exec();
    Err(KubecontextError::Launch {
        program: program.to_path_buf(),
        source,
    })
}

#[cfg(not(unix))]
fn replace(cmd: &mut Command, program: &std::path::Path) -> Result<i32> {
    spawn_and_wait(cmd, program)
}

fn spawn_and_wait(cmd: &mut Command, program: &std::path::Path) -> Result<i32> {
    let status = cmd.status().map_err(|source| KubecontextError::Launch {
        program: program.to_path_buf(),
        source,
    })?;
    Ok(exit_code(status))
}

/// Exit code to propagate for a finished child.
///
/// A child killed by signal `n` maps to `128 + n`, as shells report it.
#[must_use]
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Forwarded arguments: everything after `argv[0]`.
#[must_use]
pub fn forwarded_args<I>(argv: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    argv.into_iter().skip(1).collect()
}
