//! The external cluster tool as seen by the applier.
//!
//! Only exit statuses are inspected; output is never parsed.

use std::fs::File;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::env::EnvOverlay;
use crate::error::{KubecontextError, Result};

/// Operations the applier performs against the cluster tool.
pub trait ClusterTool {
    /// Make `context` the current context.
    ///
    /// # Errors
    ///
    /// Returns `SetContext` on a non-zero exit, `ToolInvocation` if the tool
    /// cannot be started.
    fn use_context(&mut self, context: &str, env: &EnvOverlay) -> Result<()>;

    /// Set the namespace of the current context.
    ///
    /// # Errors
    ///
    /// Returns `SetNamespace` on a non-zero exit, `ToolInvocation` if the
    /// tool cannot be started.
    fn set_namespace(&mut self, namespace: &str, env: &EnvOverlay) -> Result<()>;

    /// Write the flattened, merged kubeconfig view into `out`.
    ///
    /// Must not return before the tool has exited and all of its output
    /// has reached `out`.
    ///
    /// # Errors
    ///
    /// Returns `Snapshot` on a non-zero exit, `ToolInvocation` if the tool
    /// cannot be started.
    fn view_config(&mut self, env: &EnvOverlay, out: File) -> Result<()>;
}

/// `kubectl` (or a compatible replacement such as `oc`) run as a child
/// process.
#[derive(Debug, Clone)]
pub struct Kubectl {
    program: PathBuf,
}

impl Kubectl {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str], env: &EnvOverlay, stdout: Stdio) -> Result<ExitStatus> {
        debug!("running {} {}", self.program.display(), args.join(" "));
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(Stdio::inherit());
        env.apply_to(&mut cmd);
        cmd.status().map_err(|source| KubecontextError::ToolInvocation {
            program: self.program.clone(),
            source,
        })
    }
}

impl ClusterTool for Kubectl {
    fn use_context(&mut self, context: &str, env: &EnvOverlay) -> Result<()> {
        let status = self.run(&["config", "use-context", context], env, Stdio::null())?;
        if status.success() {
            Ok(())
        } else {
            Err(KubecontextError::SetContext {
                context: context.to_string(),
                status,
            })
        }
    }

    fn set_namespace(&mut self, namespace: &str, env: &EnvOverlay) -> Result<()> {
        let status = self.run(
            &["config", "set-context", "--current", "--namespace", namespace],
            env,
            Stdio::null(),
        )?;
        if status.success() {
            Ok(())
        } else {
            Err(KubecontextError::SetNamespace {
                namespace: namespace.to_string(),
                status,
            })
        }
    }

    fn view_config(&mut self, env: &EnvOverlay, out: File) -> Result<()> {
        let status = self.run(
            &["config", "view", "--flatten", "--merge"],
            env,
            Stdio::from(out),
        )?;
        if status.success() {
            Ok(())
        } else {
            Err(KubecontextError::Snapshot(format!(
                "{} config view exited with {status}",
                self.program.display()
            )))
        }
    }
}
