//! Applying merged settings before launch.
//!
//! Order is fixed: kubeconfig, optional snapshot, context, namespace,
//! environment. The namespace step edits the *current* context, so the
//! context switch has to land first. Nothing is rolled back when a later
//! step fails.

use kubecontext_core::Settings;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::KUBECONFIG_VAR;
use crate::env::EnvOverlay;
use crate::error::{KubecontextError, Result};
use crate::tool::ClusterTool;

/// State produced by [`apply`] and consumed by the launcher.
#[derive(Debug, Default)]
pub struct Applied {
    /// Overrides for the launched process.
    pub env: EnvOverlay,
    /// Temporary kubeconfig; deleted when dropped.
    pub snapshot: Option<NamedTempFile>,
}

/// Apply `settings` through `tool`.
///
/// With `snapshot` set and a context or namespace to change, the merged
/// kubeconfig is first copied into a temporary file and `KUBECONFIG` is
/// pointed at it, so the user's own kubeconfig is left alone.
///
/// # Errors
///
/// Returns the first failing step's error: `InvalidEnvVar`, `Snapshot`,
/// `SetContext`, `SetNamespace` or `ToolInvocation`.
pub fn apply<T: ClusterTool>(settings: &Settings, tool: &mut T, snapshot: bool) -> Result<Applied> {
    let mut applied = Applied::default();

    if let Some(kubeconfig) = settings.kubeconfig() {
        info!("setting {KUBECONFIG_VAR} to {}", kubeconfig.display());
        applied.env.set(KUBECONFIG_VAR, kubeconfig)?;
    } else {
        debug!("config has no kubeconfig");
    }

    if snapshot && (settings.context().is_some() || settings.namespace().is_some()) {
        applied.snapshot = Some(snapshot_kubeconfig(tool, &mut applied.env)?);
    }

    if let Some(context) = settings.context() {
        info!("setting context to {context}");
        tool.use_context(context, &applied.env)?;
    } else {
        debug!("config has no context");
    }

    if let Some(namespace) = settings.namespace() {
        info!("setting namespace to {namespace}");
        tool.set_namespace(namespace, &applied.env)?;
    } else {
        debug!("config has no namespace");
    }

    if settings.environment.is_empty() {
        debug!("config has no environment variables");
    }
    for (name, value) in &settings.environment {
        let replaced = applied.env.get(KUBECONFIG_VAR).filter(|_| name == KUBECONFIG_VAR);
        if let Some(previous) = replaced {
            warn!(
                "environment variable {KUBECONFIG_VAR}={value} overrides {}; \
                 context and namespace were applied to the latter",
                previous.to_string_lossy()
            );
        }
        info!("setting environment variable {name} to {value}");
        applied.env.set(name, value)?;
    }

    Ok(applied)
}

fn snapshot_kubeconfig<T: ClusterTool>(tool: &mut T, env: &mut EnvOverlay) -> Result<NamedTempFile> {
    let file = tempfile::Builder::new()
        .prefix("kubeconfig")
        .tempfile()
        .map_err(|e| KubecontextError::Snapshot(e.to_string()))?;
    debug!("writing temporary kubeconfig to {}", file.path().display());

    let out = file
        .as_file()
        .try_clone()
        .map_err(|e| KubecontextError::Snapshot(e.to_string()))?;
    tool.view_config(env, out)?;

    env.set(KUBECONFIG_VAR, file.path())?;
    Ok(file)
}
