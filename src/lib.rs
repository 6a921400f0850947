//! `kubecontext` - directory-scoped defaults for kubectl
//!
//! The `k` binary looks for `.kubecontext` files from the working directory
//! up to `/`, applies the merged settings (kubeconfig, context, namespace,
//! environment) and then becomes `kubectl` with the original arguments.
//!
//! # Architecture
//!
//! - [`kubecontext_core`] - marker discovery, loading and merging
//! - [`config`] - runtime options from `K_*` variables
//! - [`logging`] - tracing setup
//! - [`env`] - environment overrides carried to child processes
//! - [`tool`] - the cluster tool seam
//! - [`apply`] - applying merged settings
//! - [`launch`] - command resolution and process replacement
//! - [`error`] - error types

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod apply;
pub mod config;
pub mod env;
pub mod error;
pub mod launch;
pub mod logging;
pub mod tool;

use std::ffi::OsString;

use kubecontext_core::{discover, load_layers};
use tracing::debug;

pub use error::{KubecontextError, Result};

use crate::config::RuntimeOptions;
use crate::launch::{Launch, LaunchMode};
use crate::tool::Kubectl;

/// Run the launcher.
///
/// This is the main entry point called from `main()`. On Unix, without a
/// kubeconfig snapshot, a successful run never returns: the process becomes
/// the cluster tool.
///
/// # Errors
///
/// Returns the first error from discovery, loading, applying or launching.
pub fn run() -> Result<i32> {
    let options = RuntimeOptions::from_env();
    logging::init_logging(options.log_level);
    run_with(&options, launch::forwarded_args(std::env::args_os()))
}

/// Run the pipeline with explicit options and forwarded arguments.
///
/// # Errors
///
/// Returns the first error from discovery, loading, applying or launching.
pub fn run_with(options: &RuntimeOptions, args: Vec<OsString>) -> Result<i32> {
    let markers = discover()?;
    let settings = load_layers(&markers)?;
    debug!("effective config: {settings:?}");

    // Resolve before applying so a missing tool aborts before any invocation.
    let name = launch::command_name(&settings, options);
    let search_path = launch::search_path(&settings, options);
    let program = launch::resolve(name, search_path.as_deref())?;

    let mut tool = Kubectl::new(&program);
    let applied = apply::apply(&settings, &mut tool, options.snapshot_kubeconfig)?;

    let mode = if applied.snapshot.is_some() {
        LaunchMode::Spawn
    } else {
        LaunchMode::Replace
    };
    let code = Launch::new(program, name, args, applied.env).run(mode)?;

    if let Some(snapshot) = applied.snapshot {
        debug!("removing {}", snapshot.path().display());
        drop(snapshot);
    }
    Ok(code)
}
