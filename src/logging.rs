//! Logging setup for `kubecontext`.
//!
//! Diagnostics go to stderr; stdout belongs to the launched tool.

use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::config::LogLevel;

static INIT: OnceLock<()> = OnceLock::new();

/// Install the global tracing subscriber at `level`.
///
/// Safe to call more than once; only the first call has any effect.
/// Failure to install (another subscriber already set) is ignored.
pub fn init_logging(level: LogLevel) {
    if INIT.get().is_some() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_max_level(level.as_tracing())
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
    let _ = INIT.set(());
}
