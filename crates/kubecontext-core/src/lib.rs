//! `kubecontext-core` — directory-scoped kubectl settings.
//!
//! Finds `.kubecontext` files from a directory up to the filesystem root
//! and merges them into one [`Settings`] record. Nothing here runs
//! subprocesses or touches the process environment.
//!
//! # Quick Start
//!
//! ```no_run
//! use kubecontext_core::{discover, load_layers};
//!
//! let markers = discover().unwrap();
//! let settings = load_layers(&markers).unwrap();
//! if let Some(ns) = settings.namespace() {
//!     println!("namespace: {ns}");
//! }
//! ```

pub mod discovery;
pub mod error;
pub mod loader;
pub mod settings;

pub use discovery::{MARKER_FILE, discover, discover_from};
pub use error::{ConfigError, Result};
pub use loader::{load_layers, load_marker};
pub use settings::Settings;
