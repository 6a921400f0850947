//! `kubecontext` (k) - directory-scoped defaults for kubectl
//!
//! Applies the settings from `.kubecontext` files found above the working
//! directory, then runs kubectl with the given arguments.

use kubecontext::run;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
