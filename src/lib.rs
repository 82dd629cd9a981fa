//! # nscript
//!
//! Shell scripts written as a single function whose parameter names say how
//! command-line arguments are bound:
//!
//! ```text
//! #!/usr/bin/env nscript
//! function(shell, echo, cp, $0, $$dest, $force, $args) {
//!     echo "copying $0 to $$dest"
//!     cp $0 $$dest
//! }
//! ```
//!
//! Set `NSCRIPT_LOG=debug` (or `RUST_LOG`) to trace binding and command
//! execution on stderr.

pub mod ast;
pub mod binder;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod interpreter;
pub mod params;
pub mod parser;
pub mod repl;
pub mod scaffold;
pub mod shell;

pub use binder::{BoundArguments, BoundValue, bind, bind_names};
pub use error::{Error, Result};
pub use params::{ParamKind, ParamSpec};
pub use shell::{Alias, Shell};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Only installs a subscriber when
/// `NSCRIPT_LOG` or `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        if let Some(directives) = config::log_filter() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(EnvFilter::new(directives))
                .init();
        }
    });
}

/// Print an error message and exit with code 1.
pub fn fatal_error(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
