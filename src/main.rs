//! # nscript
//!
//! Run shell-automation scripts written as a single function.
//!
//! ## Usage
//!
//! - Run a script: `nscript deploy.ns prod --force`
//! - Create a starter script: `nscript --touch hello.ns`
//! - Make a script executable: `nscript -x hello.ns`
//! - Inspect a script's parameters: `nscript --inspect deploy.ns`
//! - Interactive shell: `nscript`

/// Entry point for the CLI tool.
fn main() {
    nscript::cli::run_cli();
}
