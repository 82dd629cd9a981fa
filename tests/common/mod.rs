//! Common test helpers shared across integration tests

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)] // Not all helpers are used by every test file

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Package version for testing --version flag
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper to get the compiled binary path
pub fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_nscript"))
}

/// Helper to create a temporary directory for tests
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Helper to write a script file into a directory
pub fn write_script(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Helper to create a Command isolated from the caller's nscript settings
pub fn test_command(binary: &Path) -> Command {
    let mut cmd = Command::new(binary);
    cmd.env_remove("NSCRIPT_VERBOSE")
        .env_remove("NSCRIPT_LOG")
        .env_remove("RUST_LOG")
        .env("NSCRIPT_SHELL", "sh");
    cmd
}

/// Run a script file with arguments from inside `dir`
pub fn run_script(dir: &Path, script: &Path, args: &[&str]) -> Output {
    test_command(&get_binary_path())
        .arg(script)
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute command")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
