//! The `Shell` capability handed to every script as its first argument.
//!
//! It owns the process-wide knobs a script may touch (verbosity, working
//! directory) and knows how to run commands, either through the system shell
//! or directly through an [`Alias`].

use crate::config;
use crate::error::{Error, Result};
use std::cell::Cell;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Where a command's standard output goes instead of the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// `> file`: create or truncate.
    Write(PathBuf),
    /// `>> file`: create or append.
    Append(PathBuf),
}

impl Redirect {
    fn open(&self) -> Result<File> {
        let file = match self {
            Redirect::Write(path) => OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)?,
            Redirect::Append(path) => OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?,
        };
        Ok(file)
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Redirect::Write(path) => write!(f, "> {}", path.display()),
            Redirect::Append(path) => write!(f, ">> {}", path.display()),
        }
    }
}

pub struct Shell {
    verbose: Cell<bool>,
    globals: Cell<bool>,
    program: String,
    program_arg: &'static str,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    /// A shell using the configured system shell and verbosity.
    pub fn new() -> Self {
        let (program, program_arg) = config::shell_program();
        let shell = Self::with_program(program, program_arg);
        shell.set_verbose(config::verbose_from_env());
        shell
    }

    /// A shell running command lines through `program <program_arg> <line>`.
    pub fn with_program(program: impl Into<String>, program_arg: &'static str) -> Self {
        Self {
            verbose: Cell::new(false),
            globals: Cell::new(false),
            program: program.into(),
            program_arg,
        }
    }

    pub fn verbose(&self) -> bool {
        self.verbose.get()
    }

    pub fn set_verbose(&self, verbose: bool) {
        self.verbose.set(verbose);
    }

    /// Change the working directory of the whole process.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if `path` is not an existing directory.
    pub fn cd(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        if self.verbose() {
            eprintln!("$ cd {}", path.display());
        }
        std::env::set_current_dir(path)?;
        tracing::debug!(dir = %path.display(), "changed working directory");
        Ok(())
    }

    /// Let any callee name resolve to an alias, not only declared ones.
    pub fn use_globals(&self) {
        self.globals.set(true);
    }

    pub fn globals_enabled(&self) -> bool {
        self.globals.get()
    }

    /// Resolve `name` to a callable running the program of that name.
    pub fn alias(&self, name: &str) -> Alias {
        Alias {
            program: name.to_string(),
        }
    }

    /// Run a full command line through the system shell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandFailed`] if the command exits unsuccessfully.
    pub fn exec(&self, command_line: &str, redirect: Option<&Redirect>) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.arg(self.program_arg).arg(command_line);
        self.run(cmd, command_line.to_string(), redirect)
    }

    fn run(&self, mut cmd: Command, shown: String, redirect: Option<&Redirect>) -> Result<()> {
        if self.verbose() {
            match redirect {
                Some(r) => eprintln!("$ {shown} {r}"),
                None => eprintln!("$ {shown}"),
            }
        }

        let stdout = match redirect {
            Some(r) => Stdio::from(r.open()?),
            None => Stdio::inherit(),
        };
        tracing::debug!(command = %shown, "spawning");

        let status = match cmd.stdout(stdout).stderr(Stdio::inherit()).status() {
            Ok(status) => status,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::CommandFailed {
                    command: shown,
                    status: "command not found".to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if status.success() {
            Ok(())
        } else {
            Err(Error::CommandFailed {
                command: shown,
                status: status.to_string(),
            })
        }
    }
}

// Each script run has exactly one shell, so identity is equality.
impl PartialEq for Shell {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("verbose", &self.verbose())
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

/// A command bound to a script parameter, e.g. `echo` or `cp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    program: String,
}

impl Alias {
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the program with `args`, optionally redirecting its output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandFailed`] if the program is missing or exits
    /// unsuccessfully.
    pub fn call(&self, shell: &Shell, args: &[String], redirect: Option<&Redirect>) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        let shown = std::iter::once(self.program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        shell.run(cmd, shown, redirect)
    }

    /// `program args... > file`
    pub fn write_to(&self, shell: &Shell, args: &[String], file: impl Into<PathBuf>) -> Result<()> {
        self.call(shell, args, Some(&Redirect::Write(file.into())))
    }

    /// `program args... >> file`
    pub fn append_to(&self, shell: &Shell, args: &[String], file: impl Into<PathBuf>) -> Result<()> {
        self.call(shell, args, Some(&Redirect::Append(file.into())))
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sh() -> Shell {
        Shell::with_program("sh", "-c")
    }

    #[test]
    fn test_alias_resolves_program_name() {
        assert_eq!(sh().alias("echo").program(), "echo");
    }

    #[test]
    fn test_alias_write_and_append() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("out.txt");
        let shell = sh();
        let echo = shell.alias("echo");

        echo.write_to(&shell, &["hello".to_string()], &out).unwrap();
        echo.append_to(&shell, &["world".to_string()], &out).unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "hello\nworld\n");
    }

    #[test]
    fn test_exec_runs_through_system_shell() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("out.txt");
        let shell = sh();

        shell
            .exec("printf '%s-%s' a b", Some(&Redirect::Write(out.clone())))
            .unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "a-b");
    }

    #[test]
    fn test_failing_command_is_an_error() {
        let err = sh().exec("exit 3", None).unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
    }

    #[test]
    fn test_failure_names_the_command_line() {
        let shell = sh();
        shell.set_verbose(true);
        let err = shell
            .alias("false")
            .call(&shell, &["--quietly".to_string()], None)
            .unwrap_err();
        match err {
            Error::CommandFailed { command, .. } => assert_eq!(command, "false --quietly"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_program_is_command_failed() {
        let shell = sh();
        let err = shell
            .alias("nscript-definitely-not-a-program")
            .call(&shell, &[], None)
            .unwrap_err();
        assert!(
            matches!(err, Error::CommandFailed { ref status, .. } if status == "command not found")
        );
    }

    #[test]
    fn test_cd_to_missing_directory_fails() {
        let err = sh().cd("/definitely/not/here").unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_verbose_toggle() {
        let shell = sh();
        assert!(!shell.verbose());
        shell.set_verbose(true);
        assert!(shell.verbose());
    }
}
