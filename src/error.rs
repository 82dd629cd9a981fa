//! Error type shared by the binder, the script runner and the scaffolding commands.

use crate::parser::ParseError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The script file did not contain exactly one function.
    #[error(
        "Not a function: '{0}', the script file should be in the form 'function(shell) {{ ... }}'"
    )]
    NotAFunction(String),

    #[error(
        "Invalid parameter name in nscript function: '{0}', please check the nscript docs for valid parameter names"
    )]
    InvalidParameterName(String),

    #[error("Invalid option '{option}'. Valid options are: {}", .valid.join(", "))]
    UnknownOption { option: String, valid: Vec<String> },

    #[error(
        "Missing arguments. Expected at least {expected} argument(s), found: '{}'",
        .found.join(" ")
    )]
    MissingArguments { expected: usize, found: Vec<String> },

    #[error("File '{}' already exists", .0.display())]
    FileExists(PathBuf),

    #[error("File doesn't exist: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A callee in a script body is neither the shell slot nor a declared alias.
    #[error("'{0}' is not a parameter of this script; declare it in the function signature")]
    UnboundName(String),

    /// A call the callee does not support, e.g. an unknown shell method.
    #[error("{0}")]
    InvalidCall(String),

    #[error("Command failed with {status}: {command}")]
    CommandFailed { command: String, status: String },

    /// Adding the shebang failed after the script was overwritten.
    #[error("{source}. The original script is kept in '{}'", .backup.display())]
    BackupKept {
        backup: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("{0}")]
    Parse(Box<ParseError>),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_option_lists_valid_options() {
        let err = Error::UnknownOption {
            option: "-p".to_string(),
            valid: vec!["--out [value]".to_string(), "--force".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Invalid option '-p'. Valid options are: --out [value], --force"
        );
    }

    #[test]
    fn test_missing_arguments_message() {
        let err = Error::MissingArguments {
            expected: 2,
            found: vec!["a".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing arguments. Expected at least 2 argument(s), found: 'a'"
        );
    }

    #[test]
    fn test_backup_kept_names_the_backup() {
        let err = Error::BackupKept {
            backup: PathBuf::from("tool.ns.bak"),
            source: Box::new(Error::CommandFailed {
                command: "cat tool.ns.bak".to_string(),
                status: "exit status: 1".to_string(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "Command failed with exit status: 1: cat tool.ns.bak. The original script is kept in 'tool.ns.bak'"
        );
    }
}
