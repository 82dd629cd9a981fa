//! Interactive REPL (Read-Eval-Print Loop) for nscript statements.

use crate::ast::Item;
use crate::binder;
use crate::error::{Error, Result};
use crate::interpreter::Interpreter;
use crate::parser;
use crate::shell::Shell;
use std::io::{self, BufRead, Write};

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Start an interactive shell on stdin/stdout.
///
/// Every program name is callable (globals are enabled) and `shell` is the
/// shell slot, so `shell "ls | wc -l"` and `git status` both work.
///
/// # Errors
///
/// Returns `Err` only if the terminal itself cannot be read or written.
pub fn run_repl(shell: &Shell) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_repl_with(shell, stdin.lock(), stdout.lock())
}

/// The REPL loop over arbitrary input and output.
pub fn run_repl_with<R: BufRead, W: Write>(shell: &Shell, mut input: R, mut output: W) -> Result<()> {
    shell.use_globals();
    writeln!(output, "nscript {PKG_VERSION}")?;
    writeln!(output, "Type 'exit' or press Ctrl+D to quit\n")?;

    let bound = binder::bind_names(&["shell"], &[], shell)?;
    let interpreter = Interpreter::new(shell, &bound);

    loop {
        write!(output, "nscript> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF (Ctrl+D)
            writeln!(output, "\nGoodbye!")?;
            break;
        }

        let line = line.trim();
        if line == "exit" || line == "quit" {
            writeln!(output, "Goodbye!")?;
            break;
        }
        if line.is_empty() {
            continue;
        }

        if let Err(e) = eval_line(&interpreter, line) {
            eprintln!("Error: {e}");
        }
    }

    Ok(())
}

fn eval_line(interpreter: &Interpreter<'_, '_>, line: &str) -> Result<()> {
    let program = parser::parse_script(line, None)?;
    for item in program.items {
        match item {
            Item::Statement(statement) => interpreter.execute(std::slice::from_ref(&statement))?,
            Item::Function(_) => {
                return Err(Error::InvalidCall(
                    "functions can't be defined in the REPL; save them to a file and run it".to_string(),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_repl_runs_global_commands_until_exit() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("out.txt");
        let shell = Shell::with_program("sh", "-c");
        let input = format!(
            "echo one > {0}\n\nshell \"echo two >> {0}\"\nexit\necho never >> {0}\n",
            out.display()
        );
        let mut output = Vec::new();

        run_repl_with(&shell, input.as_bytes(), &mut output).unwrap();

        assert_eq!(fs::read_to_string(&out).unwrap(), "one\ntwo\n");
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("nscript>"));
        assert!(printed.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_repl_survives_errors_and_eof() {
        let shell = Shell::with_program("sh", "-c");
        let input = "\"unclosed\nfalse\nfunction(shell) {}\n";
        let mut output = Vec::new();

        run_repl_with(&shell, input.as_bytes(), &mut output).unwrap();

        assert!(String::from_utf8(output).unwrap().ends_with("\nGoodbye!\n"));
    }
}
