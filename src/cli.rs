//! CLI module containing the main entry point logic.

use crate::error::{Error, Result};
use crate::shell::Shell;
use crate::{executor, repl, scaffold};
use clap::Parser as ClapParser;
use std::path::PathBuf;
use std::time::Instant;

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI arguments for nscript.
#[derive(ClapParser, Debug)]
#[command(name = "nscript")]
#[command(version = PKG_VERSION)]
#[command(about = "Shell scripts as plain functions", long_about = None)]
#[command(override_usage = "nscript [OPTIONS] [SCRIPT] [ARGS]...")]
struct Cli {
    /// Script file to run, followed by the arguments passed to it.
    /// Everything after the script belongs to the script, nscript's own
    /// options included.
    #[arg(
        value_name = "SCRIPT [ARGS]",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<String>,

    /// Change the working directory
    #[arg(short = 'C', long, value_name = "PATH")]
    chdir: Option<PathBuf>,

    /// Start in verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Create a new nscript file at the specified location and make it executable
    #[arg(long, value_name = "PATH")]
    touch: Option<PathBuf>,

    /// Make sure the nscript file at the specified location is executable
    #[arg(short = 'x', value_name = "PATH")]
    executable: Option<PathBuf>,

    /// With --touch or -x: point the shebang at this binary instead of the nscript on PATH
    #[arg(long)]
    local: bool,

    /// Print the parameter binding of SCRIPT as JSON instead of running it
    #[arg(long)]
    inspect: bool,
}

impl Cli {
    /// Split the trailing command into the script path and its arguments.
    fn script_and_args(&self) -> Option<(PathBuf, &[String])> {
        let (script, args) = self.command.split_first()?;
        Some((PathBuf::from(script), args))
    }
}

/// Main CLI logic.
///
/// Parses the process arguments, runs the requested action and exits with
/// status 1 on any error.
pub fn run_cli() {
    let started = Instant::now();
    let cli = Cli::parse();
    crate::init_tracing();

    if let Err(e) = run(cli, started) {
        crate::fatal_error(&format!("Error: {e}"));
    }
}

fn run(cli: Cli, started: Instant) -> Result<()> {
    tracing::debug!(?cli, "parsed command line");
    let shell = Shell::new();

    if let Some(ref dir) = cli.chdir {
        shell.cd(dir)?;
    }
    if cli.verbose {
        shell.set_verbose(true);
    }

    // Handle --touch
    if let Some(ref path) = cli.touch {
        return scaffold::touch_script(path, cli.local, &shell);
    }

    // Handle -x
    if let Some(ref path) = cli.executable {
        return scaffold::make_executable(path, cli.local, &shell);
    }

    match cli.script_and_args() {
        Some((script, _)) if cli.inspect => {
            println!("{}", executor::inspect_json(&script)?);
            Ok(())
        }
        Some((script, args)) => executor::run_script_file(&script, args, &shell, started),
        None if cli.inspect => Err(Error::InvalidCall(
            "--inspect needs a script file".to_string(),
        )),
        None => {
            // REPL mode: interactive shell
            repl::run_repl(&shell)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("nscript").chain(args.iter().copied())).unwrap()
    }

    fn script_and_args(cli: &Cli) -> (PathBuf, Vec<String>) {
        let (script, args) = cli.script_and_args().unwrap();
        (script, args.to_vec())
    }

    #[test]
    fn test_script_args_keep_hyphens() {
        let cli = parse(&["deploy.ns", "prod", "--force", "--out=x"]);
        let (script, args) = script_and_args(&cli);
        assert_eq!(script, PathBuf::from("deploy.ns"));
        assert_eq!(args, vec!["prod", "--force", "--out=x"]);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_own_options_after_script_belong_to_script() {
        let cli = parse(&["deploy.ns", "--verbose", "-x", "other.txt", "--inspect", "-C", "/"]);
        let (script, args) = script_and_args(&cli);
        assert_eq!(script, PathBuf::from("deploy.ns"));
        assert_eq!(args, vec!["--verbose", "-x", "other.txt", "--inspect", "-C", "/"]);
        assert!(!cli.verbose);
        assert!(!cli.inspect);
        assert!(cli.executable.is_none());
        assert!(cli.chdir.is_none());
    }

    #[test]
    fn test_options_before_script() {
        let cli = parse(&["-v", "-C", "/tmp", "build.ns", "a"]);
        assert!(cli.verbose);
        assert_eq!(cli.chdir, Some(PathBuf::from("/tmp")));
        let (script, args) = script_and_args(&cli);
        assert_eq!(script, PathBuf::from("build.ns"));
        assert_eq!(args, vec!["a"]);
    }

    #[test]
    fn test_scaffolding_options() {
        let cli = parse(&["--touch", "new.ns", "--local"]);
        assert_eq!(cli.touch, Some(PathBuf::from("new.ns")));
        assert!(cli.local);

        let cli = parse(&["-x", "old.ns"]);
        assert_eq!(cli.executable, Some(PathBuf::from("old.ns")));
        assert!(cli.script_and_args().is_none());
    }

    #[test]
    fn test_no_arguments_means_repl() {
        let cli = parse(&[]);
        assert!(cli.script_and_args().is_none());
        assert!(cli.touch.is_none());
        assert!(cli.executable.is_none());
    }

    #[test]
    fn test_inspect_without_script_is_an_error() {
        let err = run(parse(&["--inspect"]), Instant::now()).unwrap_err();
        assert!(matches!(err, Error::InvalidCall(_)));
    }
}
