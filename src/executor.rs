//! Script loading and the run lifecycle: load, bind, run, report.

use crate::ast::{FunctionDef, Item, Program};
use crate::binder::{self, BoundArguments};
use crate::error::{Error, Result};
use crate::interpreter::Interpreter;
use crate::params::{self, ParamSpec};
use crate::shell::Shell;
use crate::{config, parser};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Read and parse a script file, returning its single function.
///
/// # Errors
///
/// - [`Error::FileNotFound`] if `path` is not a file
/// - [`Error::Parse`] on a syntax error
/// - [`Error::NotAFunction`] unless the file holds exactly one function and
///   nothing else
pub fn load_script(path: &Path) -> Result<FunctionDef> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let source = fs::read_to_string(path)?;
    let label = path.display().to_string();
    let program = parser::parse_script(&source, Some(&label))?;
    single_function(program, &label)
}

fn single_function(program: Program, label: &str) -> Result<FunctionDef> {
    let mut functions = Vec::new();
    for item in program.items {
        match item {
            Item::Function(f) => functions.push(f),
            Item::Statement(_) => return Err(Error::NotAFunction(label.to_string())),
        }
    }
    match <[FunctionDef; 1]>::try_from(functions) {
        Ok([function]) => Ok(function),
        Err(_) => Err(Error::NotAFunction(label.to_string())),
    }
}

/// Bind `args` to a parsed function and run its body.
///
/// # Errors
///
/// Fails on invalid parameter names, binding errors, or the first failing
/// statement.
pub fn run_function(function: &FunctionDef, args: &[String], shell: &Shell) -> Result<()> {
    let specs = params::classify_all(&function.params)?;
    let bound = binder::bind(&specs, args, shell)?;
    tracing::debug!(name = ?function.name, statements = function.body.len(), "running script body");
    Interpreter::new(shell, &bound).execute(&function.body)
}

/// Bind `args` to `param_names` and hand the result to a Rust closure.
///
/// This is the embedding entry point: the closure plays the part of a script
/// body, with the bound values (shell first, then aliases, options, flags and
/// positionals) in declaration order.
///
/// # Errors
///
/// Fails if binding fails, or with whatever the closure returns.
pub fn run_with<S, F>(param_names: &[S], args: &[String], shell: &Shell, body: F) -> Result<()>
where
    S: AsRef<str>,
    F: FnOnce(&BoundArguments<'_>) -> Result<()>,
{
    let bound = binder::bind_names(param_names, args, shell)?;
    body(&bound)
}

/// Run a script file with the arguments that followed it on the command line.
///
/// In verbose mode the run is announced up front and the time since
/// `started` is reported once the script has finished.
///
/// # Errors
///
/// See [`load_script`] and [`run_function`].
pub fn run_script_file(path: &Path, args: &[String], shell: &Shell, started: Instant) -> Result<()> {
    let path = config::resolve_script_path(path);
    if shell.verbose() {
        println!("Starting nscript {} {}", path.display(), args.join(" "));
    }

    let function = load_script(&path)?;
    run_function(&function, args, shell)?;

    if shell.verbose() {
        println!(
            "Finished in {:.3} seconds",
            started.elapsed().as_secs_f64()
        );
    }
    Ok(())
}

/// The binding interface of a script, as printed by `--inspect`.
#[derive(Debug, Serialize)]
pub struct ScriptSignature {
    pub script: PathBuf,
    pub name: Option<String>,
    pub params: Vec<ParamSpec>,
}

/// Describe a script's parameters without running it.
///
/// # Errors
///
/// See [`load_script`]; also fails on invalid parameter names.
pub fn inspect(path: &Path) -> Result<ScriptSignature> {
    let path = config::resolve_script_path(path);
    let function = load_script(&path)?;
    Ok(ScriptSignature {
        params: params::classify_all(&function.params)?,
        name: function.name,
        script: path,
    })
}

/// `inspect` rendered as pretty JSON.
///
/// # Errors
///
/// See [`inspect`].
pub fn inspect_json(path: &Path) -> Result<String> {
    let signature = inspect(path)?;
    Ok(serde_json::to_string_pretty(&signature)?)
}
