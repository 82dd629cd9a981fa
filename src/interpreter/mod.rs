//! Interpreter to execute a script body
//!
//! Statements call the callables a script was bound to: the shell slot runs
//! a command line through the system shell, alias parameters run their
//! program directly. `if` statements branch on bound option and flag values.

mod expand;

use crate::ast::{Argument, Callee, RedirectTarget, Statement};
use crate::binder::{BoundArguments, BoundValue};
use crate::error::{Error, Result};
use crate::shell::{Alias, Redirect, Shell};

pub struct Interpreter<'a, 's> {
    shell: &'s Shell,
    bound: &'a BoundArguments<'s>,
}

enum Target {
    Shell,
    Alias(Alias),
}

impl<'a, 's> Interpreter<'a, 's> {
    pub fn new(shell: &'s Shell, bound: &'a BoundArguments<'s>) -> Self {
        Self { shell, bound }
    }

    /// Execute statements in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - A statement calls a name that is not bound (and globals are off)
    /// - A shell method is unknown or given the wrong arguments
    /// - A command fails to start or exits unsuccessfully
    pub fn execute(&self, statements: &[Statement]) -> Result<()> {
        for statement in statements {
            self.execute_statement(statement)?;
        }
        Ok(())
    }

    fn execute_statement(&self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Call {
                callee,
                args,
                redirect,
            } => self.execute_call(callee, args, redirect.as_ref()),
            Statement::If {
                param,
                negated,
                then_branch,
                else_branch,
            } => {
                let value = self
                    .bound
                    .get(param)
                    .ok_or_else(|| Error::UnboundName(param.clone()))?;
                let condition = value.is_truthy() != *negated;
                tracing::trace!(%param, condition, "if");
                if condition {
                    self.execute(then_branch)
                } else {
                    self.execute(else_branch)
                }
            }
        }
    }

    fn resolve(&self, name: &str) -> Result<Target> {
        if self.bound.shell_name() == Some(name) {
            return Ok(Target::Shell);
        }
        match self.bound.get(name) {
            Some(BoundValue::Alias(alias)) => Ok(Target::Alias(alias.clone())),
            Some(_) => Err(Error::InvalidCall(format!("'{name}' is not callable"))),
            None if self.shell.globals_enabled() => Ok(Target::Alias(self.shell.alias(name))),
            None => Err(Error::UnboundName(name.to_string())),
        }
    }

    fn execute_call(
        &self,
        callee: &Callee,
        args: &[Argument],
        redirect: Option<&RedirectTarget>,
    ) -> Result<()> {
        let target = self.resolve(&callee.name)?;
        let redirect = redirect.map(|r| {
            let path = expand::expand_joined(&r.target, self.bound).into();
            if r.append {
                Redirect::Append(path)
            } else {
                Redirect::Write(path)
            }
        });
        tracing::trace!(%callee, args = args.len(), "call");

        match (target, callee.method.as_deref()) {
            (Target::Shell, None) => {
                let command_line = args
                    .iter()
                    .map(|a| expand::expand_command_fragment(a, self.bound))
                    .collect::<Vec<_>>()
                    .join(" ");
                self.shell.exec(&command_line, redirect.as_ref())
            }
            (Target::Shell, Some(method)) => self.call_shell_method(callee, method, &self.argv(args)),
            (Target::Alias(alias), None) => alias.call(self.shell, &self.argv(args), redirect.as_ref()),
            (Target::Alias(_), Some(_)) => Err(Error::InvalidCall(format!(
                "'{callee}': aliases have no methods, use `>` or `>>` to redirect output"
            ))),
        }
    }

    /// Expand arguments into argv entries, splatting a bare `$args`.
    fn argv(&self, args: &[Argument]) -> Vec<String> {
        let mut argv = Vec::new();
        for arg in args {
            expand::expand(arg, self.bound).into_argv(&mut argv);
        }
        argv
    }

    fn call_shell_method(&self, callee: &Callee, method: &str, argv: &[String]) -> Result<()> {
        match (method, argv) {
            ("cd", [path]) => self.shell.cd(path),
            ("cd", _) => Err(Error::InvalidCall(format!("'{callee}' takes exactly one path"))),
            ("verbose", []) => {
                self.shell.set_verbose(true);
                Ok(())
            }
            ("verbose", [value]) => {
                let verbose = parse_bool(value).ok_or_else(|| {
                    Error::InvalidCall(format!("'{callee}' expects true or false, got '{value}'"))
                })?;
                self.shell.set_verbose(verbose);
                Ok(())
            }
            ("verbose", _) => Err(Error::InvalidCall(format!(
                "'{callee}' takes at most one argument"
            ))),
            _ => Err(Error::InvalidCall(format!(
                "unknown shell method '{callee}', expected cd or verbose"
            ))),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}
