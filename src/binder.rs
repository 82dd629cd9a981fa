//! Binding command-line tokens to a script's declared parameters.
//!
//! Binding runs in two passes. The first pass strips every declared option
//! and flag out of the token list; only then are indexed positionals looked
//! up, so `--out x a b` binds `$0` to `a` whether or not `--out` was declared
//! before `$0`.

use crate::error::{Error, Result};
use crate::params::{ParamKind, ParamSpec};
use crate::shell::{Alias, Shell};

/// A value bound to one declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue<'s> {
    Shell(&'s Shell),
    RemainingArgs(Vec<String>),
    Positional(String),
    Option(Option<String>),
    Flag(bool),
    Alias(Alias),
}

impl BoundValue<'_> {
    /// Whether the value counts as "set" in an `if` statement.
    pub fn is_truthy(&self) -> bool {
        match self {
            BoundValue::Shell(_) | BoundValue::Alias(_) => true,
            BoundValue::RemainingArgs(args) => !args.is_empty(),
            BoundValue::Positional(value) => !value.is_empty(),
            BoundValue::Option(value) => value.is_some(),
            BoundValue::Flag(set) => *set,
        }
    }

    /// The value as it is spliced into a command argument. Callables have no
    /// text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            BoundValue::Shell(_) | BoundValue::Alias(_) => None,
            BoundValue::RemainingArgs(args) => Some(args.join(" ")),
            BoundValue::Positional(value) => Some(value.clone()),
            BoundValue::Option(value) => Some(value.clone().unwrap_or_default()),
            BoundValue::Flag(set) => Some(set.to_string()),
        }
    }
}

/// The bound call arguments, one slot per declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArguments<'s> {
    specs: Vec<ParamSpec>,
    values: Vec<BoundValue<'s>>,
}

impl<'s> BoundArguments<'s> {
    pub fn values(&self) -> &[BoundValue<'s>] {
        &self.values
    }

    pub fn specs(&self) -> &[ParamSpec] {
        &self.specs
    }

    /// Look a value up by its declared parameter name.
    pub fn get(&self, name: &str) -> Option<&BoundValue<'s>> {
        self.specs
            .iter()
            .position(|spec| spec.name == name)
            .map(|i| &self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParamSpec, &BoundValue<'s>)> {
        self.specs.iter().zip(self.values.iter())
    }

    /// The name the shell slot was declared under.
    pub fn shell_name(&self) -> Option<&str> {
        self.specs.first().map(|spec| spec.name.as_str())
    }
}

/// Rewrite tokens into the `--long-name [value]` form the binder expects:
/// `--name=value` becomes `--name value` and `-abc` becomes `--a --b --c`.
pub fn normalize_cli_flags(tokens: &[String]) -> Vec<String> {
    let mut normalized = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Some(long) = token.strip_prefix("--") {
            if let Some((name, value)) = long.split_once('=')
                && !name.is_empty()
            {
                normalized.push(format!("--{name}"));
                normalized.push(value.to_string());
                continue;
            }
        } else if let Some(short) = token.strip_prefix('-')
            && !short.is_empty()
            && short.chars().all(|c| c.is_ascii_alphabetic())
        {
            normalized.extend(short.chars().map(|c| format!("--{c}")));
            continue;
        }
        normalized.push(token.clone());
    }
    normalized
}

/// Bind `raw_args` to the parameters named in `param_names`.
///
/// # Errors
///
/// See [`bind`]; additionally fails with [`Error::InvalidParameterName`]
/// while classifying the names.
pub fn bind_names<'s, S: AsRef<str>>(
    param_names: &[S],
    raw_args: &[String],
    shell: &'s Shell,
) -> Result<BoundArguments<'s>> {
    let specs = crate::params::classify_all(param_names)?;
    bind(&specs, raw_args, shell)
}

/// Bind `raw_args` to the classified parameters in `specs`.
///
/// `raw_args` is not modified, so binding the same inputs twice gives the
/// same result.
///
/// # Errors
///
/// - [`Error::UnknownOption`] if a hyphenated token is left once every
///   declared option and flag has been consumed.
/// - [`Error::MissingArguments`] if fewer positional tokens remain than the
///   highest `$N` requires.
pub fn bind<'s>(
    specs: &[ParamSpec],
    raw_args: &[String],
    shell: &'s Shell,
) -> Result<BoundArguments<'s>> {
    let mut remaining = normalize_cli_flags(raw_args);
    let mut captured: Vec<Option<BoundValue<'s>>> = vec![None; specs.len()];
    let mut valid_options = Vec::new();
    let mut args_required: Option<usize> = None;

    // Pass 1: consume options and flags, note the highest positional index.
    for (slot, spec) in specs.iter().enumerate() {
        match &spec.kind {
            ParamKind::Option { flag } => {
                if let Some(usage) = spec.option_usage() {
                    valid_options.push(usage);
                }
                let value = match remaining.iter().position(|t| t == flag) {
                    Some(idx) => {
                        remaining.remove(idx);
                        (idx < remaining.len()).then(|| remaining.remove(idx))
                    }
                    None => None,
                };
                tracing::trace!(%flag, ?value, "bound option");
                captured[slot] = Some(BoundValue::Option(value));
            }
            ParamKind::Flag { flag } => {
                valid_options.push(flag.clone());
                let present = match remaining.iter().position(|t| t == flag) {
                    Some(idx) => {
                        remaining.remove(idx);
                        true
                    }
                    None => false,
                };
                tracing::trace!(%flag, present, "bound flag");
                captured[slot] = Some(BoundValue::Flag(present));
            }
            ParamKind::Positional { index } => {
                args_required = Some(args_required.map_or(*index, |r| r.max(*index)));
            }
            ParamKind::Shell | ParamKind::RemainingArgs | ParamKind::Alias => {}
        }
    }

    if let Some(option) = remaining.iter().find(|t| t.starts_with('-')) {
        return Err(Error::UnknownOption {
            option: option.clone(),
            valid: valid_options,
        });
    }

    if let Some(required) = args_required
        && remaining.len() <= required
    {
        return Err(Error::MissingArguments {
            expected: required.saturating_add(1),
            found: remaining,
        });
    }

    // Pass 2: every slot gets its final value.
    let mut values = Vec::with_capacity(specs.len());
    for (spec, pre) in specs.iter().zip(captured) {
        let value = match (&spec.kind, pre) {
            (_, Some(value)) => value,
            (ParamKind::Shell, None) => BoundValue::Shell(shell),
            (ParamKind::RemainingArgs, None) => BoundValue::RemainingArgs(remaining.clone()),
            (ParamKind::Positional { index }, None) => {
                BoundValue::Positional(remaining[*index].clone())
            }
            (ParamKind::Alias, None) => BoundValue::Alias(shell.alias(&spec.name)),
            // Options and flags were all captured in pass 1.
            (ParamKind::Option { .. }, None) => BoundValue::Option(None),
            (ParamKind::Flag { .. }, None) => BoundValue::Flag(false),
        };
        values.push(value);
    }

    tracing::debug!(
        params = specs.len(),
        remaining = remaining.len(),
        "bound script arguments"
    );

    Ok(BoundArguments {
        specs: specs.to_vec(),
        values,
    })
}
