//! Expansion of `$name` references inside statement arguments.
//!
//! Arguments passed to an alias become argv entries as they are. Arguments of
//! a shell-slot call are joined into one command line: values substituted
//! into bare words are shell-quoted so each stays one word, while quoted
//! arguments are inserted verbatim and may carry pipes or redirections.

use crate::ast::Argument;
use crate::binder::{BoundArguments, BoundValue};

/// One parsed argument after expansion.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Expanded {
    Single(String),
    /// A bare `$args`: one argument per remaining token.
    Splat(Vec<String>),
}

impl Expanded {
    /// Flatten into argv entries for a directly executed program.
    pub(super) fn into_argv(self, argv: &mut Vec<String>) {
        match self {
            Expanded::Single(s) => argv.push(s),
            Expanded::Splat(list) => argv.extend(list),
        }
    }

}

pub(super) fn expand(arg: &Argument, bound: &BoundArguments<'_>) -> Expanded {
    match arg {
        Argument::SingleQuoted(text) => Expanded::Single(text.clone()),
        Argument::Word(text) => match bound.get(text) {
            Some(BoundValue::RemainingArgs(list)) => Expanded::Splat(list.clone()),
            _ => Expanded::Single(interpolate(text, false, false, bound)),
        },
        Argument::DoubleQuoted(text) => Expanded::Single(interpolate(text, true, false, bound)),
    }
}

/// Render an argument as a fragment of a command line run by the system shell.
pub(super) fn expand_command_fragment(arg: &Argument, bound: &BoundArguments<'_>) -> String {
    match arg {
        Argument::SingleQuoted(text) => text.clone(),
        Argument::Word(text) => match bound.get(text) {
            Some(BoundValue::RemainingArgs(list)) => shell_quote_args(list),
            _ => interpolate(text, false, true, bound),
        },
        Argument::DoubleQuoted(text) => interpolate(text, true, false, bound),
    }
}

/// Expand an argument that must be a single word, such as a redirect target.
pub(super) fn expand_joined(arg: &Argument, bound: &BoundArguments<'_>) -> String {
    match expand(arg, bound) {
        Expanded::Single(s) => s,
        Expanded::Splat(list) => list.join(" "),
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replace references to declared `$` parameters in `text`. The longest
/// declared name wins, so `$$out` is not read as `$` followed by `$out`.
/// With `quote_values` every substituted value is shell-quoted.
fn interpolate(text: &str, escapes: bool, quote_values: bool, bound: &BoundArguments<'_>) -> String {
    let mut names: Vec<&str> = bound
        .iter()
        .filter(|(spec, value)| spec.name.starts_with('$') && value.as_text().is_some())
        .map(|(spec, _)| spec.name.as_str())
        .collect();
    names.sort_by_key(|name| std::cmp::Reverse(name.len()));

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if escapes && c == '\\' {
            if let Some(next @ ('"' | '\\' | '$')) = rest[1..].chars().next() {
                out.push(next);
                rest = &rest[1 + next.len_utf8()..];
                continue;
            }
        }

        if c == '$'
            && let Some(name) = names
                .iter()
                .find(|name| rest.starts_with(**name) && !rest[name.len()..].starts_with(is_name_char))
        {
            if let Some(value) = bound.get(name).and_then(BoundValue::as_text) {
                if quote_values {
                    out.push_str(&shell_quote(&value));
                } else {
                    out.push_str(&value);
                }
            }
            rest = &rest[name.len()..];
            continue;
        }

        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Shell-quote a slice of arguments so each remains a separate word when
/// substituted into a shell command string via text replacement.
pub(super) fn shell_quote_args(args: &[String]) -> String {
    args.iter()
        .map(|a| shell_quote(a))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(arg: &str) -> String {
    if arg.is_empty() {
        "''".to_string()
    } else if arg.bytes().all(|b| {
        matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'/' | b':' | b'=' | b'+' | b'@' | b'%' | b',')
    }) {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}
