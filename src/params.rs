//! Parameter classification.
//!
//! A script declares its interface through the names in its parameter list:
//!
//! | name        | kind               | bound to                                   |
//! |-------------|--------------------|--------------------------------------------|
//! | (first)     | shell slot         | the [`Shell`](crate::shell::Shell)         |
//! | `$args`     | remaining args     | every token not consumed by another rule   |
//! | `$0`, `$1`  | indexed positional | the Nth remaining token                    |
//! | `$$myArg`   | named option       | the value following `--my-arg`, if present |
//! | `$myFlag`   | boolean flag       | whether `--my-flag` is present             |
//! | `echo`      | alias              | a callable running the `echo` program      |

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

#[allow(clippy::expect_used)]
static INDEX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$(\d+)$").expect("index regex pattern is valid"));

#[allow(clippy::expect_used)]
static OPTION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$\$([A-Za-z0-9_-]+)$").expect("option regex pattern is valid"));

#[allow(clippy::expect_used)]
static FLAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$([A-Za-z0-9_-]+)$").expect("flag regex pattern is valid"));

/// Name of the parameter that receives all remaining arguments.
pub const REMAINING_ARGS: &str = "$args";

/// What a declared parameter binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamKind {
    Shell,
    RemainingArgs,
    Positional { index: usize },
    Option { flag: String },
    Flag { flag: String },
    Alias,
}

/// A classified parameter: the declarative replacement for reading a
/// function's signature at run time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    pub name: String,
    pub position: usize,
    #[serde(flatten)]
    pub kind: ParamKind,
}

impl ParamSpec {
    /// Classify the parameter `name` declared at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameterName`] for a `$`-prefixed name that
    /// matches none of the recognised shapes.
    pub fn classify(name: &str, position: usize) -> Result<Self> {
        let kind = if position == 0 {
            ParamKind::Shell
        } else if name == REMAINING_ARGS {
            ParamKind::RemainingArgs
        } else if let Some(caps) = INDEX_REGEX.captures(name) {
            // Indices too large for usize can never be satisfied anyway.
            let index = caps[1].parse().unwrap_or(usize::MAX);
            ParamKind::Positional { index }
        } else if let Some(caps) = OPTION_REGEX.captures(name) {
            ParamKind::Option {
                flag: hyphenate(&caps[1]),
            }
        } else if let Some(caps) = FLAG_REGEX.captures(name) {
            ParamKind::Flag {
                flag: hyphenate(&caps[1]),
            }
        } else if name.starts_with('$') {
            return Err(Error::InvalidParameterName(name.to_string()));
        } else {
            ParamKind::Alias
        };

        Ok(Self {
            name: name.to_string(),
            position,
            kind,
        })
    }

    /// The spelling listed in "valid options" messages, `None` for kinds that
    /// are not command-line options.
    pub fn option_usage(&self) -> Option<String> {
        match &self.kind {
            ParamKind::Option { flag } => Some(format!("{flag} [value]")),
            ParamKind::Flag { flag } => Some(flag.clone()),
            _ => None,
        }
    }
}

/// Classify a whole parameter list in declaration order.
///
/// # Errors
///
/// Fails on the first invalid `$`-prefixed name.
pub fn classify_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<ParamSpec>> {
    names
        .iter()
        .enumerate()
        .map(|(position, name)| ParamSpec::classify(name.as_ref(), position))
        .collect()
}

/// Turn a camelCase identifier into the `--kebab-case` flag matched on the
/// command line. Only uppercase ASCII letters after the first character
/// introduce a hyphen; the first character is kept as written, so `$V`
/// answers to `-V` and `--V`.
pub fn hyphenate(identifier: &str) -> String {
    let mut flag = String::with_capacity(identifier.len() + 4);
    flag.push_str("--");
    for (i, c) in identifier.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            flag.push('-');
            flag.push(c.to_ascii_lowercase());
        } else {
            flag.push(c);
        }
    }
    flag
}
