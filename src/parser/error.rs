//! User-friendly parse error types and formatting.
//!
//! Converts raw pest parser errors into structured, human-readable diagnostics
//! with source context, precise column indicators, and actionable hints.

use std::fmt;

use super::Rule;

/// A structured, user-friendly parser error.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Human-readable error message (no raw rule names).
    pub message: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed) where the error begins.
    pub col: usize,
    /// End column for span errors (used to size the underline caret).
    pub col_end: Option<usize>,
    /// The full text of the offending source line.
    pub source_line: Option<String>,
    /// Optional source file name shown in the error header.
    pub filename: Option<String>,
    /// Optional suggestion to help the user fix the error.
    pub hint: Option<String>,
}

impl ParseError {
    /// Build a `ParseError` from a pest error, enriching it with source context.
    pub fn from_pest(
        error: &pest::error::Error<Rule>,
        source: &str,
        filename: Option<&str>,
    ) -> Self {
        let (line, col, col_end) = match error.line_col {
            pest::error::LineColLocation::Pos((l, c)) => (l, c, None),
            pest::error::LineColLocation::Span((sl, sc), (el, ec)) => {
                let end = if sl == el { Some(ec) } else { None };
                (sl, sc, end)
            }
        };

        let source_line = source
            .lines()
            .nth(line.saturating_sub(1))
            .map(str::to_string);

        let (message, hint) = match &error.variant {
            pest::error::ErrorVariant::ParsingError { positives, .. } => {
                (friendly_message(positives), friendly_hint(positives))
            }
            pest::error::ErrorVariant::CustomError { message } => (message.clone(), None),
        };

        ParseError {
            message,
            line,
            col,
            col_end,
            source_line,
            filename: filename.map(str::to_string),
            hint,
        }
    }
}

/// Return a short, user-facing label for a grammar rule, or `None` to omit it.
fn rule_label(rule: Rule) -> Option<&'static str> {
    match rule {
        Rule::function_def => Some("function definition"),
        Rule::function_name => Some("function name"),
        Rule::param_list => Some("parameter list"),
        Rule::param_name => Some("parameter name"),
        Rule::block => Some("block (`{ ... }`)"),
        Rule::statement | Rule::call => Some("statement"),
        Rule::callee | Rule::callee_name => Some("command name"),
        Rule::method_name => Some("method name"),
        Rule::param_ref => Some("parameter reference (e.g. `$force`)"),
        Rule::argument | Rule::word => Some("argument"),
        Rule::redirect => Some("redirect (`>` or `>>`)"),
        _ => None,
    }
}

fn friendly_message(positives: &[Rule]) -> String {
    let mut named: Vec<&str> = positives.iter().copied().filter_map(rule_label).collect();
    named.dedup();

    match named.as_slice() {
        [] => "unexpected token".to_string(),
        [single] => format!("expected {single}"),
        [a, b] => format!("expected {a} or {b}"),
        [rest @ .., last] => format!("expected {} or {}", rest.join(", "), last),
    }
}

fn friendly_hint(positives: &[Rule]) -> Option<String> {
    let has = |r: Rule| positives.contains(&r);

    if has(Rule::param_name) {
        return Some(
            "Parameters are separated by commas, e.g. `function(shell, echo, $0, $$out, $force)`."
                .to_string(),
        );
    }

    if has(Rule::block) {
        return Some("A function body is wrapped in braces: `function(shell) { ... }`.".to_string());
    }

    if has(Rule::param_ref) {
        return Some("`if` takes a declared parameter, e.g. `if $force { ... }`.".to_string());
    }

    if has(Rule::callee) || has(Rule::statement) {
        return Some(
            "Each statement starts with a declared parameter name, e.g. `echo hello` \
             or `shell \"ls -la\"`. Check for an unclosed quote or brace."
                .to_string(),
        );
    }

    None
}

/// Format the caret underline for an error at `col` with optional `col_end`.
fn underline(col: usize, col_end: Option<usize>) -> String {
    let start = col.saturating_sub(1);
    let len = col_end.map_or(1, |end| end.saturating_sub(col).max(1));
    format!("{}{}", " ".repeat(start), "^".repeat(len))
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ── error header ────────────────────────────────────────────────────
        //   error: <message>
        //     --> <file>:<line>:<col>
        writeln!(f, "error: {}", self.message)?;

        let location = match &self.filename {
            Some(name) => format!("{name}:{}:{}", self.line, self.col),
            None => format!("{}:{}", self.line, self.col),
        };
        write!(f, "  --> {location}")?;

        // ── source context ──────────────────────────────────────────────────
        if let Some(ref src) = self.source_line {
            let num = self.line.to_string();
            let pad = " ".repeat(num.len());

            writeln!(f)?;
            writeln!(f, "   {pad} |")?;
            writeln!(f, "   {num} | {src}")?;
            write!(f, "   {pad} | {}", underline(self.col, self.col_end))?;
        }

        if let Some(ref hint) = self.hint {
            writeln!(f)?;
            writeln!(f)?;
            write!(f, "   = hint: {hint}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}
