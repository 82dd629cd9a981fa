//! Parser implementation using pest
//!
//! This module provides parsing functionality for nscript files,
//! converting text input into an Abstract Syntax Tree (AST).

mod error;
mod preprocessing;

pub use error::ParseError;

use crate::ast::{Argument, Callee, FunctionDef, Item, Program, RedirectTarget, Statement};
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct ScriptParser;

/// Parse an nscript source into an Abstract Syntax Tree (AST)
///
/// # Errors
///
/// Returns `Err` if the input contains syntax errors that violate the grammar,
/// such as:
/// - An unclosed parameter list or block
/// - An unterminated quoted string
/// - A statement that does not start with a callee name
pub fn parse_script(input: &str, filename: Option<&str>) -> Result<Program, ParseError> {
    let preprocessed = preprocessing::preprocess_escaped_newlines(input);
    let pairs = ScriptParser::parse(Rule::program, &preprocessed)
        .map_err(|e| ParseError::from_pest(&e, &preprocessed, filename))?;
    let mut items = Vec::new();

    for pair in pairs {
        if pair.as_rule() != Rule::program {
            continue;
        }
        for inner_pair in pair.into_inner() {
            if inner_pair.as_rule() != Rule::item {
                continue;
            }
            if let Some(content) = inner_pair.into_inner().next() {
                match content.as_rule() {
                    Rule::function_def => items.push(Item::Function(parse_function(content))),
                    Rule::statement => {
                        if let Some(stmt) = parse_statement(content) {
                            items.push(Item::Statement(stmt));
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(Program { items })
}

fn parse_function(pair: Pair<Rule>) -> FunctionDef {
    let line = pair.line_col().0;
    let mut name = None;
    let mut params = Vec::new();
    let mut body = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::function_name => name = Some(inner.as_str().to_string()),
            Rule::param_list => {
                params = inner
                    .into_inner()
                    .filter(|p| p.as_rule() == Rule::param_name)
                    .map(|p| p.as_str().to_string())
                    .collect();
            }
            Rule::block => body = parse_block(inner),
            _ => {}
        }
    }

    FunctionDef {
        name,
        params,
        body,
        line,
    }
}

fn parse_block(pair: Pair<Rule>) -> Vec<Statement> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::statement)
        .filter_map(parse_statement)
        .collect()
}

fn parse_statement(pair: Pair<Rule>) -> Option<Statement> {
    let inner = pair.into_inner().next()?;
    match inner.as_rule() {
        Rule::call => parse_call(inner),
        Rule::if_stmt => parse_if(inner),
        _ => None,
    }
}

fn parse_call(pair: Pair<Rule>) -> Option<Statement> {
    let mut inner = pair.into_inner();
    let callee = parse_callee(inner.next()?)?;
    let mut args = Vec::new();
    let mut redirect = None;

    for part in inner {
        match part.as_rule() {
            Rule::argument => args.push(parse_argument(part)?),
            Rule::redirect => {
                let mut parts = part.into_inner();
                let append = parts.next()?.as_str() == ">>";
                let target = parse_argument(parts.next()?)?;
                redirect = Some(RedirectTarget { append, target });
            }
            _ => {}
        }
    }

    Some(Statement::Call {
        callee,
        args,
        redirect,
    })
}

fn parse_callee(pair: Pair<Rule>) -> Option<Callee> {
    let mut inner = pair.into_inner();
    let name = inner.next()?.as_str().to_string();
    let method = inner.next().map(|m| m.as_str().to_string());
    Some(Callee { name, method })
}

fn parse_argument(pair: Pair<Rule>) -> Option<Argument> {
    let inner = pair.into_inner().next()?;
    let text = |p: Pair<Rule>| {
        p.into_inner()
            .next()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default()
    };
    match inner.as_rule() {
        Rule::word => Some(Argument::Word(inner.as_str().to_string())),
        Rule::single_quoted => Some(Argument::SingleQuoted(text(inner))),
        Rule::double_quoted => Some(Argument::DoubleQuoted(text(inner))),
        _ => None,
    }
}

fn parse_if(pair: Pair<Rule>) -> Option<Statement> {
    let mut negated = false;
    let mut param = None;
    let mut then_branch = None;
    let mut else_branch = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::negation => negated = true,
            Rule::param_ref => param = Some(inner.as_str().to_string()),
            Rule::block => then_branch = Some(parse_block(inner)),
            Rule::else_part => {
                if let Some(block) = inner.into_inner().find(|p| p.as_rule() == Rule::block) {
                    else_branch = parse_block(block);
                }
            }
            _ => {}
        }
    }

    Some(Statement::If {
        param: param?,
        negated,
        then_branch: then_branch?,
        else_branch,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn only_function(input: &str) -> FunctionDef {
        let program = parse_script(input, None).unwrap();
        assert_eq!(program.items.len(), 1, "expected one item in {program:?}");
        match program.items.into_iter().next() {
            Some(Item::Function(f)) => f,
            other => panic!("Expected function, got {other:?}"),
        }
    }

    fn call(name: &str, args: Vec<Argument>) -> Statement {
        Statement::Call {
            callee: Callee {
                name: name.to_string(),
                method: None,
            },
            args,
            redirect: None,
        }
    }

    fn word(w: &str) -> Argument {
        Argument::Word(w.to_string())
    }

    #[test]
    fn test_parse_function_with_shebang() {
        let f = only_function(
            "#!/usr/bin/env nscript\nfunction(shell, echo) {\n    echo hello world\n}\n",
        );
        assert_eq!(f.name, None);
        assert_eq!(f.params, vec!["shell", "echo"]);
        assert_eq!(f.line, 2);
        assert_eq!(f.body, vec![call("echo", vec![word("hello"), word("world")])]);
    }

    #[test]
    fn test_parse_named_function_with_dollar_params() {
        let f = only_function("function deploy(shell, $0, $$target, $force, $args) {}");
        assert_eq!(f.name.as_deref(), Some("deploy"));
        assert_eq!(f.params, vec!["shell", "$0", "$$target", "$force", "$args"]);
        assert!(f.body.is_empty());
    }

    #[test]
    fn test_invalid_param_names_still_parse() {
        let f = only_function("function(shell, $invalid-name!) {}");
        assert_eq!(f.params, vec!["shell", "$invalid-name!"]);
    }

    #[test]
    fn test_multiline_params_and_trailing_comma() {
        let f = only_function("function(\n    shell,\n    cp,\n)\n{\n    cp a b\n}");
        assert_eq!(f.params, vec!["shell", "cp"]);
        assert_eq!(f.body.len(), 1);
    }

    #[test]
    fn test_parse_quoted_arguments() {
        let f = only_function(r#"function(shell, echo) { echo 'lit $0' "hi \"$0\"" bare }"#);
        assert_eq!(
            f.body,
            vec![call(
                "echo",
                vec![
                    Argument::SingleQuoted("lit $0".to_string()),
                    Argument::DoubleQuoted(r#"hi \"$0\""#.to_string()),
                    word("bare"),
                ]
            )]
        );
    }

    #[test]
    fn test_parse_redirects() {
        let f = only_function("function(shell, echo, cat) {\n echo a > out.txt\n cat b >> out.txt\n}");
        let redirects: Vec<_> = f
            .body
            .iter()
            .map(|s| match s {
                Statement::Call { redirect, .. } => redirect.clone(),
                Statement::If { .. } => None,
            })
            .collect();
        assert_eq!(
            redirects,
            vec![
                Some(RedirectTarget {
                    append: false,
                    target: word("out.txt")
                }),
                Some(RedirectTarget {
                    append: true,
                    target: word("out.txt")
                }),
            ]
        );
    }

    #[test]
    fn test_parse_method_call_and_semicolons() {
        let f = only_function("function(sh) { sh.verbose true; sh.cd /tmp; sh \"ls\" }");
        assert_eq!(f.body.len(), 3);
        if let Statement::Call { callee, args, .. } = &f.body[0] {
            assert_eq!(callee.name, "sh");
            assert_eq!(callee.method.as_deref(), Some("verbose"));
            assert_eq!(args, &vec![word("true")]);
        } else {
            panic!("Expected call");
        }
    }

    #[test]
    fn test_parse_if_else() {
        let f = only_function(
            "function(shell, echo, $force) {\n  if !$force {\n    echo safe\n  } else {\n    echo forced\n  }\n}",
        );
        assert_eq!(
            f.body,
            vec![Statement::If {
                param: "$force".to_string(),
                negated: true,
                then_branch: vec![call("echo", vec![word("safe")])],
                else_branch: vec![call("echo", vec![word("forced")])],
            }]
        );
    }

    #[test]
    fn test_keyword_prefix_is_a_plain_call() {
        let program = parse_script("ifconfig -a\nfunctions list", None).unwrap();
        assert_eq!(
            program.items,
            vec![
                Item::Statement(call("ifconfig", vec![word("-a")])),
                Item::Statement(call("functions", vec![word("list")])),
            ]
        );
    }

    #[test]
    fn test_comments_and_line_continuation() {
        let f = only_function(
            "# leading\nfunction(shell, echo) { # trailing\n  echo a \\\n    b # note\n}",
        );
        assert_eq!(f.body, vec![call("echo", vec![word("a"), word("b")])]);
    }

    #[test]
    fn test_word_may_contain_hash_after_first_char() {
        let program = parse_script("echo a#b", None).unwrap();
        assert_eq!(
            program.items,
            vec![Item::Statement(call("echo", vec![word("a#b")]))]
        );
    }

    #[test]
    fn test_unclosed_block_is_an_error() {
        let err = parse_script("function(shell) {\n  echo hi\n", Some("broken.ns")).unwrap_err();
        assert_eq!(err.filename.as_deref(), Some("broken.ns"));
    }
}
