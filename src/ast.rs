// Abstract Syntax Tree definitions

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Function(FunctionDef),
    Statement(Statement),
}

/// `function [name](params) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: Option<String>,
    /// Parameter names exactly as written; classification happens later.
    pub params: Vec<String>,
    pub body: Vec<Statement>,
    /// 1-indexed line of the `function` keyword.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Call {
        callee: Callee,
        args: Vec<Argument>,
        redirect: Option<RedirectTarget>,
    },
    If {
        param: String,
        negated: bool,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    },
}

/// `name` or `name.method`
#[derive(Debug, Clone, PartialEq)]
pub struct Callee {
    pub name: String,
    pub method: Option<String>,
}

impl std::fmt::Display for Callee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.method {
            Some(method) => write!(f, "{}.{}", self.name, method),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Unquoted; `$name` references are expanded.
    Word(String),
    /// `'...'`, taken literally.
    SingleQuoted(String),
    /// `"..."` with escapes left in place; expanded when the statement runs.
    DoubleQuoted(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RedirectTarget {
    pub append: bool,
    pub target: Argument,
}
