use std::fmt;

use crate::builtins::Builtin;
use crate::value::Number;

// Template AST: an owned tree, immutable once parsed.
//
// Document
//   Line*
//     LineItem: Text | ExpressionBlock | ForEach (sole item of its line)
//       Expr: Identifier | Number | Group | BinOp | Call

/// Root of a parsed template
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub lines: Vec<Line>,
}

/// One line of output
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub content: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineItem {
    Text(String),
    /// `{{ expr }}` substituted into the line
    ExpressionBlock(Expr),
    ForEach(ForEachBlock),
}

/// `{{ foreach iterand in iterator }}` ... `{{ endforeach }}`
#[derive(Debug, Clone, PartialEq)]
pub struct ForEachBlock {
    pub iterand: String,
    pub iterator: String,
    pub body: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(String),
    Number(Number),
    /// Explicit parentheses, kept so the tree mirrors the source grouping
    Group(Box<Expr>),
    BinOp {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },
    Call {
        function: Builtin,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
        };
        f.write_str(symbol)
    }
}

impl Document {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }
}

impl Line {
    pub fn new(content: Vec<LineItem>) -> Self {
        Self { content }
    }
}

// Shorthand constructors, mostly for building expected trees
impl Expr {
    pub fn ident(name: &str) -> Self {
        Expr::Identifier(name.to_string())
    }

    pub fn int(value: i64) -> Self {
        Expr::Number(Number::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Expr::Number(Number::Float(value))
    }

    pub fn group(inner: Expr) -> Self {
        Expr::Group(Box::new(inner))
    }

    pub fn binary(lhs: Expr, op: BinaryOp, rhs: Expr) -> Self {
        Expr::BinOp {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }
}

impl LineItem {
    pub fn text(value: &str) -> Self {
        LineItem::Text(value.to_string())
    }
}
