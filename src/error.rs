use crate::eval::EvalError;
use crate::lexer::LexError;
use crate::limits::LimitError;
use crate::parser::ParseError;
use crate::semantic::TypeError;

/// Any failure from loading, compiling or filling a template
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Limit(#[from] LimitError),
}
