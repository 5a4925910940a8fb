// Parser module - splits parser into logical components
mod error;
mod expressions;
mod helpers;
mod statements;
mod token_source;

// Public exports
pub use error::{ParseError, SyntaxErrorKind};
pub use token_source::TokenSource;

use crate::ast::Document;
use crate::lexer::{Scanner, Token};
use crate::limits::TemplateLimits;

/// Recursive-descent parser over a lazily scanned template.
///
/// The parser holds one token of lookahead in `current` and drives the
/// scanner's whitespace mode as it enters and leaves `{{ }}` blocks.
pub struct Parser<'a> {
    tokens: TokenSource<'a>,
    current: Token,
    limits: &'a TemplateLimits,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, limits: &'a TemplateLimits) -> Result<Self, ParseError> {
        let mut tokens = TokenSource::new(Scanner::new(source, limits)?);
        let current = tokens.next_token()?;
        Ok(Self {
            tokens,
            current,
            limits,
        })
    }

    // Main parsing entry point
    pub fn parse(mut self) -> Result<Document, ParseError> {
        self.parse_document()
    }
}

// Public API function
pub fn parse(source: &str, limits: &TemplateLimits) -> Result<Document, ParseError> {
    Parser::new(source, limits)?.parse()
}
