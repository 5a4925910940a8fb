use crate::lexer::{LexError, Token, TokenKind};

/// Grammar violation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    UnexpectedToken,
    NestedForeach,
    UnterminatedForeach,
    MisplacedForeach,
    UnexpectedEndforeach,
    MalformedArgumentList,
    UnknownFunction,
    NestingTooDeep,
}

// Parse error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("Parse error at line {line}, column {column}: {message}")]
    Syntax {
        kind: SyntaxErrorKind,
        message: String,
        line: usize,
        column: usize,
        found: TokenKind,
    },
}

impl ParseError {
    pub(super) fn from_token(kind: SyntaxErrorKind, message: String, token: &Token) -> Self {
        ParseError::Syntax {
            kind,
            message,
            line: token.line,
            column: token.column,
            found: token.kind,
        }
    }

    pub(super) fn unexpected_token(expected: &str, token: &Token) -> Self {
        let found = match token.kind {
            TokenKind::Text | TokenKind::Number => format!("{} '{}'", token.kind, token.lexeme),
            kind => kind.to_string(),
        };

        Self::from_token(
            SyntaxErrorKind::UnexpectedToken,
            format!("Expected {}, found {}", expected, found),
            token,
        )
    }

    /// Category of a syntax error, `None` for lexical failures
    pub fn kind(&self) -> Option<SyntaxErrorKind> {
        match self {
            ParseError::Lex(_) => None,
            ParseError::Syntax { kind, .. } => Some(*kind),
        }
    }
}
