use super::error::{ParseError, SyntaxErrorKind};
use crate::lexer::{Token, TokenKind};

// Parser helper methods
impl<'a> super::Parser<'a> {
    pub(crate) fn new_unexpected_token(&self, expected: &str) -> ParseError {
        ParseError::unexpected_token(expected, &self.current)
    }

    pub(super) fn syntax_error(&self, kind: SyntaxErrorKind, message: String) -> ParseError {
        ParseError::from_token(kind, message, &self.current)
    }

    // Helper: Check recursion depth limit
    pub(super) fn check_depth(&self, depth: usize) -> Result<(), ParseError> {
        if depth >= self.limits.max_expr_depth {
            return Err(self.syntax_error(
                SyntaxErrorKind::NestingTooDeep,
                format!(
                    "Expression nesting too deep: {} levels (max {}). Consider simplifying.",
                    depth, self.limits.max_expr_depth
                ),
            ));
        }
        Ok(())
    }

    /// Helper: Fail unless the current token is one of `kinds`
    pub(super) fn expect_one_of(&self, kinds: &[TokenKind]) -> Result<(), ParseError> {
        if kinds.contains(&self.current.kind) {
            return Ok(());
        }
        let names: Vec<String> = kinds.iter().map(ToString::to_string).collect();
        let expected = match names.as_slice() {
            [only] => only.clone(),
            _ => format!("one of {}", names.join(", ")),
        };
        Err(self.new_unexpected_token(&expected))
    }

    /// Helper: Consume a specific token kind or error
    pub(super) fn consume(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        self.expect_one_of(&[kind])?;
        self.advance()
    }

    /// Helper: Consume `}}` and switch the scanner back to literal text
    pub(super) fn close_block(&mut self) -> Result<(), ParseError> {
        self.expect_one_of(&[TokenKind::RightDoubleCurly])?;
        self.tokens.keep_whitespace();
        self.advance()?;
        Ok(())
    }

    /// Helper: Move to the next token, returning the one just passed
    pub(super) fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.tokens.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Helper: peek current token
    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.current.kind
    }

    pub(crate) fn peek_kind_is(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }
}
