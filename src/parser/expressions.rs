use super::error::SyntaxErrorKind;
use super::{ParseError, Parser};
use crate::ast::{BinaryOp, Expr};
use crate::builtins::Builtin;
use crate::lexer::{Token, TokenKind};

const EXPRESSION_START: [TokenKind; 3] = [TokenKind::Text, TokenKind::Number, TokenKind::LParen];

// Recursive expression parsing methods
//
// addExpr := mulExpr (("+"|"-") mulExpr)*
// mulExpr := atom (("*"|"/") atom)*
// atom    := NUMBER | IDENT | IDENT "(" argList ")" | "(" addExpr ")"
// argList := addExpr ("," addExpr)*
//
// `depth` counts open parentheses, calls and folded operators, which bounds
// the height of the tree every later pass recurses over.
impl<'a> Parser<'a> {
    /// Parse the expression inside a `{{ }}` block
    pub(super) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_add_expression(0)
    }

    fn parse_add_expression(&mut self, mut depth: usize) -> Result<Expr, ParseError> {
        self.check_depth(depth)?;
        let mut lhs = self.parse_mul_expression(depth)?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Subtract,
                _ => break,
            };
            self.advance()?;
            depth += 1;
            self.check_depth(depth)?;
            let rhs = self.parse_mul_expression(depth)?;
            lhs = Expr::binary(lhs, op, rhs);
        }
        Ok(lhs)
    }

    fn parse_mul_expression(&mut self, mut depth: usize) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_atom(depth)?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Multiply,
                TokenKind::Slash => BinaryOp::Divide,
                _ => break,
            };
            self.advance()?;
            depth += 1;
            self.check_depth(depth)?;
            let rhs = self.parse_atom(depth)?;
            lhs = Expr::binary(lhs, op, rhs);
        }
        Ok(lhs)
    }

    fn parse_atom(&mut self, depth: usize) -> Result<Expr, ParseError> {
        match self.peek_kind() {
            TokenKind::Number => {
                let token = self.advance()?;
                token
                    .number()
                    .map(Expr::Number)
                    .ok_or_else(|| ParseError::unexpected_token("a numeric literal", &token))
            }
            TokenKind::Text => {
                let name = self.advance()?;
                if self.peek_kind_is(TokenKind::LParen) {
                    return self.parse_call(name, depth + 1);
                }
                Ok(Expr::Identifier(name.lexeme))
            }
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_add_expression(depth + 1)?;
                self.consume(TokenKind::RParen)?;
                Ok(Expr::group(inner))
            }
            TokenKind::Foreach => Err(self.syntax_error(
                SyntaxErrorKind::MisplacedForeach,
                "'foreach' can only open a block at the start of a line".to_string(),
            )),
            _ => Err(self.new_unexpected_token("one of text, number, '('")),
        }
    }

    fn parse_call(&mut self, name: Token, depth: usize) -> Result<Expr, ParseError> {
        let function = Builtin::from_name(&name.lexeme).ok_or_else(|| {
            ParseError::from_token(
                SyntaxErrorKind::UnknownFunction,
                format!("Unknown function '{}'", name.lexeme),
                &name,
            )
        })?;
        self.check_depth(depth)?;
        self.advance()?; // '('

        let mut args = Vec::new();
        loop {
            self.expect_one_of(&EXPRESSION_START)?;
            args.push(self.parse_add_expression(depth)?);
            if !self.peek_kind_is(TokenKind::Comma) {
                break;
            }
            self.advance()?;
            if self.peek_kind_is(TokenKind::RParen) {
                return Err(self.syntax_error(
                    SyntaxErrorKind::MalformedArgumentList,
                    format!("Expected an argument after ',' in call to {}, found ')'", function),
                ));
            }
        }

        if !self.peek_kind_is(TokenKind::RParen) {
            return Err(self.new_unexpected_token("',' or ')'"));
        }
        self.advance()?;
        Ok(Expr::Call { function, args })
    }
}
