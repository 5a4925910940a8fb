use super::Parser;
use super::error::{ParseError, SyntaxErrorKind};
use crate::ast::{Document, ForEachBlock, Line, LineItem};
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    // document := (line NEWLINE)* (line NEWLINE?)?
    pub(super) fn parse_document(&mut self) -> Result<Document, ParseError> {
        let mut lines = Vec::new();
        if self.peek_kind_is(TokenKind::Eof) {
            return Ok(Document::new(lines));
        }

        loop {
            lines.push(self.parse_line(false)?);
            if self.peek_kind_is(TokenKind::Eof) {
                break;
            }
            self.consume(TokenKind::Newline)?;
            // A newline as the very last character ends with one empty line
            if self.peek_kind_is(TokenKind::Eof) {
                lines.push(Line::default());
                break;
            }
        }
        Ok(Document::new(lines))
    }

    /// Parse items up to, not including, the next newline or end of file
    pub(super) fn parse_line(&mut self, in_loop: bool) -> Result<Line, ParseError> {
        let mut content = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::Newline | TokenKind::Eof => break,
                TokenKind::LeftDoubleCurly => {
                    let item = self.parse_template_block(content.is_empty(), in_loop)?;
                    content.push(item);
                }
                TokenKind::Text => {
                    let token = self.advance()?;
                    content.push(LineItem::Text(token.lexeme));
                }
                _ => return Err(self.new_unexpected_token("text, '{{' or newline")),
            }
        }
        Ok(Line::new(content))
    }

    fn parse_template_block(
        &mut self,
        line_is_empty: bool,
        in_loop: bool,
    ) -> Result<LineItem, ParseError> {
        self.tokens.trim_whitespace();
        self.advance()?; // '{{'

        match self.peek_kind() {
            TokenKind::EndForeach => Err(self.syntax_error(
                SyntaxErrorKind::UnexpectedEndforeach,
                "Found 'endforeach' without a matching 'foreach'".to_string(),
            )),
            TokenKind::Foreach if in_loop => Err(self.syntax_error(
                SyntaxErrorKind::NestedForeach,
                "Loops cannot be nested: 'foreach' inside a 'foreach' body".to_string(),
            )),
            TokenKind::Foreach if !line_is_empty => Err(self.syntax_error(
                SyntaxErrorKind::MisplacedForeach,
                "A 'foreach' block must be the only content of its line".to_string(),
            )),
            TokenKind::Foreach => self.parse_foreach().map(LineItem::ForEach),
            _ => {
                let expr = self.parse_expression()?;
                self.close_block()?;
                Ok(LineItem::ExpressionBlock(expr))
            }
        }
    }

    // foreachBlock := "{{" "foreach" IDENT "in" IDENT "}}" NEWLINE (line NEWLINE)* "{{" "endforeach" "}}"
    fn parse_foreach(&mut self) -> Result<ForEachBlock, ParseError> {
        self.consume(TokenKind::Foreach)?;
        let iterand = self.consume(TokenKind::Text)?.lexeme;
        self.consume(TokenKind::In)?;
        let iterator = self.consume(TokenKind::Text)?.lexeme;
        self.close_block()?;
        if !self.peek_kind_is(TokenKind::Newline) {
            return Err(self.new_unexpected_token("newline after the 'foreach' block"));
        }
        self.advance()?;

        let mut body = Vec::new();
        loop {
            if self.peek_kind_is(TokenKind::LeftDoubleCurly) && self.at_endforeach()? {
                break;
            }
            if self.peek_kind_is(TokenKind::Eof) {
                return Err(self.unterminated(&iterand));
            }
            body.push(self.parse_line(true)?);
            if self.peek_kind_is(TokenKind::Eof) {
                return Err(self.unterminated(&iterand));
            }
            self.advance()?; // newline
        }

        Ok(ForEachBlock {
            iterand,
            iterator,
            body,
        })
    }

    /// Look past a `{{` at the start of a body line.
    ///
    /// Consumes `{{ endforeach }}` and returns true. Otherwise the lookahead
    /// is pushed back, leaving the parser on the `{{` in keep mode.
    fn at_endforeach(&mut self) -> Result<bool, ParseError> {
        self.tokens.trim_whitespace();
        let open = self.advance()?;

        match self.peek_kind() {
            TokenKind::EndForeach => {
                self.advance()?;
                self.close_block()?;
                if !matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Eof) {
                    return Err(self.new_unexpected_token("newline after the 'endforeach' block"));
                }
                Ok(true)
            }
            TokenKind::Foreach => Err(self.syntax_error(
                SyntaxErrorKind::NestedForeach,
                "Loops cannot be nested: 'foreach' inside a 'foreach' body".to_string(),
            )),
            _ => {
                let lookahead = std::mem::replace(&mut self.current, open);
                self.tokens.push_back(lookahead);
                self.tokens.keep_whitespace();
                tracing::trace!(line = self.current.line, "foreach body: restoring lookahead");
                Ok(false)
            }
        }
    }

    fn unterminated(&self, iterand: &str) -> ParseError {
        self.syntax_error(
            SyntaxErrorKind::UnterminatedForeach,
            format!(
                "Reached end of file before 'endforeach' closing the loop over '{}'",
                iterand
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::ast::{BinaryOp, Expr, ForEachBlock, Line, LineItem};
    use pretty_assertions::assert_eq;

    fn to_document(source: &str) -> Result<Document, ParseError> {
        parse(source, &TemplateLimits::default())
    }

    fn error_kind(source: &str) -> Option<SyntaxErrorKind> {
        to_document(source).unwrap_err().kind()
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(to_document("").unwrap(), Document::default());
    }

    #[test]
    fn test_text_line() {
        let doc = to_document("Hello, world").unwrap();
        assert_eq!(
            doc,
            Document::new(vec![Line::new(vec![LineItem::text("Hello, world")])])
        );
    }

    #[test]
    fn test_trailing_newline_adds_one_empty_line() {
        let doc = to_document("a\n").unwrap();
        assert_eq!(
            doc,
            Document::new(vec![Line::new(vec![LineItem::text("a")]), Line::default()])
        );
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let doc = to_document("a\n\nb").unwrap();
        assert_eq!(doc.lines.len(), 3);
        assert_eq!(doc.lines[1], Line::default());
    }

    #[test]
    fn test_expression_block_between_text() {
        let doc = to_document("Value: {{ slot }}!").unwrap();
        assert_eq!(
            doc,
            Document::new(vec![Line::new(vec![
                LineItem::text("Value: "),
                LineItem::ExpressionBlock(Expr::ident("slot")),
                LineItem::text("!"),
            ])])
        );
    }

    #[test]
    fn test_text_after_block_keeps_its_spaces() {
        let doc = to_document("{{ a }} and {{ b }}").unwrap();
        assert_eq!(
            doc.lines[0].content[1],
            LineItem::text(" and "),
        );
    }

    #[test]
    fn test_foreach_block() {
        let source = "{{ foreach num in num_list }}\n    {{ factor }} * {{ num }} = {{ factor * num }}\n{{ endforeach }}";
        let doc = to_document(source).unwrap();
        let expected = Document::new(vec![Line::new(vec![LineItem::ForEach(ForEachBlock {
            iterand: "num".to_string(),
            iterator: "num_list".to_string(),
            body: vec![Line::new(vec![
                LineItem::text("    "),
                LineItem::ExpressionBlock(Expr::ident("factor")),
                LineItem::text(" * "),
                LineItem::ExpressionBlock(Expr::ident("num")),
                LineItem::text(" = "),
                LineItem::ExpressionBlock(Expr::binary(
                    Expr::ident("factor"),
                    BinaryOp::Multiply,
                    Expr::ident("num"),
                )),
            ])],
        })])]);
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_foreach_body_line_starting_with_block() {
        let doc = to_document("{{ foreach x in xs }}\n{{ x }} item\n{{ endforeach }}\nafter").unwrap();
        let LineItem::ForEach(block) = &doc.lines[0].content[0] else {
            panic!("expected a foreach block");
        };
        assert_eq!(
            block.body,
            vec![Line::new(vec![
                LineItem::ExpressionBlock(Expr::ident("x")),
                LineItem::text(" item"),
            ])]
        );
        assert_eq!(doc.lines[1], Line::new(vec![LineItem::text("after")]));
    }

    #[test]
    fn test_foreach_with_empty_body() {
        let doc = to_document("{{ foreach x in xs }}\n{{ endforeach }}").unwrap();
        let LineItem::ForEach(block) = &doc.lines[0].content[0] else {
            panic!("expected a foreach block");
        };
        assert!(block.body.is_empty());
    }

    #[test]
    fn test_nested_foreach() {
        let source = "{{ foreach a in as }}\n{{ foreach b in bs }}\n{{ endforeach }}\n{{ endforeach }}";
        assert_eq!(error_kind(source), Some(SyntaxErrorKind::NestedForeach));
        let source = "{{ foreach a in as }}\nx {{ foreach b in bs }}\n{{ endforeach }}";
        assert_eq!(error_kind(source), Some(SyntaxErrorKind::NestedForeach));
    }

    #[test]
    fn test_unterminated_foreach() {
        assert_eq!(
            error_kind("{{ foreach a in as }}\nbody\n"),
            Some(SyntaxErrorKind::UnterminatedForeach)
        );
        assert_eq!(
            error_kind("{{ foreach a in as }}\nbody"),
            Some(SyntaxErrorKind::UnterminatedForeach)
        );
    }

    #[test]
    fn test_misplaced_foreach() {
        assert_eq!(
            error_kind("text {{ foreach a in as }}\n{{ endforeach }}"),
            Some(SyntaxErrorKind::MisplacedForeach)
        );
        assert_eq!(
            error_kind("{{ 1 + foreach }}"),
            Some(SyntaxErrorKind::MisplacedForeach)
        );
    }

    #[test]
    fn test_stray_endforeach() {
        assert_eq!(
            error_kind("{{ endforeach }}"),
            Some(SyntaxErrorKind::UnexpectedEndforeach)
        );
    }

    #[test]
    fn test_foreach_header_needs_newline() {
        let err = to_document("{{ foreach a in as }} text\n{{ endforeach }}").unwrap_err();
        assert_eq!(err.kind(), Some(SyntaxErrorKind::UnexpectedToken));
        assert!(err.to_string().contains("newline"));
    }

    #[test]
    fn test_content_after_endforeach() {
        let err = to_document("{{ foreach a in as }}\n{{ endforeach }} tail").unwrap_err();
        assert_eq!(err.kind(), Some(SyntaxErrorKind::UnexpectedToken));
    }

    #[test]
    fn test_unclosed_block() {
        let err = to_document("{{ a b }}").unwrap_err();
        assert_eq!(err.kind(), Some(SyntaxErrorKind::UnexpectedToken));
        assert!(err.to_string().contains("Expected '}}'"));
    }

    #[test]
    fn test_stray_closing_delimiter() {
        assert_eq!(
            error_kind("text }} more"),
            Some(SyntaxErrorKind::UnexpectedToken)
        );
    }
}
