use std::borrow::Cow;
use std::fmt;

use crate::limits::TemplateLimits;
use crate::value::Number;

// Token types

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Block delimiters
    LeftDoubleCurly,  // {{
    RightDoubleCurly, // }}

    // Operators and punctuation (only produced inside blocks)
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /
    LParen, // (
    RParen, // )
    Comma,  // ,
    Dot,    // .

    // Literals
    Text,   // literal text outside blocks, slot or function name inside
    Number, // 42 or 3.14

    // Keywords
    Foreach,
    In,
    EndForeach,

    Newline,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::LeftDoubleCurly => "'{{'",
            TokenKind::RightDoubleCurly => "'}}'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Text => "text",
            TokenKind::Number => "number",
            TokenKind::Foreach => "'foreach'",
            TokenKind::In => "'in'",
            TokenKind::EndForeach => "'endforeach'",
            TokenKind::Newline => "newline",
            TokenKind::Eof => "end of file",
        };
        f.write_str(name)
    }
}

/// Parsed value carried by `Text` and `Number` tokens
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Number(Number),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String, // Raw source text of the token
    pub literal: Option<Literal>,
    pub line: usize,   // 1-indexed
    pub column: usize, // 1-indexed
}

impl Token {
    fn new(kind: TokenKind, lexeme: &str, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.to_string(),
            literal: None,
            line,
            column,
        }
    }

    /// Text payload of a `Text` token
    pub fn text(&self) -> Option<&str> {
        match &self.literal {
            Some(Literal::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Numeric payload of a `Number` token
    pub fn number(&self) -> Option<Number> {
        match &self.literal {
            Some(Literal::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{} {:?}", self.line, self.column, self.kind, self.lexeme)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("Lexical error at line {line}: unexpected character {character:?}")]
    UnexpectedCharacter { character: char, line: usize },
    #[error("Input too large: {size} bytes (max: {max} bytes)")]
    InputTooLarge { size: usize, max: usize },
    #[error("Lexical error at line {line}: token limit exceeded (max: {max})")]
    TooManyTokens { max: usize, line: usize },
    #[error("Lexical error at line {line}: identifier too long: {length} bytes (max: {max} bytes)")]
    IdentifierTooLong { length: usize, max: usize, line: usize },
    #[error("Lexical error at line {line}: number out of range: {text}")]
    NumberOutOfRange { text: String, line: usize },
}

// Scanner

/// Lazy tokenizer with an externally driven whitespace mode.
///
/// In keep mode (the default) text is accumulated verbatim until a newline or
/// a `{{`/`}}` delimiter. In trim mode, used inside blocks, horizontal
/// whitespace is skipped and the remaining characters are grouped into runs
/// that are classified as operators, numbers, keywords or names.
pub struct Scanner<'a> {
    source: Cow<'a, str>,
    pos: usize,
    line: usize,
    line_start: usize, // byte offset of the current line
    trim_whitespace: bool,
    limits: &'a TemplateLimits,
    token_count: usize,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, limits: &'a TemplateLimits) -> Result<Self, LexError> {
        if source.len() > limits.max_input_size {
            return Err(LexError::InputTooLarge {
                size: source.len(),
                max: limits.max_input_size,
            });
        }

        let source = if source.contains("\r\n") {
            Cow::Owned(source.replace("\r\n", "\n"))
        } else {
            Cow::Borrowed(source)
        };

        Ok(Self {
            source,
            pos: 0,
            line: 1,
            line_start: 0,
            trim_whitespace: false,
            limits,
            token_count: 0,
            finished: false,
        })
    }

    /// Skip horizontal whitespace and split runs on operators (inside a block)
    pub fn trim_whitespace(&mut self) {
        tracing::trace!(line = self.line, "scanner: trim mode");
        self.trim_whitespace = true;
    }

    /// Keep whitespace as part of literal text (outside a block)
    pub fn keep_whitespace(&mut self) {
        tracing::trace!(line = self.line, "scanner: keep mode");
        self.trim_whitespace = false;
    }

    pub fn is_trimming(&self) -> bool {
        self.trim_whitespace
    }

    // Character navigation methods

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_char2(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn consume_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    // Byte based; any non-ASCII character is rejected before it forms a token
    fn column(&self) -> usize {
        self.pos - self.line_start + 1
    }

    fn at_delimiter(&self) -> bool {
        matches!(
            (self.peek_char(), self.peek_char2()),
            (Some('{'), Some('{')) | (Some('}'), Some('}'))
        )
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if is_blank(c) {
                self.consume_char();
            } else {
                break;
            }
        }
    }

    // Main tokenization method

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if self.token_count >= self.limits.max_token_count {
            return Err(LexError::TooManyTokens {
                max: self.limits.max_token_count,
                line: self.line,
            });
        }

        if self.trim_whitespace {
            self.skip_whitespace();
        }

        let line = self.line;
        let column = self.column();
        let token = match self.peek_char() {
            None => Token::new(TokenKind::Eof, "", line, column),
            Some('\n') => {
                self.consume_char();
                self.line += 1;
                self.line_start = self.pos;
                Token::new(TokenKind::Newline, "\n", line, column)
            }
            Some('{') if self.peek_char2() == Some('{') => {
                self.pos += 2;
                Token::new(TokenKind::LeftDoubleCurly, "{{", line, column)
            }
            Some('}') if self.peek_char2() == Some('}') => {
                self.pos += 2;
                Token::new(TokenKind::RightDoubleCurly, "}}", line, column)
            }
            Some(c) if is_printable(c) => self.lex_run()?,
            Some(c) => {
                return Err(LexError::UnexpectedCharacter { character: c, line });
            }
        };

        self.token_count += 1;
        Ok(token)
    }

    // Run accumulation

    fn lex_run(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let column = self.column();
        let first = self.consume_char();

        // Parens and commas never join a run inside a block
        let standalone = self.trim_whitespace && first.is_some_and(is_separator);
        if !standalone {
            while let Some(c) = self.peek_char() {
                if self.at_delimiter() || !self.continues_run(c) {
                    break;
                }
                self.consume_char();
            }
        }

        let lexeme = &self.source[start..self.pos];
        if !self.trim_whitespace {
            return Ok(Token {
                kind: TokenKind::Text,
                lexeme: lexeme.to_string(),
                literal: Some(Literal::Text(lexeme.to_string())),
                line: self.line,
                column,
            });
        }
        classify_run(lexeme, self.line, column, self.limits)
    }

    fn continues_run(&self, c: char) -> bool {
        if self.trim_whitespace {
            c.is_ascii_graphic() && !is_separator(c)
        } else {
            is_printable(c) && c != '\n'
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, LexError>;

    /// Yields tokens up to and including a single `Eof`
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        if matches!(&result, Ok(token) if token.kind == TokenKind::Eof) || result.is_err() {
            self.finished = true;
        }
        Some(result)
    }
}

/// Classify a run collected in trim mode
fn classify_run(
    run: &str,
    line: usize,
    column: usize,
    limits: &TemplateLimits,
) -> Result<Token, LexError> {
    let kind = match run {
        "+" => TokenKind::Plus,
        "-" => TokenKind::Minus,
        "*" => TokenKind::Star,
        "/" => TokenKind::Slash,
        "(" => TokenKind::LParen,
        ")" => TokenKind::RParen,
        "," => TokenKind::Comma,
        "." => TokenKind::Dot,
        "foreach" => TokenKind::Foreach,
        "in" => TokenKind::In,
        "endforeach" => TokenKind::EndForeach,
        _ if is_float_literal(run) => {
            let value = run.parse::<f64>().map_err(|_| LexError::NumberOutOfRange {
                text: run.to_string(),
                line,
            })?;
            return Ok(number_token(run, Number::Float(value), line, column));
        }
        _ if run.bytes().all(|b| b.is_ascii_digit()) => {
            let value = run.parse::<i64>().map_err(|_| LexError::NumberOutOfRange {
                text: run.to_string(),
                line,
            })?;
            return Ok(number_token(run, Number::Int(value), line, column));
        }
        _ => {
            if run.len() > limits.max_identifier_length {
                return Err(LexError::IdentifierTooLong {
                    length: run.len(),
                    max: limits.max_identifier_length,
                    line,
                });
            }
            return Ok(Token {
                kind: TokenKind::Text,
                lexeme: run.to_string(),
                literal: Some(Literal::Text(run.to_string())),
                line,
                column,
            });
        }
    };
    Ok(Token::new(kind, run, line, column))
}

fn number_token(run: &str, value: Number, line: usize, column: usize) -> Token {
    Token {
        kind: TokenKind::Number,
        lexeme: run.to_string(),
        literal: Some(Literal::Number(value)),
        line,
        column,
    }
}

/// Optional minus, digits, a dot, digits
fn is_float_literal(run: &str) -> bool {
    let unsigned = run.strip_prefix('-').unwrap_or(run);
    match unsigned.split_once('.') {
        Some((int, frac)) => {
            !int.is_empty()
                && !frac.is_empty()
                && int.bytes().all(|b| b.is_ascii_digit())
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\x0b' | '\x0c')
}

fn is_printable(c: char) -> bool {
    c.is_ascii_graphic() || c == '\n' || is_blank(c)
}

fn is_separator(c: char) -> bool {
    matches!(c, '(' | ')' | ',')
}

/// Scan a whole template in keep mode, up to and including `Eof`
pub fn scan(source: &str, limits: &TemplateLimits) -> Result<Vec<Token>, LexError> {
    Scanner::new(source, limits)?.collect()
}

// Tests
