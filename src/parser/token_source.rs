use std::collections::VecDeque;

use crate::lexer::{LexError, Scanner, Token};

/// Scanner wrapper with a pushback buffer for one-token backtracking
pub struct TokenSource<'a> {
    scanner: Scanner<'a>,
    buffer: VecDeque<Token>,
}

impl<'a> TokenSource<'a> {
    pub fn new(scanner: Scanner<'a>) -> Self {
        Self {
            scanner,
            buffer: VecDeque::new(),
        }
    }

    /// Next buffered token, else the next token off the scanner
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        match self.buffer.pop_front() {
            Some(token) => Ok(token),
            None => self.scanner.next_token(),
        }
    }

    /// Re-deliver `token` before anything else
    pub fn push_back(&mut self, token: Token) {
        self.buffer.push_front(token);
    }

    pub fn trim_whitespace(&mut self) {
        self.scanner.trim_whitespace();
    }

    pub fn keep_whitespace(&mut self) {
        self.scanner.keep_whitespace();
    }
}
