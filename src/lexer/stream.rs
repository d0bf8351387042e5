use crate::error::{CompileError, ErrorKind, Position};

use super::{Keyword, Symbol, Token, TokenKind, TokenType};

/// Forward-only cursor over a lexed source with one token of lookahead.
///
/// There is no current token until the first [`TokenStream::advance`].
#[derive(Debug)]
pub struct TokenStream {
    tokens: Vec<Token>,
    current: Option<usize>,
    next: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: None,
            next: 0,
        }
    }

    pub fn has_more_tokens(&self) -> bool {
        self.next < self.tokens.len()
    }

    /// Makes the next token current. Fails when the input is exhausted.
    pub fn advance(&mut self) -> Result<(), CompileError> {
        if !self.has_more_tokens() {
            return Err(CompileError::new(self.end_pos(), ErrorKind::UnexpectedEof));
        }
        self.current = Some(self.next);
        self.next += 1;
        Ok(())
    }

    /// Moves past the current token, leaving no current token at the end of input.
    pub fn step(&mut self) {
        if self.has_more_tokens() {
            self.current = Some(self.next);
            self.next += 1;
        } else {
            self.current = None;
            self.next = self.tokens.len();
        }
    }

    /// Restarts the stream from the first token.
    pub fn reset(&mut self) {
        self.current = None;
        self.next = 0;
    }

    pub fn current(&self) -> Option<&Token> {
        self.current.map(|i| &self.tokens[i])
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.next)
    }

    /// Position of the current token, or just past the last one.
    pub fn pos(&self) -> Position {
        self.current()
            .map(|t| t.pos)
            .unwrap_or_else(|| self.end_pos())
    }

    fn end_pos(&self) -> Position {
        self.tokens.last().map(|t| t.pos).unwrap_or_default()
    }

    fn expect_current(&self) -> Result<&Token, CompileError> {
        self.current()
            .ok_or_else(|| CompileError::new(self.end_pos(), ErrorKind::UnexpectedEof))
    }

    pub fn token_kind(&self) -> Result<TokenType, CompileError> {
        Ok(self.expect_current()?.kind.token_type())
    }

    fn wrong_kind(&self, token: &Token, expected: TokenType) -> CompileError {
        CompileError::new(
            token.pos,
            ErrorKind::WrongTokenKind {
                expected,
                found: token.kind.token_type(),
            },
        )
    }

    pub fn keyword(&self) -> Result<Keyword, CompileError> {
        let token = self.expect_current()?;
        match token.kind {
            TokenKind::Keyword(k) => Ok(k),
            _ => Err(self.wrong_kind(token, TokenType::Keyword)),
        }
    }

    pub fn symbol(&self) -> Result<Symbol, CompileError> {
        let token = self.expect_current()?;
        match token.kind {
            TokenKind::Symbol(s) => Ok(s),
            _ => Err(self.wrong_kind(token, TokenType::Symbol)),
        }
    }

    pub fn int_value(&self) -> Result<u16, CompileError> {
        let token = self.expect_current()?;
        match token.kind {
            TokenKind::IntConst(n) => Ok(n),
            _ => Err(self.wrong_kind(token, TokenType::IntConst)),
        }
    }

    pub fn string_value(&self) -> Result<&str, CompileError> {
        let token = self.expect_current()?;
        match &token.kind {
            TokenKind::StringConst(s) => Ok(s),
            _ => Err(self.wrong_kind(token, TokenType::StringConst)),
        }
    }

    pub fn identifier(&self) -> Result<&str, CompileError> {
        let token = self.expect_current()?;
        match &token.kind {
            TokenKind::Identifier(name) => Ok(name),
            _ => Err(self.wrong_kind(token, TokenType::Identifier)),
        }
    }
}
