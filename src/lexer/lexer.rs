use crate::error::{CompileError, ErrorKind, Position};

use super::{
    token::{KEYWORDS, SYMBOLS},
    Token, TokenKind,
};

const MAX_INT_CONST: u16 = 32767;
const MAX_STRING_LEN: usize = MAX_INT_CONST as usize;

#[derive(Debug)]
pub struct Lexer {
    chars: Vec<char>,
    tokens: Vec<Token>,
    index: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    fn new(s: &str) -> Self {
        Self {
            chars: s.chars().collect(),
            tokens: vec![],
            index: 0,
            line: 1,
            column: 1,
        }
    }

    fn pos(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.index += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn new_token(&mut self, kind: TokenKind, pos: Position) {
        self.tokens.push(Token { kind, pos });
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    /// Skips `/* ... */` and `/** ... */`. Block comments do not nest.
    fn skip_block_comment(&mut self) -> Result<(), CompileError> {
        let start = self.pos();
        self.bump();
        self.bump();
        loop {
            match (self.peek(0), self.peek(1)) {
                (Some('*'), Some('/')) => {
                    self.bump();
                    self.bump();
                    return Ok(());
                }
                (Some(_), _) => {
                    self.bump();
                }
                (None, _) => {
                    return Err(CompileError::new(start, ErrorKind::UnterminatedComment));
                }
            }
        }
    }

    fn parse_string(&mut self) -> Result<(), CompileError> {
        let start = self.pos();
        self.bump();
        let mut s = String::new();
        loop {
            match self.peek(0) {
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\n') | Some('\r') | None => {
                    return Err(CompileError::new(start, ErrorKind::UnterminatedString));
                }
                Some(c) if u32::from(c) > u32::from(MAX_INT_CONST) => {
                    return Err(CompileError::new(
                        self.pos(),
                        ErrorKind::CharacterOutOfRange(c),
                    ));
                }
                Some(c) => {
                    s.push(c);
                    self.bump();
                }
            }
        }

        let len = s.chars().count();
        if len > MAX_STRING_LEN {
            return Err(CompileError::new(start, ErrorKind::StringTooLong(len)));
        }
        self.new_token(TokenKind::StringConst(s), start);
        Ok(())
    }

    fn parse_number(&mut self) -> Result<(), CompileError> {
        let start = self.pos();
        let mut s = String::new();
        while let Some(c) = self.peek(0).filter(|c| c.is_ascii_digit()) {
            s.push(c);
            self.bump();
        }
        let value = s
            .parse::<u16>()
            .ok()
            .filter(|&v| v <= MAX_INT_CONST)
            .ok_or_else(|| CompileError::new(start, ErrorKind::IntegerOutOfRange(s.clone())))?;
        self.new_token(TokenKind::IntConst(value), start);
        Ok(())
    }

    fn is_word_char(c: char) -> bool {
        !c.is_whitespace() && !c.is_control() && c != '"' && !SYMBOLS.contains_key(&c)
    }

    fn parse_word(&mut self) {
        let start = self.pos();
        let mut s = String::new();
        while let Some(c) = self.peek(0).filter(|&c| Self::is_word_char(c)) {
            s.push(c);
            self.bump();
        }

        if let Some(keyword) = KEYWORDS.get(s.as_str()) {
            self.new_token(TokenKind::Keyword(*keyword), start);
        } else {
            self.new_token(TokenKind::Identifier(s), start);
        }
    }

    fn _tokenize(&mut self) -> Result<(), CompileError> {
        while let Some(c) = self.peek(0) {
            let next = self.peek(1);

            if c.is_whitespace() {
                self.bump();
            } else if c == '/' && next == Some('/') {
                self.skip_line_comment();
            } else if c == '/' && next == Some('*') {
                self.skip_block_comment()?;
            } else if c == '"' {
                self.parse_string()?;
            } else if c.is_ascii_digit() {
                self.parse_number()?;
            } else if let Some(symbol) = SYMBOLS.get(&c) {
                let pos = self.pos();
                self.new_token(TokenKind::Symbol(*symbol), pos);
                self.bump();
            } else if c.is_control() {
                return Err(CompileError::new(
                    self.pos(),
                    ErrorKind::UnexpectedCharacter(c),
                ));
            } else {
                self.parse_word();
            }
        }
        Ok(())
    }

    /// Splits `s` into tokens, dropping whitespace and all three comment forms.
    pub fn tokenize(s: &str) -> Result<Vec<Token>, CompileError> {
        let mut lexer = Lexer::new(s);
        lexer._tokenize()?;
        log::trace!("lexed {} tokens", lexer.tokens.len());

        Ok(lexer.tokens)
    }
}
