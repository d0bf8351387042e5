use std::fmt::Display;

use crate::lexer::TokenType;

/// A location in the source text, both components starting at 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The single error type surfaced by every stage of compilation.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("{pos}: {kind}")]
pub struct CompileError {
    pub pos: Position,
    pub kind: ErrorKind,
}

impl CompileError {
    pub fn new(pos: Position, kind: ErrorKind) -> Self {
        Self { pos, kind }
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum ErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("integer literal {0} is out of range (0..=32767)")]
    IntegerOutOfRange(String),
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("character {0:?} has no code in 0..=32767")]
    CharacterOutOfRange(char),
    #[error("string literal of {0} characters is longer than 32767")]
    StringTooLong(usize),

    #[error("expected {expected}, found {found}")]
    Expected { expected: String, found: String },
    #[error("unexpected {0} after the end of the class")]
    TrailingInput(String),

    #[error("undeclared variable '{0}'")]
    UndeclaredVariable(String),
    #[error("'{0}' is not assignable")]
    NotAssignable(String),
    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("current token is {found}, not {expected}")]
    WrongTokenKind { expected: TokenType, found: TokenType },
    #[error("unknown storage class '{0}'")]
    UnknownStorageClass(String),
}
