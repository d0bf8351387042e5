use std::fmt::Display;

use phf::phf_map;

use crate::error::Position;

pub(super) static KEYWORDS: phf::Map<&str, Keyword> = phf_map! {
    "class" => Keyword::Class,
    "constructor" => Keyword::Constructor,
    "function" => Keyword::Function,
    "method" => Keyword::Method,
    "field" => Keyword::Field,
    "static" => Keyword::Static,
    "var" => Keyword::Var,
    "int" => Keyword::Int,
    "char" => Keyword::Char,
    "boolean" => Keyword::Boolean,
    "void" => Keyword::Void,
    "true" => Keyword::True,
    "false" => Keyword::False,
    "null" => Keyword::Null,
    "this" => Keyword::This,
    "let" => Keyword::Let,
    "do" => Keyword::Do,
    "if" => Keyword::If,
    "else" => Keyword::Else,
    "while" => Keyword::While,
    "return" => Keyword::Return,
};

pub(super) static SYMBOLS: phf::Map<char, Symbol> = phf_map! {
    '{' => Symbol::LeftBrace,
    '}' => Symbol::RightBrace,
    '(' => Symbol::LeftParen,
    ')' => Symbol::RightParen,
    '[' => Symbol::LeftBracket,
    ']' => Symbol::RightBracket,
    '.' => Symbol::Dot,
    ',' => Symbol::Comma,
    ';' => Symbol::SemiColon,
    '+' => Symbol::Plus,
    '-' => Symbol::Minus,
    '*' => Symbol::Star,
    '/' => Symbol::Slash,
    '&' => Symbol::Ampersand,
    '|' => Symbol::Pipe,
    '<' => Symbol::LessThan,
    '>' => Symbol::GreaterThan,
    '=' => Symbol::Equal,
    '~' => Symbol::Tilde,
    '^' => Symbol::Caret,
    '#' => Symbol::Hash,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Class => "class",
            Keyword::Constructor => "constructor",
            Keyword::Function => "function",
            Keyword::Method => "method",
            Keyword::Field => "field",
            Keyword::Static => "static",
            Keyword::Var => "var",
            Keyword::Int => "int",
            Keyword::Char => "char",
            Keyword::Boolean => "boolean",
            Keyword::Void => "void",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::This => "this",
            Keyword::Let => "let",
            Keyword::Do => "do",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Return => "return",
        }
    }
}

/// Single-character tokens. `^` and `#` are the unary shift operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Dot,
    Comma,
    SemiColon,
    Plus,
    Minus,
    Star,
    Slash,
    Ampersand,
    Pipe,
    LessThan,
    GreaterThan,
    Equal,
    Tilde,
    Caret,
    Hash,
}

impl Symbol {
    pub fn as_char(&self) -> char {
        match self {
            Symbol::LeftBrace => '{',
            Symbol::RightBrace => '}',
            Symbol::LeftParen => '(',
            Symbol::RightParen => ')',
            Symbol::LeftBracket => '[',
            Symbol::RightBracket => ']',
            Symbol::Dot => '.',
            Symbol::Comma => ',',
            Symbol::SemiColon => ';',
            Symbol::Plus => '+',
            Symbol::Minus => '-',
            Symbol::Star => '*',
            Symbol::Slash => '/',
            Symbol::Ampersand => '&',
            Symbol::Pipe => '|',
            Symbol::LessThan => '<',
            Symbol::GreaterThan => '>',
            Symbol::Equal => '=',
            Symbol::Tilde => '~',
            Symbol::Caret => '^',
            Symbol::Hash => '#',
        }
    }

    pub fn from_char(c: char) -> Option<Symbol> {
        SYMBOLS.get(&c).copied()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Symbol(Symbol),
    IntConst(u16),
    StringConst(String),
    Identifier(String),
}

impl TokenKind {
    pub fn token_type(&self) -> TokenType {
        match self {
            TokenKind::Keyword(_) => TokenType::Keyword,
            TokenKind::Symbol(_) => TokenType::Symbol,
            TokenKind::IntConst(_) => TokenType::IntConst,
            TokenKind::StringConst(_) => TokenType::StringConst,
            TokenKind::Identifier(_) => TokenType::Identifier,
        }
    }

    /// The source text this token was read from (string literals without quotes).
    pub fn lexeme(&self) -> String {
        match self {
            TokenKind::Keyword(k) => k.as_str().to_string(),
            TokenKind::Symbol(s) => s.as_char().to_string(),
            TokenKind::IntConst(n) => n.to_string(),
            TokenKind::StringConst(s) | TokenKind::Identifier(s) => s.clone(),
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Keyword(k) => write!(f, "keyword '{}'", k.as_str()),
            TokenKind::Symbol(s) => write!(f, "symbol '{}'", s.as_char()),
            TokenKind::IntConst(n) => write!(f, "integer {}", n),
            TokenKind::StringConst(s) => write!(f, "string \"{}\"", s),
            TokenKind::Identifier(name) => write!(f, "identifier '{}'", name),
        }
    }
}

/// The five lexical categories, without payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenType {
    Keyword,
    Symbol,
    IntConst,
    StringConst,
    Identifier,
}

impl Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TokenType::Keyword => "a keyword",
            TokenType::Symbol => "a symbol",
            TokenType::IntConst => "an integer constant",
            TokenType::StringConst => "a string constant",
            TokenType::Identifier => "an identifier",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
}
