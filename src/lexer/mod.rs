mod lexer;
mod stream;
mod token;
pub mod xml;

pub use lexer::*;
pub use stream::*;
pub use token::{Keyword, Symbol, Token, TokenKind, TokenType};
