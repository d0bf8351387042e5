mod context;
mod expr;
mod parser;
mod tree;

pub use context::SubroutineKind;
pub use expr::*;
pub use parser::*;
pub use tree::SyntaxTree;
