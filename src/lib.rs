pub mod analyzer;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;

use codegen::Instruction;
use error::CompileError;
use lexer::Lexer;
use parser::{Parser, SyntaxTree};

/// Compiles the source of one class into VM instructions.
pub fn compile(source: &str) -> Result<Vec<Instruction>, CompileError> {
    let tokens = Lexer::tokenize(source)?;

    let mut parser = Parser::new(tokens, Vec::<Instruction>::new());
    parser.parse()?;

    Ok(parser.into_emitter())
}

/// Like [`compile`], rendered as VM text with one instruction per line.
pub fn compile_to_vm(source: &str) -> Result<String, CompileError> {
    let instructions = compile(source)?;
    Ok(instructions
        .iter()
        .map(|instr| format!("{}\n", instr))
        .collect())
}

/// Parses the source of one class and renders its parse tree as nested XML,
/// one element per production and one line per token.
pub fn syntax_tree_xml(source: &str) -> Result<String, CompileError> {
    let tokens = Lexer::tokenize(source)?;

    let mut parser = Parser::new(tokens, ()).with_syntax_tree();
    parser.parse()?;

    Ok(parser
        .take_syntax_tree()
        .map(SyntaxTree::into_xml)
        .unwrap_or_default())
}
