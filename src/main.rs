use std::{fs, io::Write, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use clap_stdin::FileOrStdin;
use jackc::lexer::{xml, Lexer};

/// Compiles one Jack class into VM code.
#[derive(Parser, Debug)]
#[command(name = "jackc", version)]
struct Cli {
    /// Source file, or `-` for stdin
    input: FileOrStdin,

    /// Write the output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the token stream as XML instead of compiling
    #[arg(long, conflicts_with = "xml")]
    tokens: bool,

    /// Print the parse tree as XML instead of compiling
    #[arg(long)]
    xml: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Output {
    Vm,
    Tokens,
    SyntaxTree,
}

impl Cli {
    fn output_kind(&self) -> Output {
        if self.tokens {
            Output::Tokens
        } else if self.xml {
            Output::SyntaxTree
        } else {
            Output::Vm
        }
    }
}

fn render(kind: Output, filename: &str, source: &str) -> anyhow::Result<String> {
    let output = match kind {
        Output::Vm => jackc::compile_to_vm(source),
        Output::Tokens => Lexer::tokenize(source).map(|tokens| xml::tokens_to_xml(&tokens)),
        Output::SyntaxTree => jackc::syntax_tree_xml(source),
    };
    output.with_context(|| format!("Failed to compile {}", filename))
}

fn log_level(verbose: u8) -> log::Level {
    match verbose {
        0 => log::Level::Warn,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    simple_logger::init_with_level(log_level(cli.verbose))?;

    let kind = cli.output_kind();
    let filename = cli.input.filename().to_string();
    let source = cli
        .input
        .contents()
        .with_context(|| format!("Failed to read {}", filename))?;

    let output = render(kind, &filename, &source)?;

    match cli.output {
        Some(path) => fs::write(&path, output)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => std::io::stdout()
            .write_all(output.as_bytes())
            .context("Failed to write to stdout")?,
    }
    Ok(())
}
