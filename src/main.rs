//! Command-line interface for the `tablex` parsing engine.
//!
//! Two subcommands wrap the library pipeline: `tokens` scans a source
//! file and dumps the token stream with its symbol codes; `parse` loads
//! an automaton description and reports whether a source file is a
//! sentence of its grammar.

use anyhow::Context;
use clap::{Parser as ClapParser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tablex::{parse_source, symbol_code, tokenize, Automaton};

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scans a source file and dumps the token stream
    Tokens {
        /// Input source file
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Parses a source file against an automaton description
    Parse {
        /// Automaton description file
        #[arg(short, long)]
        grammar: PathBuf,

        /// Input source file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    match args.command {
        Commands::Tokens { input } => dump_tokens(&input),
        Commands::Parse { grammar, input } => run_parse(&grammar, &input),
    }
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("can't read {}", path.display()))
}

fn dump_tokens(input: &Path) -> anyhow::Result<()> {
    let source = read_source(input)?;
    let tokens = tokenize(&source)?;
    for token in &tokens {
        let code = symbol_code(token)?;
        println!(
            "{:>8}  {:<8}  {:<16}  {}",
            token.position.to_string(),
            format!("{:?}", token.kind),
            format!("{:?}", token.text.as_str()),
            code
        );
    }
    println!("{} tokens", tokens.len());
    Ok(())
}

fn run_parse(grammar: &Path, input: &Path) -> anyhow::Result<()> {
    let automaton = Automaton::from_path(grammar)
        .with_context(|| format!("can't load {}", grammar.display()))?;
    println!("{automaton}");

    let source = read_source(input)?;
    let stats = parse_source(&automaton, &source)?;
    println!(
        "accepted: {} shifts, {} reductions, {} steps",
        stats.shifts, stats.reductions, stats.steps
    );
    Ok(())
}
