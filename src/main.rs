//! Print the syntax tree of an EBNF grammar.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ebnf::Dialect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// The syntax tree as JSON.
    Json,
    /// The grammar reprinted in canonical form.
    Grammar,
}

#[derive(Debug, Parser)]
#[command(name = "ebnf2tree", about = "Parse an EBNF grammar into a syntax tree")]
struct Args {
    /// Grammar notation of the input: iso or w3c.
    #[arg(short, long, default_value = "iso")]
    dialect: Dialect,

    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Print JSON on a single line.
    #[arg(long)]
    compact: bool,

    /// Grammar file to read. Reads stdin when absent or "-".
    file: Option<PathBuf>,
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("read grammar file: {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("read grammar from stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let input = read_input(args.file.as_ref())?;
    debug!(dialect = %args.dialect, bytes = input.len(), "parsing grammar");

    let grammar = ebnf::parse(args.dialect, &input)
        .with_context(|| format!("parse {} grammar", args.dialect))?;

    match args.format {
        Format::Grammar => println!("{}", grammar),
        Format::Json if args.compact => println!("{}", serde_json::to_string(&grammar)?),
        Format::Json => println!("{}", serde_json::to_string_pretty(&grammar)?),
    }
    Ok(())
}
