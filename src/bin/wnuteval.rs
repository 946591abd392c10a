//! wnuteval CLI: scores one system column of a CoNLL file and prints both reports.

use std::fs::read_to_string;
use std::io::{read_to_string as read_all, stdin};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use wnuteval::{evaluate_conf, Delimiter, EvalConfigBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// The CoNLL style report
    Text,
    /// Both reports as a JSON object
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "wnuteval",
    version,
    about = "Entity and surface form evaluation of BIO tagged NER output"
)]
struct Args {
    /// Annotated file. Reads from stdin when absent
    file: Option<PathBuf>,

    /// System column to score, counting from 1
    #[arg(short, long, default_value_t = 1)]
    system: usize,

    /// Field delimiter: tab or whitespace
    #[arg(short, long, default_value_t = Delimiter::Tab)]
    delimiter: Delimiter,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn run(args: Args) -> Result<()> {
    let content = match &args.file {
        Some(path) => {
            read_to_string(path).with_context(|| format!("could not read {}", path.display()))?
        }
        None => read_all(stdin()).context("could not read the standard input")?,
    };
    let config = EvalConfigBuilder::new()
        .system(args.system)
        .delimiter(args.delimiter)
        .build();
    tracing::debug!("{}", config);
    let evaluation = evaluate_conf(content.lines(), &config)?;
    match args.format {
        Format::Text => print!("{}", evaluation),
        Format::Json => println!("{}", serde_json::to_string_pretty(&evaluation)?),
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wnuteval=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
