use anyhow::{Context, Result};
use std::fs::read_to_string;
use std::ops::Range;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use wnuteval::{evaluate_conf, Delimiter, EvalConfigBuilder};

use clap::Parser;

#[derive(Debug, Parser)]
struct Args {
    #[arg(short, long, default_value_t = 1)]
    n_samples: u32,
    #[arg(short, long, default_value = "./data/datasets/wnut17_test.conll")]
    dataset: PathBuf,
    #[arg(short, long, default_value_t = 1)]
    system: usize,
    #[arg(long, default_value_t = Delimiter::Tab)]
    delimiter: Delimiter,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let n_samples = args.n_samples;
    let iter = Range {
        start: 0,
        end: n_samples,
    };
    let content = read_to_string(&args.dataset)
        .with_context(|| format!("could not read {}", args.dataset.display()))?;
    let config = EvalConfigBuilder::new()
        .system(args.system)
        .delimiter(args.delimiter)
        .build();
    let mut total_duration = Duration::ZERO;
    for _ in iter {
        let now = Instant::now();
        {
            evaluate_conf(content.lines(), &config)?;
        }
        let elapsed = now.elapsed();
        total_duration += elapsed;
    }
    println!(
        "Total duration: {} with {n_samples} samples",
        total_duration.as_secs_f64()
    );
    Ok(())
}
