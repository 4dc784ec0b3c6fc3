//! Generate the synthetic workforce and export it
//!
//! Usage: cargo run --bin generate_population -- --n 800 --seed 123 --output population.csv

use anyhow::{bail, Context, Result};
use clap::Parser;
use impulso_risk::data::{GeneratorOptions, PopulationGenerator, SamplingProfile};
use impulso_risk::logging::setup_logging;
use impulso_risk::summary::LevelDistribution;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a synthetic employee population")]
struct Args {
    /// Number of employees
    #[arg(short, long, default_value = "800")]
    n: usize,

    /// Random seed
    #[arg(short, long, default_value = "123")]
    seed: u64,

    /// Output file (.csv or .json)
    #[arg(short, long, default_value = "population.csv")]
    output: PathBuf,

    /// Sample departments uniformly instead of the weighted mix
    #[arg(long)]
    balanced: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level);

    println!("===========================================");
    println!("  Population Generator - Impulso");
    println!("===========================================\n");

    let profile = if args.balanced {
        SamplingProfile::balanced()
    } else {
        SamplingProfile::canonical()
    };
    let generator =
        PopulationGenerator::with_profile(GeneratorOptions::new(args.n, args.seed), profile)
            .context("invalid generator options")?;
    let population = generator.generate().context("failed to generate population")?;

    println!("Generated {} employees (seed {})\n", population.len(), args.seed);

    let distribution = LevelDistribution::from_population(&population);
    for (level, count) in &distribution.counts {
        println!(
            "{:8} {:5} ({:.1}%)",
            level.as_str(),
            count,
            distribution.shares[level] * 100.0
        );
    }

    println!();
    for (department, count) in population.department_counts() {
        println!("{:12} {:5}", department.as_str(), count);
    }

    let extension = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let written = match extension.as_deref() {
        Some("csv") => population.save_csv(&args.output),
        Some("json") => population.save_json(&args.output),
        _ => bail!(
            "unsupported output format for {}; use .csv or .json",
            args.output.display()
        ),
    };
    written.with_context(|| format!("failed to write {}", args.output.display()))?;

    info!(path = %args.output.display(), "Population exported");
    println!("\nSaved to {}", args.output.display());

    Ok(())
}
