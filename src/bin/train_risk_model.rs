//! Train the risk classifier on the synthetic workforce
//!
//! Usage: cargo run --bin train_risk_model -- --config impulso.toml --trees 600 --features core

use anyhow::{Context, Result};
use clap::Parser;
use impulso_risk::config::Config;
use impulso_risk::data::PopulationGenerator;
use impulso_risk::features::FeatureSet;
use impulso_risk::logging::setup_logging;
use impulso_risk::training::RiskClassifier;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Train the risk level classifier")]
struct Args {
    /// TOML configuration file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of trees (overrides the config)
    #[arg(short, long)]
    trees: Option<usize>,

    /// Feature set: core or extended (overrides the config)
    #[arg(short, long)]
    features: Option<FeatureSet>,

    /// Maximum tree depth (overrides the config)
    #[arg(long)]
    max_depth: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(trees) = args.trees {
        config.forest.n_trees = trees;
    }
    if let Some(features) = args.features {
        config.training.features = features;
    }
    if args.max_depth.is_some() {
        config.forest.max_depth = args.max_depth;
    }
    config.validate().context("invalid configuration")?;

    setup_logging(&config.logging.level);

    println!("===========================================");
    println!("  Risk Classifier Training - Impulso");
    println!("===========================================\n");

    info!(n = config.population.n, seed = config.population.seed, "Generating population");
    let population = PopulationGenerator::new(config.population)?
        .generate()
        .context("failed to generate population")?;

    println!(
        "Population: {} employees, features: {}",
        population.len(),
        config.training.features
    );
    println!(
        "Training Random Forest with {} trees...\n",
        config.forest.n_trees
    );

    let start_time = std::time::Instant::now();
    let model = RiskClassifier::train(&population, &config.training, &config.forest)
        .context("training failed")?;
    let training_time = start_time.elapsed();

    println!("Training completed in {:.2}s\n", training_time.as_secs_f64());

    let report = model.report();
    println!("Train set: {} samples", report.train_size);
    println!("Test set:  {} samples\n", report.test_size);

    println!("=== Model Evaluation ===\n");
    println!("Test Accuracy: {:.2}%", report.test_accuracy * 100.0);
    if let Some(oob) = report.oob_score {
        println!("OOB Score:     {:.2}%", oob * 100.0);
    }

    println!("\n=== Confusion Matrix ===\n");
    print!("{}", report.confusion);

    println!("\n=== Classification Report ===\n");
    print!("{}", report.classification);

    println!("\n=== Feature Importance Ranking ===\n");
    for (i, (name, imp)) in model.feature_importance_ranking().iter().enumerate() {
        let bar = "█".repeat((imp * 40.0) as usize);
        println!("{:2}. {:25} {:.4} {}", i + 1, name, imp, bar);
    }

    println!("\nTraining complete!");

    Ok(())
}
