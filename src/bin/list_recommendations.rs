//! List the action-plan recommendations
//!
//! Usage: cargo run --bin list_recommendations -- --priority high --status pending

use anyhow::{Context, Result};
use clap::Parser;
use impulso_risk::logging::setup_logging;
use impulso_risk::recommendations::{
    Priority, RecommendationCatalog, RecommendationFilter, Status,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "List action-plan recommendations")]
struct Args {
    /// pending, in_progress or completed
    #[arg(short, long)]
    status: Option<Status>,

    /// high, medium or low
    #[arg(short, long)]
    priority: Option<Priority>,

    /// Category name
    #[arg(short, long)]
    category: Option<String>,
}

fn main() -> Result<()> {
    setup_logging("warn");
    let args = Args::parse();

    let catalog = RecommendationCatalog::builtin().context("failed to parse the catalog")?;
    let filter = RecommendationFilter {
        status: args.status,
        priority: args.priority,
        category: args.category,
    };
    let matches = catalog.filter(&filter);

    println!("===========================================");
    println!("  Action Plan - Impulso");
    println!("===========================================\n");
    println!("Categories: {}\n", catalog.categories().join(", "));

    if matches.is_empty() {
        println!("No recommendations match the current filters.");
        return Ok(());
    }

    for rec in matches {
        println!("[{}] {} ({})", rec.priority, rec.title, rec.status);
        println!("    {}", rec.summary);
        println!("    {}", rec.description);
        println!("    Target: {}", rec.target);
        println!("    Impact: {}", rec.impact);
        println!(
            "    Owner:  {}  created {}  due {}",
            rec.owner, rec.created, rec.due
        );
        if !rec.tags.is_empty() {
            println!("    Tags:   {}", rec.tags.join(", "));
        }
        println!();
    }

    Ok(())
}
