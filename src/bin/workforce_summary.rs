//! Print workforce indicators for a (filtered) population
//!
//! Usage: cargo run --bin workforce_summary -- --department IT --level high

use anyhow::{Context, Result};
use clap::Parser;
use impulso_risk::data::{Department, EmployeeFilter, GeneratorOptions, PopulationGenerator};
use impulso_risk::logging::setup_logging;
use impulso_risk::scoring::RiskLevel;
use impulso_risk::summary::{DepartmentRisk, RiskFactorProfile, WorkforceSummary};

#[derive(Parser, Debug)]
#[command(author, version, about = "Summarise workforce risk indicators")]
struct Args {
    /// Number of employees
    #[arg(short, long, default_value = "800")]
    n: usize,

    /// Random seed
    #[arg(short, long, default_value = "123")]
    seed: u64,

    /// Restrict to one department
    #[arg(short, long)]
    department: Option<Department>,

    /// Restrict to one risk level
    #[arg(short, long)]
    level: Option<RiskLevel>,

    /// Case-insensitive match on name or role
    #[arg(short, long)]
    query: Option<String>,

    /// Number of highest-risk employees to list
    #[arg(long, default_value = "10")]
    top: usize,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level);

    let population = PopulationGenerator::new(GeneratorOptions::new(args.n, args.seed))
        .context("invalid generator options")?
        .generate()
        .context("failed to generate population")?;

    let mut filter = EmployeeFilter::new();
    if let Some(department) = args.department {
        filter = filter.department(department);
    }
    if let Some(level) = args.level {
        filter = filter.risk_level(level);
    }
    if let Some(query) = args.query {
        filter = filter.query(query);
    }
    let selected = population.filter(&filter);

    println!("===========================================");
    println!("  Workforce Summary - Impulso");
    println!("===========================================\n");

    if selected.is_empty() {
        println!("No employees match the current filters.");
        return Ok(());
    }

    let summary = WorkforceSummary::from_population(&selected);
    println!(
        "Headcount:              {} ({} active, {} inactive)",
        summary.headcount, summary.active, summary.inactive
    );
    println!(
        "Mean risk score:        {:.3} ({})",
        summary.mean_risk_score, summary.overall_level
    );
    println!("High risk:              {:.1}%", summary.high_risk_pct);
    println!("Mean performance:       {:.1}", summary.mean_performance);
    println!("Productivity:           {:.1}%", summary.productivity);
    println!("Goal compliance:        {:.1}%", summary.goal_compliance_pct);
    println!("Overload index:         {:.1}%", summary.overload_index);
    println!("Absenteeism rate:       {:.1}%", summary.absenteeism_rate);
    println!("Rotation rate:          {:.1}%", summary.rotation_rate);
    println!("Tasks completed:        {}", summary.tasks_completed);
    println!("Operational efficiency: {:.1}%", summary.operational_efficiency);

    println!("\n=== Alerts ===\n");
    println!("High risk employees:    {}", summary.alerts.high_risk);
    println!("Overloaded (workload > 130): {}", summary.alerts.overloaded);
    println!("Top performers (>95):   {}", summary.alerts.top_performers);

    println!("\n=== Risk Factors (% of maximum) ===\n");
    for (factor, value) in RiskFactorProfile::from_population(&selected).as_pairs() {
        let bar = "█".repeat((value / 2.5) as usize);
        println!("{:12} {:5.1} {}", factor, value, bar);
    }

    println!("\n=== Departments by High Risk ===\n");
    for row in DepartmentRisk::most_at_risk(&selected) {
        println!(
            "{:12} {:4} employees  mean {:.3}  high {:5.1}%",
            row.department.as_str(),
            row.headcount,
            row.mean_risk_score,
            row.high_risk_share * 100.0
        );
    }

    println!("\n=== Highest Risk Employees ===\n");
    for e in selected.ranked_by_risk().into_iter().take(args.top) {
        println!(
            "{:4}  {:22} {:28} {:12} {:.3} {}",
            e.id,
            e.name,
            e.role,
            e.department.as_str(),
            e.risk_score,
            e.risk_level
        );
    }

    Ok(())
}
