//! Workforce summaries
//!
//! Aggregate indicators computed from a (possibly filtered) population.
//! An empty population yields zeros rather than NaN.

use ndarray::Axis;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data::{Department, Employee, Population};
use crate::features::{Feature, FeatureEngine};
use crate::scoring::{RiskLevel, ABSENTEEISM_MAX, ORDINAL_MAX, WORKLOAD_MAX};

/// Workload above which an employee counts as overloaded
pub const OVERLOAD_THRESHOLD: u32 = 130;
/// Performance above which an employee counts as a top performer
pub const TOP_PERFORMANCE_THRESHOLD: f64 = 95.0;
/// Performance at or above which a goal counts as met
pub const GOAL_THRESHOLD: f64 = 85.0;

/// Counts behind the dashboard alert strip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alerts {
    pub high_risk: usize,
    pub overloaded: usize,
    pub top_performers: usize,
}

/// Headline indicators of a population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkforceSummary {
    pub headcount: usize,
    pub active: usize,
    pub inactive: usize,
    pub mean_risk_score: f64,
    /// Band of the mean risk score, using the same right-closed cutoffs as
    /// individual scores; a mean of exactly 0.33 or 0.66 takes the lower band
    pub overall_level: RiskLevel,
    pub high_risk_pct: f64,
    pub mean_performance: f64,
    pub mean_workload: f64,
    /// Mean absenteeism / 80 × 20
    pub rotation_rate: f64,
    /// Mean absenteeism / 80 × 100
    pub absenteeism_rate: f64,
    /// clip(mean performance + 6, 0, 100)
    pub productivity: f64,
    /// Share of employees with performance >= 85, in percent
    pub goal_compliance_pct: f64,
    /// Mean workload / 150 × 100
    pub overload_index: f64,
    /// (mean performance / 100) × 3000, truncated
    pub tasks_completed: u64,
    /// clip(100 - mean stress × 8, 0, 100)
    pub operational_efficiency: f64,
    pub alerts: Alerts,
}

impl WorkforceSummary {
    pub fn from_population(population: &Population) -> Self {
        let n = population.len();
        let pct = |count: usize| -> f64 {
            if n == 0 {
                0.0
            } else {
                count as f64 / n as f64 * 100.0
            }
        };

        let mean_risk_score = mean_of(population, |e| e.risk_score);
        let mean_performance = mean_of(population, |e| e.performance);
        let mean_workload = mean_of(population, |e| f64::from(e.workload));
        let mean_absenteeism = mean_of(population, |e| f64::from(e.absenteeism));
        let mean_stress = mean_of(population, |e| f64::from(e.stress));

        let high_risk = population
            .iter()
            .filter(|e| e.risk_level == RiskLevel::High)
            .count();
        let active = population.iter().filter(|e| e.is_active()).count();
        let goals_met = population
            .iter()
            .filter(|e| e.performance >= GOAL_THRESHOLD)
            .count();

        let alerts = Alerts {
            high_risk,
            overloaded: population
                .iter()
                .filter(|e| e.workload > OVERLOAD_THRESHOLD)
                .count(),
            top_performers: population
                .iter()
                .filter(|e| e.performance > TOP_PERFORMANCE_THRESHOLD)
                .count(),
        };

        Self {
            headcount: n,
            active,
            inactive: n - active,
            mean_risk_score,
            overall_level: RiskLevel::from_score(mean_risk_score),
            high_risk_pct: pct(high_risk),
            mean_performance,
            mean_workload,
            rotation_rate: mean_absenteeism / ABSENTEEISM_MAX * 20.0,
            absenteeism_rate: mean_absenteeism / ABSENTEEISM_MAX * 100.0,
            productivity: (mean_performance + 6.0).clamp(0.0, 100.0),
            goal_compliance_pct: pct(goals_met),
            overload_index: mean_workload / WORKLOAD_MAX * 100.0,
            tasks_completed: (mean_performance / 100.0 * 3000.0) as u64,
            operational_efficiency: (100.0 - mean_stress * 8.0).clamp(0.0, 100.0),
            alerts,
        }
    }
}

fn mean_of(population: &Population, f: impl Fn(&Employee) -> f64) -> f64 {
    if population.is_empty() {
        0.0
    } else {
        population.iter().map(f).sum::<f64>() / population.len() as f64
    }
}

/// Risk breakdown of one department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentRisk {
    pub department: Department,
    pub headcount: usize,
    pub mean_risk_score: f64,
    pub level_counts: BTreeMap<RiskLevel, usize>,
    /// Share of the department at High risk, in [0, 1]
    pub high_risk_share: f64,
}

impl DepartmentRisk {
    /// One entry per department with at least one employee, in department order
    pub fn breakdown(population: &Population) -> Vec<DepartmentRisk> {
        Department::ALL
            .iter()
            .filter_map(|&department| {
                let members: Vec<_> = population
                    .iter()
                    .filter(|e| e.department == department)
                    .collect();
                if members.is_empty() {
                    return None;
                }

                let headcount = members.len();
                let mut level_counts: BTreeMap<RiskLevel, usize> =
                    RiskLevel::ALL.iter().map(|&l| (l, 0)).collect();
                for e in &members {
                    *level_counts.entry(e.risk_level).or_insert(0) += 1;
                }
                let high = level_counts[&RiskLevel::High];

                Some(DepartmentRisk {
                    department,
                    headcount,
                    mean_risk_score: members.iter().map(|e| e.risk_score).sum::<f64>()
                        / headcount as f64,
                    level_counts,
                    high_risk_share: high as f64 / headcount as f64,
                })
            })
            .collect()
    }

    /// Departments ordered by descending High-risk headcount
    pub fn most_at_risk(population: &Population) -> Vec<DepartmentRisk> {
        let mut rows = Self::breakdown(population);
        rows.sort_by(|a, b| b.level_counts[&RiskLevel::High].cmp(&a.level_counts[&RiskLevel::High]));
        rows
    }
}

/// Counts and shares per risk level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDistribution {
    pub counts: BTreeMap<RiskLevel, usize>,
    /// Shares in [0, 1]; all zero for an empty population
    pub shares: BTreeMap<RiskLevel, f64>,
}

impl LevelDistribution {
    pub fn from_population(population: &Population) -> Self {
        let counts = population.level_counts();
        let n = population.len();
        let shares = counts
            .iter()
            .map(|(&level, &count)| {
                let share = if n == 0 { 0.0 } else { count as f64 / n as f64 };
                (level, share)
            })
            .collect();
        Self { counts, shares }
    }
}

/// Mean of each scoring factor as a percentage of its maximum
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskFactorProfile {
    pub stress: f64,
    pub burnout: f64,
    pub workload: f64,
    pub absenteeism: f64,
    pub anxiety: f64,
}

impl RiskFactorProfile {
    pub fn from_population(population: &Population) -> Self {
        if population.is_empty() {
            return Self::default();
        }

        let engine = FeatureEngine::with_features(vec![
            Feature::Stress,
            Feature::Burnout,
            Feature::Workload,
            Feature::Absenteeism,
            Feature::Anxiety,
        ]);
        let matrix = engine.generate(population).features_array();
        let means = match matrix.mean_axis(Axis(0)) {
            Some(means) => means,
            None => return Self::default(),
        };

        Self {
            stress: means[0] / ORDINAL_MAX * 100.0,
            burnout: means[1] / ORDINAL_MAX * 100.0,
            workload: means[2] / WORKLOAD_MAX * 100.0,
            absenteeism: means[3] / ABSENTEEISM_MAX * 100.0,
            anxiety: means[4] / ORDINAL_MAX * 100.0,
        }
    }

    /// (factor name, percentage) pairs in scoring order
    pub fn as_pairs(&self) -> [(&'static str, f64); 5] {
        [
            ("stress", self.stress),
            ("burnout", self.burnout),
            ("workload", self.workload),
            ("absenteeism", self.absenteeism),
            ("anxiety", self.anxiety),
        ]
    }
}
