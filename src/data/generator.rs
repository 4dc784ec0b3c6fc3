//! Synthetic population generator
//!
//! Every attribute is sampled independently from a fixed distribution.
//! All randomness comes from RNGs owned by a single `generate` call, so a
//! given (n, seed, profile) always yields the same table.

use rand::distributions::WeightedIndex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::employee::{ActiveStatus, Department, Employee};
use super::population::Population;
use crate::error::{Error, Result};
use crate::scoring::{RiskInputs, RiskScorer};

/// Standard deviation of the Gaussian noise added to the risk score
pub const NOISE_STD: f64 = 0.05;

/// Seed of the stream that draws names and roles
const NAME_SEED: u64 = 321;
/// Seed of the stream that draws the active/inactive status
const STATUS_SEED: u64 = 2026;
/// Probability that an employee is active
const ACTIVE_PROBABILITY: f64 = 0.86;

const FIRST_NAMES: [&str; 20] = [
    "Ana", "Luis", "Carlos", "María", "Jorge", "Sofía", "Diego", "Lucía", "Pedro", "Valeria",
    "Miguel", "Carmen", "Fernando", "Paula", "Raúl", "Elena", "Javier", "Gabriela", "Andrés",
    "Natalia",
];

const LAST_NAMES: [&str; 20] = [
    "García", "Martínez", "López", "Hernández", "González", "Pérez", "Sánchez", "Romero",
    "Torres", "Vega", "Ruiz", "Flores", "Castro", "Ríos", "Mendoza", "Ortega", "Núñez",
    "Navarro", "Silva", "Morales",
];

/// Population size and seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Number of employees to generate
    pub n: usize,
    /// Seed of the attribute stream
    pub seed: u64,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self { n: 800, seed: 123 }
    }
}

impl GeneratorOptions {
    pub fn new(n: usize, seed: u64) -> Self {
        Self { n, seed }
    }

    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(Error::InvalidConfig(
                "population size must be greater than zero".to_string(),
            ));
        }
        if u32::try_from(self.n).is_err() {
            return Err(Error::InvalidConfig(format!(
                "population size {} exceeds the id range",
                self.n
            )));
        }
        Ok(())
    }
}

/// How departments are drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepartmentWeights {
    /// Every department equally likely
    Uniform,
    /// One weight per entry of [`Department::ALL`]
    Weighted([f64; 5]),
}

/// Distribution constants that differ between dashboard layouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingProfile {
    pub department_weights: DepartmentWeights,
    pub performance_mean: f64,
    pub performance_std: f64,
    pub performance_min: f64,
    pub performance_max: f64,
}

impl SamplingProfile {
    /// Weighted departments, performance ~ N(80, 8) clipped to [40, 100]
    pub fn canonical() -> Self {
        Self {
            department_weights: DepartmentWeights::Weighted([0.30, 0.25, 0.20, 0.15, 0.10]),
            performance_mean: 80.0,
            performance_std: 8.0,
            performance_min: 40.0,
            performance_max: 100.0,
        }
    }

    /// Uniform departments, performance clipped to [50, 100]
    pub fn balanced() -> Self {
        Self {
            department_weights: DepartmentWeights::Uniform,
            performance_min: 50.0,
            ..Self::canonical()
        }
    }

    /// Expected share of each department, in [`Department::ALL`] order
    pub fn department_shares(&self) -> [f64; 5] {
        match &self.department_weights {
            DepartmentWeights::Uniform => [0.2; 5],
            DepartmentWeights::Weighted(w) => {
                let total: f64 = w.iter().sum();
                let mut shares = [0.0; 5];
                for (share, weight) in shares.iter_mut().zip(w.iter()) {
                    *share = weight / total;
                }
                shares
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if let DepartmentWeights::Weighted(w) = &self.department_weights {
            if w.iter().any(|x| !x.is_finite() || *x < 0.0) || w.iter().sum::<f64>() <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "department weights must be finite, non-negative and not all zero: {:?}",
                    w
                )));
            }
        }
        if !(self.performance_std > 0.0 && self.performance_std.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "performance std must be positive, got {}",
                self.performance_std
            )));
        }
        if !(self.performance_min < self.performance_max) {
            return Err(Error::InvalidConfig(format!(
                "performance range [{}, {}] is empty",
                self.performance_min, self.performance_max
            )));
        }
        Ok(())
    }
}

impl Default for SamplingProfile {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Builds synthetic employee populations
#[derive(Debug, Clone)]
pub struct PopulationGenerator {
    options: GeneratorOptions,
    profile: SamplingProfile,
    scorer: RiskScorer,
}

impl PopulationGenerator {
    /// Generator with the canonical sampling profile
    pub fn new(options: GeneratorOptions) -> Result<Self> {
        Self::with_profile(options, SamplingProfile::canonical())
    }

    pub fn with_profile(options: GeneratorOptions, profile: SamplingProfile) -> Result<Self> {
        options.validate()?;
        profile.validate()?;
        Ok(Self {
            options,
            profile,
            scorer: RiskScorer::new(),
        })
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn profile(&self) -> &SamplingProfile {
        &self.profile
    }

    /// Generate the full population
    pub fn generate(&self) -> Result<Population> {
        let n = self.options.n;
        info!(n, seed = self.options.seed, "Generating synthetic population");

        let mut rng = ChaCha8Rng::seed_from_u64(self.options.seed);

        // Columns are drawn one after another from a single stream
        let stress: Vec<u8> = (0..n).map(|_| rng.gen_range(1..=5)).collect();
        let burnout: Vec<u8> = (0..n).map(|_| rng.gen_range(1..=5)).collect();
        let workload: Vec<u32> = (0..n).map(|_| rng.gen_range(60..150)).collect();
        let absenteeism: Vec<u32> = (0..n).map(|_| rng.gen_range(0..80)).collect();
        let anxiety: Vec<u8> = (0..n).map(|_| rng.gen_range(1..=5)).collect();

        let noise_dist =
            Normal::new(0.0, NOISE_STD).map_err(|e| Error::Distribution(e.to_string()))?;
        let noise: Vec<f64> = (0..n).map(|_| noise_dist.sample(&mut rng)).collect();

        let departments = self.sample_departments(n, &mut rng)?;

        let perf_dist = Normal::new(self.profile.performance_mean, self.profile.performance_std)
            .map_err(|e| Error::Distribution(e.to_string()))?;
        let performance: Vec<f64> = (0..n)
            .map(|_| {
                perf_dist
                    .sample(&mut rng)
                    .clamp(self.profile.performance_min, self.profile.performance_max)
            })
            .collect();

        let mut name_rng = ChaCha8Rng::seed_from_u64(NAME_SEED);
        let first: Vec<&str> = (0..n)
            .map(|_| FIRST_NAMES[name_rng.gen_range(0..FIRST_NAMES.len())])
            .collect();
        let last: Vec<&str> = (0..n)
            .map(|_| LAST_NAMES[name_rng.gen_range(0..LAST_NAMES.len())])
            .collect();
        let roles: Vec<&str> = departments
            .iter()
            .map(|d| {
                let options = d.roles();
                options[name_rng.gen_range(0..options.len())]
            })
            .collect();

        let mut status_rng = ChaCha8Rng::seed_from_u64(STATUS_SEED);
        let statuses: Vec<ActiveStatus> = (0..n)
            .map(|_| {
                if status_rng.gen_bool(ACTIVE_PROBABILITY) {
                    ActiveStatus::Active
                } else {
                    ActiveStatus::Inactive
                }
            })
            .collect();

        let mut employees = Vec::with_capacity(n);
        for i in 0..n {
            let inputs = RiskInputs {
                stress: f64::from(stress[i]),
                burnout: f64::from(burnout[i]),
                workload: f64::from(workload[i]),
                absenteeism: f64::from(absenteeism[i]),
                anxiety: f64::from(anxiety[i]),
            };
            let (risk_score, risk_level) = self.scorer.assess(&inputs, noise[i]);

            employees.push(Employee {
                // validate() guarantees n fits in u32
                id: (i + 1) as u32,
                name: format!("{} {}", first[i], last[i]),
                role: roles[i].to_string(),
                department: departments[i],
                status: statuses[i],
                stress: stress[i],
                burnout: burnout[i],
                anxiety: anxiety[i],
                workload: workload[i],
                absenteeism: absenteeism[i],
                performance: performance[i],
                risk_score,
                risk_level,
            });
        }

        let population = Population::new(employees);
        debug!(
            levels = ?population.level_counts(),
            departments = ?population.department_counts(),
            "Population generated"
        );
        Ok(population)
    }

    fn sample_departments(&self, n: usize, rng: &mut ChaCha8Rng) -> Result<Vec<Department>> {
        match &self.profile.department_weights {
            DepartmentWeights::Uniform => Ok((0..n)
                .map(|_| Department::ALL[rng.gen_range(0..Department::ALL.len())])
                .collect()),
            DepartmentWeights::Weighted(weights) => {
                let dist = WeightedIndex::new(weights.iter().copied())
                    .map_err(|e| Error::Distribution(e.to_string()))?;
                Ok((0..n).map(|_| Department::ALL[dist.sample(rng)]).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::RiskLevel;

    #[test]
    fn test_rejects_empty_population() {
        let err = PopulationGenerator::new(GeneratorOptions::new(0, 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_bad_profile() {
        let profile = SamplingProfile {
            performance_min: 100.0,
            performance_max: 40.0,
            ..SamplingProfile::canonical()
        };
        assert!(PopulationGenerator::with_profile(GeneratorOptions::default(), profile).is_err());

        let profile = SamplingProfile {
            department_weights: DepartmentWeights::Weighted([0.0; 5]),
            ..SamplingProfile::canonical()
        };
        assert!(PopulationGenerator::with_profile(GeneratorOptions::default(), profile).is_err());
    }

    #[test]
    fn test_attribute_ranges() {
        let population = PopulationGenerator::new(GeneratorOptions::new(500, 7))
            .unwrap()
            .generate()
            .unwrap();

        assert_eq!(population.len(), 500);
        for (i, e) in population.iter().enumerate() {
            assert_eq!(e.id as usize, i + 1);
            assert!((1..=5).contains(&e.stress));
            assert!((1..=5).contains(&e.burnout));
            assert!((1..=5).contains(&e.anxiety));
            assert!((60..150).contains(&e.workload));
            assert!(e.absenteeism < 80);
            assert!((40.0..=100.0).contains(&e.performance));
            assert!((0.0..=1.0).contains(&e.risk_score));
            assert_eq!(e.risk_level, RiskLevel::from_score(e.risk_score));
            assert!(e.department.roles().contains(&e.role.as_str()));
            assert!(!e.name.is_empty());
        }
    }

    #[test]
    fn test_balanced_profile_performance_floor() {
        let population = PopulationGenerator::with_profile(
            GeneratorOptions::new(400, 9),
            SamplingProfile::balanced(),
        )
        .unwrap()
        .generate()
        .unwrap();

        assert!(population.iter().all(|e| e.performance >= 50.0));
    }

    #[test]
    fn test_same_seed_same_table() {
        let generator = PopulationGenerator::new(GeneratorOptions::new(100, 42)).unwrap();
        assert_eq!(generator.generate().unwrap(), generator.generate().unwrap());
    }

    #[test]
    fn test_different_seed_different_table() {
        let a = PopulationGenerator::new(GeneratorOptions::new(100, 1))
            .unwrap()
            .generate()
            .unwrap();
        let b = PopulationGenerator::new(GeneratorOptions::new(100, 2))
            .unwrap()
            .generate()
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_department_shares_normalised() {
        let shares = SamplingProfile::canonical().department_shares();
        let total: f64 = shares.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(SamplingProfile::balanced().department_shares(), [0.2; 5]);
    }
}
