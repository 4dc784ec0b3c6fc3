//! Feature engineering engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::data::{Dataset, Department, Employee, Population};
use crate::error::Error;
use crate::scoring::RiskLevel;

/// Feature types that can be extracted from an employee
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Stress,
    Burnout,
    Workload,
    Absenteeism,
    Anxiety,
    Performance,
    /// One-hot indicator of a department level
    DepartmentIs(Department),
}

impl Feature {
    pub fn name(&self) -> String {
        match self {
            Feature::Stress => "stress".to_string(),
            Feature::Burnout => "burnout".to_string(),
            Feature::Workload => "workload".to_string(),
            Feature::Absenteeism => "absenteeism".to_string(),
            Feature::Anxiety => "anxiety".to_string(),
            Feature::Performance => "performance".to_string(),
            Feature::DepartmentIs(d) => format!("department_{}", d),
        }
    }

    pub fn value(&self, employee: &Employee) -> f64 {
        match self {
            Feature::Stress => f64::from(employee.stress),
            Feature::Burnout => f64::from(employee.burnout),
            Feature::Workload => f64::from(employee.workload),
            Feature::Absenteeism => f64::from(employee.absenteeism),
            Feature::Anxiety => f64::from(employee.anxiety),
            Feature::Performance => employee.performance,
            Feature::DepartmentIs(d) => {
                if employee.department == *d {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Which columns feed the classifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureSet {
    /// The five scoring attributes
    #[default]
    Core,
    /// One-hot department levels, the five scoring attributes and performance
    Extended,
}

impl FeatureSet {
    const CORE: [Feature; 5] = [
        Feature::Stress,
        Feature::Burnout,
        Feature::Workload,
        Feature::Absenteeism,
        Feature::Anxiety,
    ];

    pub fn features(&self) -> Vec<Feature> {
        match self {
            FeatureSet::Core => Self::CORE.to_vec(),
            FeatureSet::Extended => Department::ALL
                .iter()
                .map(|&d| Feature::DepartmentIs(d))
                .chain(Self::CORE)
                .chain(std::iter::once(Feature::Performance))
                .collect(),
        }
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureSet::Core => f.write_str("core"),
            FeatureSet::Extended => f.write_str("extended"),
        }
    }
}

impl FromStr for FeatureSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "core" => Ok(FeatureSet::Core),
            "extended" => Ok(FeatureSet::Extended),
            other => Err(Error::InvalidConfig(format!("unknown feature set '{}'", other))),
        }
    }
}

/// Feature engineering engine
#[derive(Debug, Clone)]
pub struct FeatureEngine {
    features: Vec<Feature>,
}

impl FeatureEngine {
    pub fn new(feature_set: FeatureSet) -> Self {
        Self {
            features: feature_set.features(),
        }
    }

    /// Create engine with custom features
    pub fn with_features(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.features.iter().map(|f| f.name()).collect()
    }

    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    /// Feature vector of one employee
    pub fn row(&self, employee: &Employee) -> Vec<f64> {
        self.features.iter().map(|f| f.value(employee)).collect()
    }

    /// Build a labelled dataset from the population; labels are risk-level indices
    pub fn generate(&self, population: &Population) -> Dataset {
        Dataset {
            features: population.iter().map(|e| self.row(e)).collect(),
            labels: population.iter().map(|e| e.risk_level.index()).collect(),
            feature_names: self.feature_names(),
            class_names: RiskLevel::class_names(),
            ids: population.iter().map(|e| e.id).collect(),
        }
    }
}
