//! # Impulso Risk - Psychosocial Risk Analytics
//!
//! This library generates a reproducible synthetic workforce, scores each
//! employee's psychosocial risk and trains a random-forest classifier that
//! recovers the risk level from the underlying factors.
//!
//! ## Modules
//!
//! - `scoring` - Linear risk score and its three risk levels
//! - `data` - Employee records, the population generator and datasets
//! - `features` - Projection of employees onto classifier features
//! - `models` - Decision Tree and Random Forest implementations
//! - `training` - Stratified split, fitting and evaluation
//! - `metrics` - Accuracy, confusion matrix and classification report
//! - `summary` - Workforce indicators and per-department breakdowns
//! - `recommendations` - Static action-plan catalog
//! - `config` - TOML configuration

pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod recommendations;
pub mod scoring;
pub mod summary;
pub mod training;

pub use config::Config;
pub use data::{Dataset, Employee, Population, PopulationGenerator};
pub use error::{Error, Result};
pub use features::FeatureEngine;
pub use models::{DecisionTree, RandomForest};
pub use scoring::{RiskLevel, RiskScorer};
pub use training::{RiskClassifier, TrainedRiskModel};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, LoggingConfig};
    pub use crate::data::{
        ActiveStatus, Dataset, Department, Employee, EmployeeFilter, GeneratorOptions,
        Population, PopulationGenerator, SamplingProfile, Split,
    };
    pub use crate::error::{Error, Result};
    pub use crate::features::{Feature, FeatureEngine, FeatureSet};
    pub use crate::metrics::{ClassificationReport, ConfusionMatrix};
    pub use crate::models::{DecisionTree, ForestConfig, MaxFeatures, RandomForest, TreeConfig};
    pub use crate::recommendations::{
        Priority, Recommendation, RecommendationCatalog, RecommendationFilter, Status,
    };
    pub use crate::scoring::{RiskInputs, RiskLevel, RiskScorer, RiskWeights};
    pub use crate::summary::{DepartmentRisk, LevelDistribution, RiskFactorProfile, WorkforceSummary};
    pub use crate::training::{RiskClassifier, TrainedRiskModel, TrainingConfig, TrainingReport};
}
