//! Risk classifier training step
//!
//! Projects the population onto a feature set, makes a stratified
//! train/test split, fits a random forest on the training part and
//! evaluates it on the held-out part.
//!
//! The risk label is itself a noisy function of the core features, so high
//! accuracy here says the wiring works, not that the model has real
//! predictive value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::data::{Employee, Population};
use crate::error::{Error, Result};
use crate::features::{FeatureEngine, FeatureSet};
use crate::metrics::{ClassificationReport, ConfusionMatrix};
use crate::models::{ForestConfig, RandomForest};
use crate::scoring::RiskLevel;

/// Split and feature options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Share of each class held out for evaluation
    pub test_ratio: f64,
    /// Seed of the stratified shuffle
    pub split_seed: u64,
    /// Columns fed to the classifier
    pub features: FeatureSet,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.3,
            split_seed: 123,
            features: FeatureSet::Core,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "test_ratio must lie in (0, 1), got {}",
                self.test_ratio
            )));
        }
        Ok(())
    }
}

/// Outcome of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub feature_set: FeatureSet,
    pub train_size: usize,
    pub test_size: usize,
    /// Samples per risk level in the training partition
    pub train_class_counts: BTreeMap<RiskLevel, usize>,
    /// Samples per risk level in the test partition
    pub test_class_counts: BTreeMap<RiskLevel, usize>,
    pub test_accuracy: f64,
    pub oob_score: Option<f64>,
    pub confusion: ConfusionMatrix,
    pub classification: ClassificationReport,
}

/// Entry point of the training step
pub struct RiskClassifier;

impl RiskClassifier {
    /// Split, fit and evaluate.
    ///
    /// Fails when a risk level has fewer than two rows in `population`,
    /// which happens easily after filtering to a single department.
    pub fn train(
        population: &Population,
        training: &TrainingConfig,
        forest: &ForestConfig,
    ) -> Result<TrainedRiskModel> {
        training.validate()?;
        forest.validate()?;

        let engine = FeatureEngine::new(training.features);
        let dataset = engine.generate(population);
        let split = dataset.stratified_split(training.test_ratio, training.split_seed)?;

        info!(
            features = %training.features,
            train = split.train.n_samples(),
            test = split.test.n_samples(),
            "Training risk classifier"
        );

        let mut model = RandomForest::new(forest.clone());
        model.fit(&split.train)?;

        let predictions = model.predict(&split.test);
        let confusion = ConfusionMatrix::new(
            split.test.class_names.clone(),
            &split.test.labels,
            &predictions,
        );
        let classification = ClassificationReport::from_confusion(&confusion);

        let report = TrainingReport {
            feature_set: training.features,
            train_size: split.train.n_samples(),
            test_size: split.test.n_samples(),
            train_class_counts: level_counts(&split.train.class_counts()),
            test_class_counts: level_counts(&split.test.class_counts()),
            test_accuracy: confusion.accuracy(),
            oob_score: model.oob_score(),
            confusion,
            classification,
        };

        info!(
            accuracy = report.test_accuracy,
            oob = ?report.oob_score,
            "Risk classifier trained"
        );

        Ok(TrainedRiskModel {
            engine,
            forest: model,
            report,
        })
    }
}

fn level_counts(counts: &[usize]) -> BTreeMap<RiskLevel, usize> {
    counts
        .iter()
        .enumerate()
        .filter_map(|(i, &c)| RiskLevel::from_index(i).map(|l| (l, c)))
        .collect()
}

/// Fitted classifier together with the feature mapping it was trained on
#[derive(Debug, Clone)]
pub struct TrainedRiskModel {
    engine: FeatureEngine,
    forest: RandomForest,
    report: TrainingReport,
}

impl TrainedRiskModel {
    /// Predicted risk level of one employee
    pub fn predict(&self, employee: &Employee) -> RiskLevel {
        level_of(self.forest.predict_one(&self.engine.row(employee)))
    }

    /// Predicted risk level of a raw feature vector in training column order
    pub fn predict_features(&self, features: &[f64]) -> Result<RiskLevel> {
        let expected = self.engine.n_features();
        if features.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: features.len(),
            });
        }
        Ok(level_of(self.forest.predict_one(features)))
    }

    /// Class probabilities in [`RiskLevel::ALL`] order
    pub fn predict_proba(&self, employee: &Employee) -> Vec<f64> {
        self.forest.predict_proba_one(&self.engine.row(employee))
    }

    /// Predictions for every row of a population
    pub fn predict_population(&self, population: &Population) -> Vec<RiskLevel> {
        let dataset = self.engine.generate(population);
        self.forest.predict(&dataset).into_iter().map(level_of).collect()
    }

    /// Feature name to normalized importance; values sum to 1
    pub fn feature_importances(&self) -> BTreeMap<String, f64> {
        self.forest.feature_importance_map()
    }

    /// Features sorted by descending importance
    pub fn feature_importance_ranking(&self) -> Vec<(&str, f64)> {
        self.forest.feature_importance_ranking()
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.engine.feature_names()
    }

    pub fn report(&self) -> &TrainingReport {
        &self.report
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }
}

fn level_of(class: usize) -> RiskLevel {
    // Forest classes are the risk-level indices, so this never falls through
    RiskLevel::from_index(class).unwrap_or(RiskLevel::Low)
}
