//! Random Forest implementation

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::decision_tree::{argmax, DecisionTree, TreeConfig};
use crate::data::Dataset;
use crate::error::{Error, Result};

/// Number of features examined at each split
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaxFeatures {
    /// floor(sqrt(n_features)), at least 1
    #[default]
    Sqrt,
    /// floor(log2(n_features)), at least 1
    Log2,
    /// Every feature
    All,
    /// A fixed count, capped at the number of features
    Fixed(usize),
}

impl MaxFeatures {
    pub fn resolve(self, n_features: usize) -> usize {
        let n = n_features.max(1);
        let k = match self {
            MaxFeatures::Sqrt => (n as f64).sqrt().floor() as usize,
            MaxFeatures::Log2 => (n as f64).log2().floor() as usize,
            MaxFeatures::All => n,
            MaxFeatures::Fixed(k) => k,
        };
        k.clamp(1, n)
    }
}

/// Random Forest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum depth of each tree (None = unlimited)
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features considered per split
    pub max_features: MaxFeatures,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Out-of-bag score calculation
    pub oob_score: bool,
    /// Random seed
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 600,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            oob_score: true,
            seed: 123,
        }
    }
}

impl ForestConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_trees == 0 {
            return Err(Error::InvalidConfig(
                "forest needs at least one tree".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(Error::InvalidConfig(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(Error::InvalidConfig(
                "max_depth must be positive; omit it for unlimited depth".to_string(),
            ));
        }
        Ok(())
    }

    /// Seed of tree `i`; independent of thread scheduling
    fn tree_seed(&self, i: usize) -> u64 {
        self.seed.wrapping_add(i as u64)
    }

    /// Seed of the bootstrap draw of tree `i`
    fn bootstrap_seed(&self, i: usize) -> u64 {
        self.seed
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(i as u64)
    }
}

/// Random Forest classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
    n_classes: usize,
    feature_names: Vec<String>,
    class_names: Vec<String>,
    feature_importances: Vec<f64>,
    oob_score_value: Option<f64>,
}

impl RandomForest {
    /// Create a new random forest
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            n_classes: 0,
            feature_names: Vec::new(),
            class_names: Vec::new(),
            feature_importances: Vec::new(),
            oob_score_value: None,
        }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Train the random forest
    pub fn fit(&mut self, dataset: &Dataset) -> Result<()> {
        self.config.validate()?;
        if dataset.is_empty() {
            return Err(Error::EmptyDataset);
        }

        self.feature_names = dataset.feature_names.clone();
        self.class_names = dataset.class_names.clone();
        self.n_classes = dataset.n_classes();
        let n_features = dataset.n_features();
        let max_features = self.config.max_features.resolve(n_features);

        info!(
            n_trees = self.config.n_trees,
            n_samples = dataset.n_samples(),
            n_features,
            max_features,
            "Fitting random forest"
        );

        // Build trees in parallel
        let config = &self.config;
        let trees: Vec<DecisionTree> = (0..config.n_trees)
            .into_par_iter()
            .map(|i| -> Result<DecisionTree> {
                let tree_config = TreeConfig {
                    max_depth: config.max_depth,
                    min_samples_split: config.min_samples_split,
                    min_samples_leaf: config.min_samples_leaf,
                    max_features: Some(max_features),
                    seed: config.tree_seed(i),
                };

                let mut tree = DecisionTree::new(tree_config);

                // Bootstrap sample or use full dataset
                if config.bootstrap {
                    let indices = dataset.bootstrap_indices(config.bootstrap_seed(i));
                    tree.fit_indices(dataset, &indices)?;
                } else {
                    tree.fit(dataset)?;
                }

                Ok(tree)
            })
            .collect::<Result<Vec<_>>>()?;

        self.trees = trees;

        // Aggregate feature importances
        self.feature_importances = vec![0.0; n_features];
        for tree in &self.trees {
            for (i, &imp) in tree.feature_importances().iter().enumerate() {
                self.feature_importances[i] += imp;
            }
        }

        // Normalize
        let sum: f64 = self.feature_importances.iter().sum();
        if sum > 0.0 {
            for imp in &mut self.feature_importances {
                *imp /= sum;
            }
        } else if n_features > 0 {
            warn!("No tree split on any feature; reporting uniform importances");
            self.feature_importances = vec![1.0 / n_features as f64; n_features];
        }

        self.oob_score_value = if self.config.oob_score && self.config.bootstrap {
            self.calculate_oob_score(dataset)
        } else {
            None
        };

        debug!(oob = ?self.oob_score_value, "Random forest fitted");
        Ok(())
    }

    /// Out-of-bag accuracy: each sample is scored only by trees that did not see it
    fn calculate_oob_score(&self, dataset: &Dataset) -> Option<f64> {
        let n_samples = dataset.n_samples();
        let mut votes: Vec<Vec<f64>> = vec![vec![0.0; self.n_classes]; n_samples];
        let mut voted = vec![false; n_samples];

        for (tree_idx, tree) in self.trees.iter().enumerate() {
            let mut in_bag = vec![false; n_samples];
            for i in dataset.bootstrap_indices(self.config.bootstrap_seed(tree_idx)) {
                in_bag[i] = true;
            }

            for i in (0..n_samples).filter(|&i| !in_bag[i]) {
                for (v, p) in votes[i]
                    .iter_mut()
                    .zip(tree.predict_proba_one(&dataset.features[i]))
                {
                    *v += p;
                }
                voted[i] = true;
            }
        }

        let mut correct = 0usize;
        let mut total = 0usize;
        for i in (0..n_samples).filter(|&i| voted[i]) {
            if argmax(&votes[i]) == dataset.labels[i] {
                correct += 1;
            }
            total += 1;
        }

        if total > 0 {
            Some(correct as f64 / total as f64)
        } else {
            None
        }
    }

    /// Average class probabilities over all trees
    pub fn predict_proba_one(&self, features: &[f64]) -> Vec<f64> {
        let mut probs = vec![0.0; self.n_classes];
        if self.trees.is_empty() {
            return probs;
        }

        for tree in &self.trees {
            for (acc, p) in probs.iter_mut().zip(tree.predict_proba_one(features)) {
                *acc += p;
            }
        }

        let n_trees = self.trees.len() as f64;
        for p in &mut probs {
            *p /= n_trees;
        }
        probs
    }

    /// Predict the class of a single sample
    pub fn predict_one(&self, features: &[f64]) -> usize {
        argmax(&self.predict_proba_one(features))
    }

    /// Predict for multiple samples
    pub fn predict(&self, dataset: &Dataset) -> Vec<usize> {
        dataset
            .features
            .par_iter()
            .map(|f| self.predict_one(f))
            .collect()
    }

    /// Predict probabilities
    pub fn predict_proba(&self, dataset: &Dataset) -> Vec<Vec<f64>> {
        dataset
            .features
            .par_iter()
            .map(|f| self.predict_proba_one(f))
            .collect()
    }

    /// Get feature importances in feature order
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    /// Feature name to normalized importance
    pub fn feature_importance_map(&self) -> BTreeMap<String, f64> {
        self.feature_names
            .iter()
            .cloned()
            .zip(self.feature_importances.iter().copied())
            .collect()
    }

    /// Get feature names with importances, sorted by importance
    pub fn feature_importance_ranking(&self) -> Vec<(&str, f64)> {
        let mut ranking: Vec<(&str, f64)> = self
            .feature_names
            .iter()
            .zip(self.feature_importances.iter())
            .map(|(n, &i)| (n.as_str(), i))
            .collect();

        ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranking
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Get OOB score
    pub fn oob_score(&self) -> Option<f64> {
        self.oob_score_value
    }

    /// Calculate accuracy
    pub fn accuracy(&self, dataset: &Dataset) -> f64 {
        if dataset.is_empty() {
            return 0.0;
        }
        let correct = self
            .predict(dataset)
            .iter()
            .zip(dataset.labels.iter())
            .filter(|(p, l)| p == l)
            .count();

        correct as f64 / dataset.n_samples() as f64
    }

    /// Number of trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_feature_dataset() -> Dataset {
        let mut dataset = Dataset::new(
            vec!["x".to_string(), "y".to_string()],
            vec!["neg".to_string(), "pos".to_string()],
        );
        for i in 0..200 {
            let x = i as f64 / 20.0;
            let y = ((i * 37) % 11) as f64;
            let label = usize::from(x > 5.0);
            dataset.add_sample(vec![x, y], label, i as u32).unwrap();
        }
        dataset
    }

    #[test]
    fn test_max_features_resolve() {
        assert_eq!(MaxFeatures::Sqrt.resolve(5), 2);
        assert_eq!(MaxFeatures::Sqrt.resolve(11), 3);
        assert_eq!(MaxFeatures::Sqrt.resolve(16), 4);
        assert_eq!(MaxFeatures::Sqrt.resolve(1), 1);
        assert_eq!(MaxFeatures::Log2.resolve(8), 3);
        assert_eq!(MaxFeatures::Log2.resolve(5), 2);
        assert_eq!(MaxFeatures::Log2.resolve(1), 1);
        assert_eq!(MaxFeatures::All.resolve(5), 5);
        assert_eq!(MaxFeatures::Fixed(9).resolve(5), 5);
        assert_eq!(MaxFeatures::Fixed(0).resolve(5), 1);
    }

    #[test]
    fn test_random_forest_classification() {
        let dataset = two_feature_dataset();
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 20,
            ..Default::default()
        });
        forest.fit(&dataset).unwrap();

        assert_eq!(forest.n_trees(), 20);
        assert!(forest.accuracy(&dataset) > 0.95);
        assert!(forest.oob_score().unwrap() > 0.9);
    }

    #[test]
    fn test_importances_cover_features_and_sum_to_one() {
        let dataset = two_feature_dataset();
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 15,
            ..Default::default()
        });
        forest.fit(&dataset).unwrap();

        let map = forest.feature_importance_map();
        assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_relative_eq!(map.values().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert_eq!(forest.feature_importance_ranking()[0].0, "x");
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let dataset = two_feature_dataset();
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 10,
            oob_score: false,
            ..Default::default()
        });
        forest.fit(&dataset).unwrap();

        assert!(forest.oob_score().is_none());
        for probs in forest.predict_proba(&dataset) {
            assert_relative_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let dataset = two_feature_dataset();
        let config = ForestConfig {
            n_trees: 12,
            ..Default::default()
        };
        let mut a = RandomForest::new(config.clone());
        let mut b = RandomForest::new(config);
        a.fit(&dataset).unwrap();
        b.fit(&dataset).unwrap();

        assert_eq!(a.feature_importances(), b.feature_importances());
        assert_eq!(a.predict_proba(&dataset), b.predict_proba(&dataset));
    }

    #[test]
    fn test_single_class_uniform_importances() {
        let mut dataset = Dataset::new(
            vec!["a".to_string(), "b".to_string()],
            vec!["only".to_string()],
        );
        for i in 0..20 {
            dataset.add_sample(vec![i as f64, 1.0], 0, i).unwrap();
        }
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 5,
            ..Default::default()
        });
        forest.fit(&dataset).unwrap();

        assert_eq!(forest.feature_importances(), &[0.5, 0.5]);
        assert_eq!(forest.predict_one(&[3.0, 1.0]), 0);
    }

    #[test]
    fn test_invalid_config() {
        let dataset = two_feature_dataset();
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 0,
            ..Default::default()
        });
        assert!(matches!(forest.fit(&dataset), Err(Error::InvalidConfig(_))));

        let empty = Dataset::new(vec!["x".to_string()], vec!["a".to_string()]);
        let mut forest = RandomForest::new(ForestConfig::default());
        assert!(matches!(forest.fit(&empty), Err(Error::EmptyDataset)));
    }
}
