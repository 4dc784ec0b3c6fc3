//! Dataset structure for machine learning

use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Feature matrix with integer class labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Feature matrix (n_samples x n_features)
    pub features: Vec<Vec<f64>>,
    /// Class index per sample
    pub labels: Vec<usize>,
    /// Feature names
    pub feature_names: Vec<String>,
    /// Class names, indexed by label
    pub class_names: Vec<String>,
    /// Employee id of each sample
    pub ids: Vec<u32>,
}

/// Train/test split result
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

impl Dataset {
    /// Create a new empty dataset
    pub fn new(feature_names: Vec<String>, class_names: Vec<String>) -> Self {
        Self {
            features: Vec::new(),
            labels: Vec::new(),
            feature_names,
            class_names,
            ids: Vec::new(),
        }
    }

    /// Number of samples
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    /// Number of features
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Number of classes
    pub fn n_classes(&self) -> usize {
        self.class_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Add a sample
    pub fn add_sample(&mut self, features: Vec<f64>, label: usize, id: u32) -> Result<()> {
        if features.len() != self.n_features() {
            return Err(Error::DimensionMismatch {
                expected: self.n_features(),
                actual: features.len(),
            });
        }
        if label >= self.n_classes() {
            return Err(Error::InvalidConfig(format!(
                "label {} out of range for {} classes",
                label,
                self.n_classes()
            )));
        }
        self.features.push(features);
        self.labels.push(label);
        self.ids.push(id);
        Ok(())
    }

    /// Get feature matrix as ndarray
    pub fn features_array(&self) -> Array2<f64> {
        let n_samples = self.n_samples();
        let n_features = self.n_features();

        if n_samples == 0 {
            return Array2::zeros((0, n_features));
        }

        Array2::from_shape_fn((n_samples, n_features), |(i, j)| self.features[i][j])
    }

    /// Get labels as ndarray
    pub fn labels_array(&self) -> Array1<usize> {
        Array1::from_vec(self.labels.clone())
    }

    /// Samples per class, indexed by label
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes()];
        for &label in &self.labels {
            counts[label] += 1;
        }
        counts
    }

    /// Create a subset of the dataset by indices
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            feature_names: self.feature_names.clone(),
            class_names: self.class_names.clone(),
            ids: indices.iter().map(|&i| self.ids[i]).collect(),
        }
    }

    /// Indices of a bootstrap sample (drawn with replacement)
    pub fn bootstrap_indices(&self, seed: u64) -> Vec<usize> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let n = self.n_samples();
        (0..n).map(|_| rng.gen_range(0..n)).collect()
    }

    /// Bootstrap sample (random sample with replacement)
    pub fn bootstrap_sample(&self, seed: u64) -> Dataset {
        self.subset(&self.bootstrap_indices(seed))
    }

    /// Split into train and test sets, preserving each class's share.
    ///
    /// Every class must have at least two members so it can appear on
    /// both sides; classes are checked in label order and the first
    /// offending one is reported.
    pub fn stratified_split(&self, test_ratio: f64, seed: u64) -> Result<Split> {
        if !(test_ratio > 0.0 && test_ratio < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "test ratio must lie in (0, 1), got {}",
                test_ratio
            )));
        }
        if self.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); self.n_classes()];
        for (i, &label) in self.labels.iter().enumerate() {
            by_class[label].push(i);
        }

        for (class, members) in by_class.iter().enumerate() {
            let name = self.class_names[class].clone();
            match members.len() {
                0 => return Err(Error::EmptyClass { class: name }),
                1 => return Err(Error::ClassTooSmall { class: name, count: 1 }),
                _ => {}
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut train_indices = Vec::new();
        let mut test_indices = Vec::new();

        for members in &mut by_class {
            members.shuffle(&mut rng);
            let n_test = ((members.len() as f64 * test_ratio).round() as usize)
                .clamp(1, members.len() - 1);
            let (test, train) = members.split_at(n_test);
            test_indices.extend_from_slice(test);
            train_indices.extend_from_slice(train);
        }

        // Restore table order inside each partition
        train_indices.sort_unstable();
        test_indices.sort_unstable();

        debug!(
            train = train_indices.len(),
            test = test_indices.len(),
            "Stratified split"
        );

        Ok(Split {
            train: self.subset(&train_indices),
            test: self.subset(&test_indices),
        })
    }
}
