//! Decision Tree implementation
//!
//! Multi-class CART classifier using Gini impurity. Each split considers a
//! random subset of `max_features` features, drawn from the tree's own
//! seeded RNG.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::data::Dataset;
use crate::error::{Error, Result};

/// Decision tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of tree (None = grow until pure)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf node
    pub min_samples_leaf: usize,
    /// Maximum features to consider for split (None = all)
    pub max_features: Option<usize>,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

/// Tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Feature index for split
    pub feature_idx: Option<usize>,
    /// Threshold for split; samples with value <= threshold go left
    pub threshold: Option<f64>,
    /// Class distribution of the training samples that reached this node
    pub class_probs: Vec<f64>,
    /// Number of samples in this node
    pub n_samples: usize,
    /// Left child
    pub left: Option<Box<TreeNode>>,
    /// Right child
    pub right: Option<Box<TreeNode>>,
    /// Gini impurity at this node
    pub impurity: f64,
}

impl TreeNode {
    fn leaf(class_probs: Vec<f64>, n_samples: usize, impurity: f64) -> Self {
        Self {
            feature_idx: None,
            threshold: None,
            class_probs,
            n_samples,
            left: None,
            right: None,
            impurity,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Majority class; ties go to the lowest index
    pub fn predicted_class(&self) -> usize {
        argmax(&self.class_probs)
    }

    pub fn depth(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            1 + self
                .left
                .as_ref()
                .map(|n| n.depth())
                .unwrap_or(0)
                .max(self.right.as_ref().map(|n| n.depth()).unwrap_or(0))
        }
    }

    pub fn n_leaves(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.left.as_ref().map(|n| n.n_leaves()).unwrap_or(0)
                + self.right.as_ref().map(|n| n.n_leaves()).unwrap_or(0)
        }
    }
}

/// Best split found at a node
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
    /// Weighted impurity decrease: n * parent - n_l * left - n_r * right
    decrease: f64,
}

/// Decision Tree model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<TreeNode>,
    n_classes: usize,
    feature_names: Vec<String>,
    feature_importances: Vec<f64>,
}

impl DecisionTree {
    /// Create a new decision tree with config
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            n_classes: 0,
            feature_names: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    /// Train the decision tree on every sample of `dataset`
    pub fn fit(&mut self, dataset: &Dataset) -> Result<()> {
        let indices: Vec<usize> = (0..dataset.n_samples()).collect();
        self.fit_indices(dataset, &indices)
    }

    /// Train on the given sample indices; repeats are allowed (bootstrap)
    pub fn fit_indices(&mut self, dataset: &Dataset, indices: &[usize]) -> Result<()> {
        if indices.is_empty() {
            return Err(Error::EmptyDataset);
        }
        if dataset.n_classes() == 0 {
            return Err(Error::InvalidConfig("dataset has no classes".to_string()));
        }

        self.n_classes = dataset.n_classes();
        self.feature_names = dataset.feature_names.clone();
        self.feature_importances = vec![0.0; dataset.n_features()];

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.root = Some(self.build_tree(dataset, indices.to_vec(), 0, &mut rng));

        // Normalize feature importances
        let sum: f64 = self.feature_importances.iter().sum();
        if sum > 0.0 {
            for imp in &mut self.feature_importances {
                *imp /= sum;
            }
        }
        Ok(())
    }

    /// Build tree recursively
    fn build_tree(
        &mut self,
        dataset: &Dataset,
        indices: Vec<usize>,
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let n = indices.len();
        let counts = self.class_counts(dataset, &indices);
        let impurity = gini(&counts, n);

        let depth_reached = self.config.max_depth.is_some_and(|max| depth >= max);
        if depth_reached
            || n < self.config.min_samples_split
            || n < 2 * self.config.min_samples_leaf
            || impurity < 1e-12
        {
            return TreeNode::leaf(probabilities(&counts, n), n, impurity);
        }

        match self.find_best_split(dataset, &indices, &counts, impurity, rng) {
            Some(split) => {
                self.feature_importances[split.feature_idx] += split.decrease;

                let left = self.build_tree(dataset, split.left, depth + 1, rng);
                let right = self.build_tree(dataset, split.right, depth + 1, rng);

                TreeNode {
                    feature_idx: Some(split.feature_idx),
                    threshold: Some(split.threshold),
                    class_probs: probabilities(&counts, n),
                    n_samples: n,
                    left: Some(Box::new(left)),
                    right: Some(Box::new(right)),
                    impurity,
                }
            }
            None => TreeNode::leaf(probabilities(&counts, n), n, impurity),
        }
    }

    /// Find the best split by sweeping each candidate feature in sorted order
    fn find_best_split(
        &self,
        dataset: &Dataset,
        indices: &[usize],
        parent_counts: &[usize],
        parent_impurity: f64,
        rng: &mut ChaCha8Rng,
    ) -> Option<SplitCandidate> {
        let n_features = dataset.n_features();
        let max_features = self
            .config
            .max_features
            .unwrap_or(n_features)
            .clamp(1, n_features.max(1));

        // Random feature order; the first max_features are the sample, the
        // rest are only drawn while no valid split has been found
        let mut feature_indices: Vec<usize> = (0..n_features).collect();
        feature_indices.shuffle(rng);

        let n = indices.len();
        let min_leaf = self.config.min_samples_leaf.max(1);
        let mut best: Option<(usize, f64, f64)> = None;
        let mut best_decrease = 1e-12;

        let mut sorted = indices.to_vec();
        for (drawn, &feature_idx) in feature_indices.iter().enumerate() {
            if drawn >= max_features && best.is_some() {
                break;
            }
            sorted.sort_by(|&a, &b| {
                dataset.features[a][feature_idx].total_cmp(&dataset.features[b][feature_idx])
            });

            let mut left_counts = vec![0usize; self.n_classes];
            for pos in 0..n - 1 {
                left_counts[dataset.labels[sorted[pos]]] += 1;

                let here = dataset.features[sorted[pos]][feature_idx];
                let next = dataset.features[sorted[pos + 1]][feature_idx];
                if here == next {
                    continue;
                }

                let n_left = pos + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let right_counts: Vec<usize> = parent_counts
                    .iter()
                    .zip(left_counts.iter())
                    .map(|(p, l)| p - l)
                    .collect();

                let decrease = n as f64 * parent_impurity
                    - n_left as f64 * gini(&left_counts, n_left)
                    - n_right as f64 * gini(&right_counts, n_right);

                if decrease > best_decrease {
                    best_decrease = decrease;
                    best = Some((feature_idx, (here + next) / 2.0, decrease));
                }
            }
        }

        best.map(|(feature_idx, threshold, decrease)| {
            let (left, right): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .partition(|&&i| dataset.features[i][feature_idx] <= threshold);
            SplitCandidate {
                feature_idx,
                threshold,
                left,
                right,
                decrease,
            }
        })
    }

    fn class_counts(&self, dataset: &Dataset, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in indices {
            counts[dataset.labels[i]] += 1;
        }
        counts
    }

    /// Predict the class of a single sample
    pub fn predict_one(&self, features: &[f64]) -> usize {
        argmax(&self.predict_proba_one(features))
    }

    /// Class probabilities of the leaf a sample lands in
    pub fn predict_proba_one(&self, features: &[f64]) -> Vec<f64> {
        match &self.root {
            Some(node) => self.leaf_for(node, features).class_probs.clone(),
            None => vec![0.0; self.n_classes],
        }
    }

    fn leaf_for<'a>(&'a self, node: &'a TreeNode, features: &[f64]) -> &'a TreeNode {
        let mut current = node;
        loop {
            match (current.feature_idx, current.threshold, &current.left, &current.right) {
                (Some(feature_idx), Some(threshold), Some(left), Some(right)) => {
                    current = if features[feature_idx] <= threshold {
                        &**left
                    } else {
                        &**right
                    };
                }
                _ => return current,
            }
        }
    }

    /// Predict for multiple samples
    pub fn predict(&self, dataset: &Dataset) -> Vec<usize> {
        dataset
            .features
            .iter()
            .map(|f| self.predict_one(f))
            .collect()
    }

    /// Normalized impurity decrease per feature; all zeros if the tree never split
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    /// Get feature names with importances
    pub fn feature_importance_map(&self) -> Vec<(&str, f64)> {
        self.feature_names
            .iter()
            .zip(self.feature_importances.iter())
            .map(|(n, &i)| (n.as_str(), i))
            .collect()
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map(|r| r.depth()).unwrap_or(0)
    }

    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map(|r| r.n_leaves()).unwrap_or(0)
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
}

/// Gini impurity of a class histogram
fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

fn probabilities(counts: &[usize], n: usize) -> Vec<f64> {
    if n == 0 {
        return vec![0.0; counts.len()];
    }
    counts.iter().map(|&c| c as f64 / n as f64).collect()
}

/// Index of the largest value; the first one wins ties
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn three_class_dataset() -> Dataset {
        let mut dataset = Dataset::new(
            vec!["x".to_string(), "noise".to_string()],
            vec!["low".to_string(), "mid".to_string(), "high".to_string()],
        );
        for i in 0..150 {
            let x = i as f64 / 10.0;
            let label = if x < 5.0 {
                0
            } else if x < 10.0 {
                1
            } else {
                2
            };
            dataset
                .add_sample(vec![x, (i % 7) as f64], label, i as u32)
                .unwrap();
        }
        dataset
    }

    #[test]
    fn test_gini() {
        assert_relative_eq!(gini(&[5, 5], 10), 0.5);
        assert_relative_eq!(gini(&[10, 0, 0], 10), 0.0);
        assert_relative_eq!(gini(&[1, 1, 1], 3), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_argmax_first_wins_ties() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
    }

    #[test]
    fn test_decision_tree_classification() {
        let dataset = three_class_dataset();
        let mut tree = DecisionTree::new(TreeConfig::default());
        tree.fit(&dataset).unwrap();

        assert_eq!(tree.accuracy(&dataset), 1.0);
        assert_eq!(tree.predict_one(&[2.0, 0.0]), 0);
        assert_eq!(tree.predict_one(&[7.5, 0.0]), 1);
        assert_eq!(tree.predict_one(&[14.0, 0.0]), 2);
    }

    #[test]
    fn test_importances_favour_informative_feature() {
        let dataset = three_class_dataset();
        let mut tree = DecisionTree::new(TreeConfig::default());
        tree.fit(&dataset).unwrap();

        let importances = tree.feature_importances();
        assert_relative_eq!(importances.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(importances[0] > 0.99);
    }

    #[test]
    fn test_max_depth_limits_tree() {
        let dataset = three_class_dataset();
        let mut tree = DecisionTree::new(TreeConfig {
            max_depth: Some(1),
            ..Default::default()
        });
        tree.fit(&dataset).unwrap();

        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.n_leaves(), 2);
    }

    #[test]
    fn test_pure_node_is_leaf() {
        let mut dataset = Dataset::new(vec!["x".to_string()], vec!["only".to_string()]);
        for i in 0..10 {
            dataset.add_sample(vec![i as f64], 0, i).unwrap();
        }
        let mut tree = DecisionTree::new(TreeConfig::default());
        tree.fit(&dataset).unwrap();

        assert_eq!(tree.n_leaves(), 1);
        assert!(tree.feature_importances().iter().all(|&v| v == 0.0));
        assert_eq!(tree.predict_proba_one(&[3.0]), vec![1.0]);
    }

    #[test]
    fn test_constant_feature_does_not_stop_growth() {
        let mut dataset = Dataset::new(
            vec!["constant".to_string(), "x".to_string()],
            vec!["a".to_string(), "b".to_string()],
        );
        for i in 0..40 {
            dataset
                .add_sample(vec![1.0, i as f64], usize::from(i >= 20), i)
                .unwrap();
        }

        for seed in 0..10 {
            let mut tree = DecisionTree::new(TreeConfig {
                max_features: Some(1),
                seed,
                ..Default::default()
            });
            tree.fit(&dataset).unwrap();
            assert_eq!(tree.accuracy(&dataset), 1.0);
            assert_relative_eq!(tree.feature_importances()[1], 1.0);
        }
    }

    #[test]
    fn test_fit_empty_fails() {
        let dataset = Dataset::new(vec!["x".to_string()], vec!["a".to_string()]);
        let mut tree = DecisionTree::new(TreeConfig::default());
        assert!(matches!(tree.fit(&dataset), Err(Error::EmptyDataset)));
    }
}
