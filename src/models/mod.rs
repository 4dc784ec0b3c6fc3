//! Machine learning models module
//!
//! Provides multi-class Decision Tree and Random Forest classifiers.

mod decision_tree;
mod random_forest;

pub use decision_tree::{DecisionTree, TreeConfig, TreeNode};
pub use random_forest::{ForestConfig, MaxFeatures, RandomForest};
