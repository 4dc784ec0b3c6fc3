//! Feature engineering module
//!
//! Turns employee rows into numeric feature vectors for the classifier.

mod engine;

pub use engine::{Feature, FeatureEngine, FeatureSet};
