//! Error types for the Impulso risk library

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A label class has no members, so a stratified split is impossible
    #[error("Cannot stratify: class '{class}' has no members")]
    EmptyClass { class: String },

    /// A label class is too small to appear in both partitions
    #[error("Cannot stratify: class '{class}' has only {count} member(s), need at least 2")]
    ClassTooSmall { class: String, count: usize },

    /// Operation requires at least one sample
    #[error("Dataset is empty")]
    EmptyDataset,

    /// Feature vector has the wrong length
    #[error("Expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Sampling distribution could not be built
    #[error("Distribution error: {0}")]
    Distribution(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    /// Whether the error comes from a degenerate stratified split
    pub fn is_split_error(&self) -> bool {
        matches!(self, Error::EmptyClass { .. } | Error::ClassTooSmall { .. })
    }
}
