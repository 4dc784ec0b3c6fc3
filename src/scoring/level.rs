//! Ordinal risk bands

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Upper edge (inclusive) of the Low band
pub const LOW_CUTOFF: f64 = 0.33;
/// Upper edge (inclusive) of the Medium band
pub const MEDIUM_CUTOFF: f64 = 0.66;

/// Discretized burnout risk.
///
/// Bands are right-closed: Low = [0, 0.33], Medium = (0.33, 0.66],
/// High = (0.66, 1]. A score sitting exactly on a cutoff falls in the
/// lower band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// All levels in ascending order
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// Band a clipped risk score
    pub fn from_score(score: f64) -> Self {
        if score <= LOW_CUTOFF {
            RiskLevel::Low
        } else if score <= MEDIUM_CUTOFF {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// Class index used as the classifier label
    pub fn index(self) -> usize {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Class names in label-index order
    pub fn class_names() -> Vec<String> {
        Self::ALL.iter().map(|l| l.as_str().to_string()).collect()
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(Error::InvalidConfig(format!("unknown risk level '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutoffs_belong_to_lower_band() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.33), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.330_001), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.66), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.660_001), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::High);
    }

    #[test]
    fn test_index_roundtrip() {
        for level in RiskLevel::ALL {
            assert_eq!(RiskLevel::from_index(level.index()), Some(level));
        }
        assert_eq!(RiskLevel::from_index(3), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("HIGH".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert_eq!(" medium ".parse::<RiskLevel>().unwrap(), RiskLevel::Medium);
        assert!("extreme".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }
}
