//! Risk scoring module
//!
//! Fixed linear burnout-risk formula and its three-band discretization.

mod level;
mod scorer;

pub use level::{RiskLevel, LOW_CUTOFF, MEDIUM_CUTOFF};
pub use scorer::{
    RiskInputs, RiskScorer, RiskWeights, ABSENTEEISM_MAX, ORDINAL_MAX, WORKLOAD_MAX,
};
