//! Linear risk score

use serde::{Deserialize, Serialize};

use super::level::RiskLevel;

/// Scale used to normalise the 1-5 ordinal attributes
pub const ORDINAL_MAX: f64 = 5.0;
/// Scale used to normalise workload
pub const WORKLOAD_MAX: f64 = 150.0;
/// Scale used to normalise absenteeism
pub const ABSENTEEISM_MAX: f64 = 80.0;

/// Weights of the normalised attributes in the risk score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    pub burnout: f64,
    pub stress: f64,
    pub workload: f64,
    pub absenteeism: f64,
    pub anxiety: f64,
}

impl RiskWeights {
    pub const CANONICAL: RiskWeights = RiskWeights {
        burnout: 0.35,
        stress: 0.25,
        workload: 0.20,
        absenteeism: 0.10,
        anxiety: 0.10,
    };

    pub fn sum(&self) -> f64 {
        self.burnout + self.stress + self.workload + self.absenteeism + self.anxiety
    }
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// The five attributes the score is computed from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskInputs {
    pub stress: f64,
    pub burnout: f64,
    pub workload: f64,
    pub absenteeism: f64,
    pub anxiety: f64,
}

/// Computes risk scores from the canonical weights
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    weights: RiskWeights,
}

impl RiskScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weights(&self) -> &RiskWeights {
        &self.weights
    }

    /// Weighted sum of the normalised attributes, before noise and clipping
    pub fn base_score(&self, inputs: &RiskInputs) -> f64 {
        let w = &self.weights;
        w.burnout * (inputs.burnout / ORDINAL_MAX)
            + w.stress * (inputs.stress / ORDINAL_MAX)
            + w.workload * (inputs.workload / WORKLOAD_MAX)
            + w.absenteeism * (inputs.absenteeism / ABSENTEEISM_MAX)
            + w.anxiety * (inputs.anxiety / ORDINAL_MAX)
    }

    /// Noisy score clipped to [0, 1]; NaN maps to 0 and infinities clamp to the nearer bound
    pub fn score(&self, inputs: &RiskInputs, noise: f64) -> f64 {
        let raw = self.base_score(inputs) + noise;
        if raw.is_nan() {
            return 0.0;
        }
        raw.clamp(0.0, 1.0)
    }

    /// Score and band in one step
    pub fn assess(&self, inputs: &RiskInputs, noise: f64) -> (f64, RiskLevel) {
        let score = self.score(inputs, noise);
        (score, RiskLevel::from_score(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn inputs(stress: f64, burnout: f64, workload: f64, absenteeism: f64, anxiety: f64) -> RiskInputs {
        RiskInputs {
            stress,
            burnout,
            workload,
            absenteeism,
            anxiety,
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert_relative_eq!(RiskWeights::CANONICAL.sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_base_score_at_maxima_is_one() {
        let scorer = RiskScorer::new();
        let score = scorer.base_score(&inputs(5.0, 5.0, 150.0, 80.0, 5.0));
        assert_relative_eq!(score, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_base_score_known_value() {
        let scorer = RiskScorer::new();
        // 0.35*0.6 + 0.25*0.4 + 0.2*0.6 + 0.1*0.5 + 0.1*0.2
        let score = scorer.base_score(&inputs(2.0, 3.0, 90.0, 40.0, 1.0));
        assert_relative_eq!(score, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_score_clips_extreme_noise() {
        let scorer = RiskScorer::new();
        let x = inputs(3.0, 3.0, 100.0, 40.0, 3.0);
        assert_eq!(scorer.score(&x, 10.0), 1.0);
        assert_eq!(scorer.score(&x, -10.0), 0.0);
        assert_eq!(scorer.score(&x, f64::INFINITY), 1.0);
        assert_eq!(scorer.score(&x, f64::NEG_INFINITY), 0.0);
        assert_eq!(scorer.score(&x, f64::NAN), 0.0);
    }

    #[test]
    fn test_assess_bands_the_clipped_score() {
        let scorer = RiskScorer::new();
        let (score, level) = scorer.assess(&inputs(5.0, 5.0, 149.0, 79.0, 5.0), 0.2);
        assert_eq!(score, 1.0);
        assert_eq!(level, RiskLevel::High);

        let (score, level) = scorer.assess(&inputs(1.0, 1.0, 60.0, 0.0, 1.0), 0.0);
        assert!(score < 0.33);
        assert_eq!(level, RiskLevel::Low);
    }
}
