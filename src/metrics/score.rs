//! Weighted composite layout-quality score
//!
//! The P_Score rewards spatial predictability (hit rate), layout sparsity,
//! tag diversity, moderate visual coverage, and image compressibility — one
//! proxy for how cleanly a grid of a given resolution explains a layout.

use crate::io::configuration::{
    WEIGHT_COMPRESSION, WEIGHT_COVERAGE, WEIGHT_ENTROPY, WEIGHT_HIT_RATE, WEIGHT_SPARSITY,
};
use crate::io::error::{Result, invalid_parameter};

/// Tolerance when checking that the weights sum to 1.0
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Composite score weights
///
/// The weights are configuration, not hard-coded truth: the historical
/// defaults carry no documented derivation, so alternative weightings remain
/// comparable as long as they sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Weight on the fuzzy hit rate
    pub hit_rate: f64,
    /// Weight on layout sparsity, `1 - density`
    pub sparsity: f64,
    /// Weight on tag entropy
    pub entropy: f64,
    /// Weight on bounding-box coverage
    pub coverage: f64,
    /// Weight on the file compression ratio
    pub compression: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            hit_rate: WEIGHT_HIT_RATE,
            sparsity: WEIGHT_SPARSITY,
            entropy: WEIGHT_ENTROPY,
            coverage: WEIGHT_COVERAGE,
            compression: WEIGHT_COMPRESSION,
        }
    }
}

impl ScoreWeights {
    /// Sum of all five weights
    pub const fn sum(&self) -> f64 {
        self.hit_rate + self.sparsity + self.entropy + self.coverage + self.compression
    }

    /// Check that every weight is finite and the weights sum to 1.0
    ///
    /// # Errors
    ///
    /// Returns an error if any weight is non-finite or negative, or if the
    /// sum deviates from 1.0 beyond floating-point tolerance
    pub fn validate(&self) -> Result<()> {
        let weights = [
            self.hit_rate,
            self.sparsity,
            self.entropy,
            self.coverage,
            self.compression,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid_parameter(
                "score weights",
                &format!("{self:?}"),
                &"weights must be finite and non-negative",
            ));
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(invalid_parameter(
                "score weights",
                &format!("{self:?}"),
                &format!("weights sum to {sum}, expected 1.0"),
            ));
        }

        Ok(())
    }

    /// Combine the five metrics into one P_Score
    ///
    /// An unavailable compression ratio contributes 0 to its term — the
    /// documented degraded-score policy, not an error.
    pub fn score(
        &self,
        hit_rate: f64,
        density: f64,
        entropy: f64,
        bbox_coverage: f64,
        file_cr: Option<f64>,
    ) -> f64 {
        let compression_term = self.compression * file_cr.unwrap_or(0.0);
        self.hit_rate.mul_add(
            hit_rate,
            self.sparsity.mul_add(
                1.0 - density,
                self.entropy.mul_add(
                    entropy,
                    self.coverage.mul_add(bbox_coverage, compression_term),
                ),
            ),
        )
    }
}
