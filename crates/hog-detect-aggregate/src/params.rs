use serde::{Deserialize, Serialize};

/// Discard test used by the suppression loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SuppressionPolicy {
    /// IoU against a fixed threshold.
    #[default]
    Greedy,
    /// Randomized overlap against a score-adaptive threshold, driven by a
    /// generator seeded with `seed`.
    Regularized { seed: u64 },
}

/// Post-processing applied to raw window detections.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationParams {
    pub policy: SuppressionPolicy,
    /// Overlap above which a lower-scoring detection is suppressed.
    pub overlap_threshold: f32,
    /// Clusters with this many members or fewer are dropped.
    pub group_threshold: usize,
    /// Relative tolerance used by grouping.
    pub eps: f64,
    /// Collapse intersecting survivors into bounding boxes before grouping.
    pub merge_intersecting: bool,
}

impl Default for AggregationParams {
    fn default() -> Self {
        Self {
            policy: SuppressionPolicy::Greedy,
            overlap_threshold: 0.3,
            group_threshold: 0,
            eps: 0.5,
            merge_intersecting: false,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    #[error("overlap_threshold must be finite and >= 0 (got {0})")]
    InvalidOverlapThreshold(f32),
    #[error("eps must be finite and >= 0 (got {0})")]
    InvalidEps(f64),
}

impl AggregationParams {
    pub fn validate(&self) -> Result<(), AggregationError> {
        if !self.overlap_threshold.is_finite() || self.overlap_threshold < 0.0 {
            return Err(AggregationError::InvalidOverlapThreshold(
                self.overlap_threshold,
            ));
        }
        if !self.eps.is_finite() || self.eps < 0.0 {
            return Err(AggregationError::InvalidEps(self.eps));
        }
        Ok(())
    }
}
