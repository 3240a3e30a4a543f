use hog_detect_aggregate::{AggregationError, AggregationParams};
use hog_detect_descriptor::{HogParams, HogParamsError};
use serde::{Deserialize, Serialize};

/// Sliding-window scan configuration.
///
/// Sizes and strides are `[height, width]`, matching [`HogParams`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiScaleParams {
    /// Window size in pixels of the scaled image.
    pub window: [usize; 2],
    /// Step between window origins.
    pub stride: [usize; 2],
    /// Size every window is resized to before describing it; the size the
    /// classifier was trained on.
    pub canonical_size: [usize; 2],
    /// Ratio between consecutive pyramid levels, `> 1`.
    pub scale_factor: f32,
    /// Minimum positive-class probability for a window to count as a
    /// detection (strict).
    pub threshold: f32,
    /// Optional cap on the number of pyramid levels.
    pub max_levels: Option<usize>,
    pub hog: HogParams,
    pub aggregation: AggregationParams,
}

impl Default for MultiScaleParams {
    fn default() -> Self {
        Self {
            window: [64, 64],
            stride: [16, 16],
            canonical_size: [64, 64],
            scale_factor: 1.5,
            threshold: 0.7,
            max_levels: None,
            hog: HogParams::default(),
            aggregation: AggregationParams::default(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DetectorError {
    #[error(transparent)]
    Hog(#[from] HogParamsError),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
    #[error("scale_factor must be finite and > 1 (got {0})")]
    InvalidScaleFactor(f32),
    #[error("stride must be > 0 (got {height}x{width})")]
    ZeroStride { height: usize, width: usize },
    #[error("window must be > 0 (got {height}x{width})")]
    ZeroWindow { height: usize, width: usize },
    #[error("canonical_size must be > 0 (got {height}x{width})")]
    ZeroCanonicalSize { height: usize, width: usize },
    #[error("threshold must be finite (got {0})")]
    InvalidThreshold(f32),
    #[error("classifier expects descriptors of length {expected}, windows produce {got}")]
    ClassifierInputLen { expected: usize, got: usize },
}

impl MultiScaleParams {
    /// Check everything except classifier compatibility.
    pub fn validate(&self) -> Result<(), DetectorError> {
        self.hog.validate()?;
        self.aggregation.validate()?;
        if !self.scale_factor.is_finite() || self.scale_factor <= 1.0 {
            return Err(DetectorError::InvalidScaleFactor(self.scale_factor));
        }
        let [sh, sw] = self.stride;
        if sh == 0 || sw == 0 {
            return Err(DetectorError::ZeroStride {
                height: sh,
                width: sw,
            });
        }
        let [wh, ww] = self.window;
        if wh == 0 || ww == 0 {
            return Err(DetectorError::ZeroWindow {
                height: wh,
                width: ww,
            });
        }
        let [ch, cw] = self.canonical_size;
        if ch == 0 || cw == 0 {
            return Err(DetectorError::ZeroCanonicalSize {
                height: ch,
                width: cw,
            });
        }
        if !self.threshold.is_finite() {
            return Err(DetectorError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}
