//! Multi-scale sliding-window detection over HOG descriptors.
//!
//! A [`MultiScaleDetector`] walks an image pyramid, scores every window with a
//! [`Classifier`] and hands the raw [`Detection`]s to the aggregation stage of
//! `hog-detect-aggregate`.
//!
//! With the `rayon` feature, windows of one pyramid level are evaluated in
//! parallel; results keep scan order either way.

mod classifier;
mod detector;
mod params;
mod pyramid;

pub use classifier::{Classifier, LinearClassifier, ModelError};
pub use detector::MultiScaleDetector;
pub use params::{DetectorError, MultiScaleParams};
pub use pyramid::{pyramid_levels, PyramidLevels};

pub use hog_detect_core::{Detection, Rect};
