//! Histogram-of-oriented-gradients descriptor.
//!
//! Pipeline:
//! - Sobel gradients with zero padding ([`GradientField`]),
//! - per-cell orientation histograms over 0..360 degrees with linear voting
//!   between the two nearest bins ([`CellHistograms`]),
//! - overlapping blocks of cells, L2-normalized and clipped to `[0, 1]`.
//!
//! [`HogDescriptor`] ties the stages together; [`DescriptorDataset`] collects
//! labelled descriptors for classifier training.

mod block;
mod dataset;
mod descriptor;
mod gradient;
mod histogram;
mod params;

pub use dataset::{DatasetError, DescriptorDataset, LabeledFeatures};
pub use descriptor::{HogDescriptor, HogStages};
pub use gradient::{GradientField, SOBEL_X, SOBEL_Y};
pub use histogram::CellHistograms;
pub use params::{descriptor_length, HogParams, HogParamsError};
