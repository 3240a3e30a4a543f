//! High-level facade crate for the `hog-detect-*` workspace.
//!
//! This crate provides:
//! - re-exports of the underlying crates and their main types,
//! - (feature `image`) helpers that turn `image::GrayImage` buffers into
//!   luminance images and run a detector on them end-to-end.
//!
//! ## Quickstart
//!
//! ```no_run
//! use hog_detect::detect;
//! use hog_detect::{LinearClassifier, MultiScaleDetector, MultiScaleParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("street.png")?.to_luma8();
//! let model = LinearClassifier::load("pedestrian.json")?;
//! let detector = MultiScaleDetector::new(MultiScaleParams::default(), model)?;
//!
//! let rects = detect::detect_objects(&img, &detector)?;
//! println!("found {} objects", rects.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `hog_detect::core`: luminance images, rectangles, disjoint sets, logging.
//! - `hog_detect::descriptor`: HOG descriptor and training-set assembly.
//! - `hog_detect::aggregate`: NMS, merging and rectangle grouping.
//! - `hog_detect::detector`: classifiers and the multi-scale scan.
//! - `hog_detect::detect` (feature `image`): end-to-end helpers from `image::GrayImage`.

pub use hog_detect_aggregate as aggregate;
pub use hog_detect_core as core;
pub use hog_detect_descriptor as descriptor;
pub use hog_detect_detector as detector;

pub use hog_detect_aggregate::{AggregationParams, SuppressionPolicy};
pub use hog_detect_core::{Detection, LumaImage, LumaImageView, Rect};
pub use hog_detect_descriptor::{DescriptorDataset, HogDescriptor, HogParams};
pub use hog_detect_detector::{Classifier, LinearClassifier, MultiScaleDetector, MultiScaleParams};

#[cfg(feature = "image")]
pub mod detect;
