//! Core types shared by the HOG detection crates.
//!
//! Luminance images with the resampling primitives the descriptor pipeline
//! relies on, integer rectangles with their overlap measures, a disjoint-set
//! forest and a minimal logger. Nothing here knows about descriptors or
//! classifiers.

mod disjoint_set;
mod image;
mod logger;
mod rect;

pub use disjoint_set::DisjointSet;
pub use image::{sample_bilinear, ImageError, LumaImage, LumaImageView, ResizeMode};
pub use rect::{Detection, Rect};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
