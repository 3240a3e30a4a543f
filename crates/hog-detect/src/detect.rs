use std::path::Path;

use crate::core::{ImageError, LumaImage, Rect};
use crate::detector::{Classifier, DetectorError, MultiScaleDetector};
use crate::Detection;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidGrayBuffer { expected: usize, got: usize },

    #[error(transparent)]
    Luma(#[from] ImageError),

    #[error(transparent)]
    Decode(#[from] ::image::ImageError),

    #[error(transparent)]
    Detector(#[from] DetectorError),
}

/// Convert an 8-bit grayscale image to luminance in `[0, 1]`.
pub fn luma_from_gray(img: &::image::GrayImage) -> Result<LumaImage, DetectError> {
    luma_from_gray_u8(img.width() as usize, img.height() as usize, img.as_raw())
}

/// Convert a row-major 8-bit buffer to luminance in `[0, 1]`.
pub fn luma_from_gray_u8(
    width: usize,
    height: usize,
    pixels: &[u8],
) -> Result<LumaImage, DetectError> {
    let expected = width * height;
    if pixels.len() != expected {
        return Err(DetectError::InvalidGrayBuffer {
            expected,
            got: pixels.len(),
        });
    }
    let data = pixels.iter().map(|&p| p as f32 / 255.0).collect();
    Ok(LumaImage::new(width, height, data)?)
}

/// Decode any format supported by `image` and convert it to luminance.
pub fn load_luma(path: impl AsRef<Path>) -> Result<LumaImage, DetectError> {
    let img = ::image::open(path)?.to_luma8();
    luma_from_gray(&img)
}

/// Unfiltered window detections for `img`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, detector), fields(width = img.width(), height = img.height()))
)]
pub fn detect_raw<C: Classifier>(
    img: &::image::GrayImage,
    detector: &MultiScaleDetector<C>,
) -> Result<Vec<Detection>, DetectError> {
    let luma = luma_from_gray(img)?;
    Ok(detector.detect_multi_scale(&luma.view()))
}

/// Run the detector end-to-end: pyramid scan -> suppression -> grouping.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, detector), fields(width = img.width(), height = img.height()))
)]
pub fn detect_objects<C: Classifier>(
    img: &::image::GrayImage,
    detector: &MultiScaleDetector<C>,
) -> Result<Vec<Rect>, DetectError> {
    let luma = luma_from_gray(img)?;
    Ok(detector.detect(&luma.view()))
}
