//! Single-channel luminance images and the resampling primitives the
//! descriptor pipeline depends on.
//!
//! Samples are `f32` luminance values, nominally in `[0, 1]`, stored
//! row-major. Every primitive here returns a new image and never mutates its
//! input.

use serde::{Deserialize, Serialize};

/// Errors produced by image construction and resampling.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    #[error("image dimensions must be positive (width={width}, height={height})")]
    ZeroDimensions { width: usize, height: usize },

    #[error("invalid luma buffer length (expected {expected} samples, got {got})")]
    BufferLength { expected: usize, got: usize },

    #[error(
        "crop region ({x}, {y}, {width}x{height}) exceeds the {image_width}x{image_height} image"
    )]
    CropOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        image_width: usize,
        image_height: usize,
    },

    #[error("scale factor must be finite and > 0 (got {0})")]
    InvalidScale(f32),
}

/// Interpolation used by [`LumaImageView::resize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    /// Pick the source sample at `floor(x * rx), floor(y * ry)`.
    Nearest,
    /// 4-neighbour interpolation with edge-clamped sampling.
    #[default]
    Bilinear,
}

/// Borrowed luminance image.
#[derive(Clone, Copy, Debug)]
pub struct LumaImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [f32], // row-major, len = w*h
}

/// Owned luminance image with at least one pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct LumaImage {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl LumaImage {
    /// Wrap a row-major buffer, validating its dimensions.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self, ImageError> {
        check_dimensions(width, height)?;
        let expected = width * height;
        if data.len() != expected {
            return Err(ImageError::BufferLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Image with every sample set to `value`.
    pub fn filled(width: usize, height: usize, value: f32) -> Result<Self, ImageError> {
        Self::new(width, height, vec![value; width * height])
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> f32,
    ) -> Result<Self, ImageError> {
        check_dimensions(width, height)?;
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<f32> {
        self.data
    }

    #[inline]
    pub fn view(&self) -> LumaImageView<'_> {
        LumaImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

impl<'a> LumaImageView<'a> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Copy the view into an owned image.
    pub fn to_image(&self) -> Result<LumaImage, ImageError> {
        LumaImage::new(self.width, self.height, self.data.to_vec())
    }

    /// Resample to `new_width x new_height`.
    pub fn resize(
        &self,
        new_width: usize,
        new_height: usize,
        mode: ResizeMode,
    ) -> Result<LumaImage, ImageError> {
        check_dimensions(self.width, self.height)?;
        check_dimensions(new_width, new_height)?;

        let rx = self.width as f32 / new_width as f32;
        let ry = self.height as f32 / new_height as f32;

        let mut data = Vec::with_capacity(new_width * new_height);
        for y in 0..new_height {
            for x in 0..new_width {
                let sx = x as f32 * rx;
                let sy = y as f32 * ry;
                let v = match mode {
                    ResizeMode::Nearest => {
                        let nx = (sx as usize).min(self.width - 1);
                        let ny = (sy as usize).min(self.height - 1);
                        self.get(nx, ny)
                    }
                    ResizeMode::Bilinear => sample_bilinear(self, sx, sy),
                };
                data.push(v);
            }
        }

        Ok(LumaImage {
            width: new_width,
            height: new_height,
            data,
        })
    }

    /// Copy the `width x height` region whose top-left corner is `(x, y)`.
    pub fn crop(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<LumaImage, ImageError> {
        check_dimensions(width, height)?;
        let fits_x = x.checked_add(width).is_some_and(|end| end <= self.width);
        let fits_y = y.checked_add(height).is_some_and(|end| end <= self.height);
        if !fits_x || !fits_y {
            return Err(ImageError::CropOutOfBounds {
                x,
                y,
                width,
                height,
                image_width: self.width,
                image_height: self.height,
            });
        }

        let mut data = Vec::with_capacity(width * height);
        for row in y..y + height {
            let start = row * self.width + x;
            data.extend_from_slice(&self.data[start..start + width]);
        }

        Ok(LumaImage {
            width,
            height,
            data,
        })
    }

    /// Bilinear resize to `(round(w * k), round(h * k))`.
    pub fn scale(&self, k: f32) -> Result<LumaImage, ImageError> {
        if !k.is_finite() || k <= 0.0 {
            return Err(ImageError::InvalidScale(k));
        }
        let new_width = (self.width as f32 * k).round() as usize;
        let new_height = (self.height as f32 * k).round() as usize;
        self.resize(new_width, new_height, ResizeMode::Bilinear)
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<(), ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::ZeroDimensions { width, height });
    }
    Ok(())
}

/// Bilinear sample at `(x, y)` with the `+1` neighbours clamped to the image.
///
/// Coordinates are expected to be non-negative; negative inputs are clamped to
/// the first row/column. The view must be non-empty.
#[inline]
pub fn sample_bilinear(src: &LumaImageView<'_>, x: f32, y: f32) -> f32 {
    let x = x.max(0.0);
    let y = y.max(0.0);
    let x0 = (x as usize).min(src.width - 1);
    let y0 = (y as usize).min(src.height - 1);
    let x1 = (x0 + 1).min(src.width - 1);
    let y1 = (y0 + 1).min(src.height - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = src.get(x0, y0);
    let p10 = src.get(x1, y0);
    let p01 = src.get(x0, y1);
    let p11 = src.get(x1, y1);

    (1.0 - fx) * (1.0 - fy) * p00 + fx * (1.0 - fy) * p10 + (1.0 - fx) * fy * p01 + fx * fy * p11
}
