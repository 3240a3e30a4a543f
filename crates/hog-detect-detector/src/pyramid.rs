//! Image pyramid walked by the detector.

use hog_detect_core::{LumaImage, LumaImageView};

use crate::params::{DetectorError, MultiScaleParams};

/// Lazily produced pyramid levels `(scale, image)`.
///
/// Level 0 has scale 1; each following level divides the scale by
/// `scale_factor`. Iteration stops once a level is smaller than the window in
/// either dimension, a level cannot be produced, or `max_levels` is reached.
#[derive(Clone, Debug)]
pub struct PyramidLevels<'a> {
    image: LumaImageView<'a>,
    window: [usize; 2],
    scale_factor: f32,
    max_levels: Option<usize>,
    scale: f32,
    produced: usize,
    done: bool,
}

impl<'a> PyramidLevels<'a> {
    /// `params` must already be validated.
    pub(crate) fn new(image: &LumaImageView<'a>, params: &MultiScaleParams) -> Self {
        Self {
            image: *image,
            window: params.window,
            scale_factor: params.scale_factor,
            max_levels: params.max_levels,
            scale: 1.0,
            produced: 0,
            done: false,
        }
    }
}

impl Iterator for PyramidLevels<'_> {
    type Item = (f32, LumaImage);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.max_levels.is_some_and(|m| self.produced >= m) {
            return None;
        }

        let level = match self.image.scale(self.scale) {
            Ok(level) => level,
            Err(err) => {
                log::trace!("pyramid stops at scale {}: {err}", self.scale);
                self.done = true;
                return None;
            }
        };
        let [wh, ww] = self.window;
        if level.width() < ww || level.height() < wh {
            self.done = true;
            return None;
        }

        let scale = self.scale;
        self.scale /= self.scale_factor;
        self.produced += 1;
        Some((scale, level))
    }
}

/// Pyramid of `image` for the scan described by `params`.
pub fn pyramid_levels<'a>(
    image: &LumaImageView<'a>,
    params: &MultiScaleParams,
) -> Result<PyramidLevels<'a>, DetectorError> {
    params.validate()?;
    Ok(PyramidLevels::new(image, params))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_shrink_until_window_no_longer_fits() {
        let img = LumaImage::filled(100, 80, 0.5).expect("img");
        let params = MultiScaleParams {
            window: [20, 20],
            scale_factor: 2.0,
            ..Default::default()
        };
        let levels: Vec<(f32, [usize; 2])> = pyramid_levels(&img.view(), &params)
            .expect("params")
            .map(|(s, l)| (s, [l.width(), l.height()]))
            .collect();
        // 100x80, 50x40, 25x20; 13x10 is too small
        assert_eq!(
            levels,
            vec![(1.0, [100, 80]), (0.5, [50, 40]), (0.25, [25, 20])]
        );
    }

    #[test]
    fn max_levels_caps_depth() {
        let img = LumaImage::filled(256, 256, 0.0).expect("img");
        let params = MultiScaleParams {
            window: [8, 8],
            scale_factor: 1.1,
            max_levels: Some(3),
            ..Default::default()
        };
        assert_eq!(pyramid_levels(&img.view(), &params).expect("params").count(), 3);
    }

    #[test]
    fn window_larger_than_image_gives_no_levels() {
        let img = LumaImage::filled(30, 30, 0.0).expect("img");
        let params = MultiScaleParams::default();
        assert_eq!(pyramid_levels(&img.view(), &params).expect("params").count(), 0);
    }

    #[test]
    fn invalid_params_are_rejected() {
        let img = LumaImage::filled(30, 30, 0.0).expect("img");
        let params = MultiScaleParams {
            scale_factor: 1.0,
            ..Default::default()
        };
        assert!(pyramid_levels(&img.view(), &params).is_err());
    }
}
