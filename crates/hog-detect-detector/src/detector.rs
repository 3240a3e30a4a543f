use hog_detect_aggregate::aggregate;
use hog_detect_core::{Detection, LumaImage, LumaImageView, Rect, ResizeMode};
use hog_detect_descriptor::HogDescriptor;

use crate::classifier::Classifier;
use crate::params::{DetectorError, MultiScaleParams};
use crate::pyramid::PyramidLevels;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Multi-scale sliding-window detector.
///
/// Every window of every pyramid level is cropped, resized to the canonical
/// size, described with HOG and scored by the classifier. Windows whose
/// positive-class probability exceeds the threshold are mapped back to
/// original image coordinates.
#[derive(Debug)]
pub struct MultiScaleDetector<C> {
    params: MultiScaleParams,
    hog: HogDescriptor,
    classifier: C,
}

impl<C: Classifier> MultiScaleDetector<C> {
    /// Validate `params` and check that `classifier` accepts the descriptors
    /// produced for the canonical window size.
    pub fn new(params: MultiScaleParams, classifier: C) -> Result<Self, DetectorError> {
        params.validate()?;
        let hog = HogDescriptor::new(params.hog)?;

        let [ch, cw] = params.canonical_size;
        let feature_len = hog.length(cw, ch);
        if let Some(expected) = classifier.input_len() {
            if expected != feature_len {
                return Err(DetectorError::ClassifierInputLen {
                    expected,
                    got: feature_len,
                });
            }
        }
        if feature_len == 0 {
            log::warn!(
                "canonical size {ch}x{cw} is smaller than one HOG block; every window yields an empty descriptor"
            );
        }
        let [wh, ww] = params.window;
        if wh * cw != ww * ch {
            log::warn!("window {wh}x{ww} and canonical size {ch}x{cw} differ in aspect ratio");
        }

        Ok(Self {
            params,
            hog,
            classifier,
        })
    }

    pub fn params(&self) -> &MultiScaleParams {
        &self.params
    }

    pub fn descriptor(&self) -> &HogDescriptor {
        &self.hog
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Pyramid levels this detector scans for `image`.
    pub fn pyramid<'a>(&self, image: &LumaImageView<'a>) -> PyramidLevels<'a> {
        PyramidLevels::new(image, &self.params)
    }

    /// Raw detections in scan order: level, then row, then column.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn detect_multi_scale(&self, image: &LumaImageView<'_>) -> Vec<Detection> {
        let mut detections = Vec::new();
        for (level_idx, (scale, level)) in self.pyramid(image).enumerate() {
            let before = detections.len();
            self.scan_level(&level, scale, &mut detections);
            log::debug!(
                "level {level_idx}: scale {scale:.4}, {}x{}, {} detections",
                level.width(),
                level.height(),
                detections.len() - before
            );
        }
        detections
    }

    /// Scan, then suppress/merge/group according to `params.aggregation`.
    pub fn detect(&self, image: &LumaImageView<'_>) -> Vec<Rect> {
        let raw = self.detect_multi_scale(image);
        aggregate(&raw, &self.params.aggregation)
    }

    fn scan_level(&self, level: &LumaImage, scale: f32, out: &mut Vec<Detection>) {
        let [wh, ww] = self.params.window;
        let [sy, sx] = self.params.stride;
        // exclusive bound: the last unaligned row/column is not visited
        let origins: Vec<(usize, usize)> = (0..level.height() - wh)
            .step_by(sy)
            .flat_map(|y| (0..level.width() - ww).step_by(sx).map(move |x| (x, y)))
            .collect();

        let view = level.view();

        #[cfg(feature = "rayon")]
        let scored: Vec<Option<Detection>> = origins
            .par_iter()
            .map(|&(x, y)| self.evaluate_window(&view, x, y, scale))
            .collect();

        #[cfg(not(feature = "rayon"))]
        let scored: Vec<Option<Detection>> = origins
            .iter()
            .map(|&(x, y)| self.evaluate_window(&view, x, y, scale))
            .collect();

        out.extend(scored.into_iter().flatten());
    }

    fn evaluate_window(
        &self,
        level: &LumaImageView<'_>,
        x: usize,
        y: usize,
        scale: f32,
    ) -> Option<Detection> {
        let [wh, ww] = self.params.window;
        let [ch, cw] = self.params.canonical_size;

        let window = level
            .crop(x, y, ww, wh)
            .and_then(|w| w.view().resize(cw, ch, ResizeMode::Bilinear));
        let window = match window {
            Ok(w) => w,
            Err(err) => {
                log::trace!("skipping window ({x}, {y}): {err}");
                return None;
            }
        };

        let descriptor = self.hog.compute(&window.view());
        let p = self.classifier.predict_probability(&descriptor);
        if p[1] > self.params.threshold {
            let rect = Rect::new(
                (x as f32 / scale) as i32,
                (y as f32 / scale) as i32,
                (ww as f32 / scale) as i32,
                (wh as f32 / scale) as i32,
            );
            Some(Detection::new(rect, p[1]))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::LinearClassifier;

    fn always(p: f32) -> impl Fn(&[f32]) -> [f32; 2] + Send + Sync {
        move |_: &[f32]| [1.0 - p, p]
    }

    #[test]
    fn constructor_checks_classifier_length() {
        let params = MultiScaleParams {
            canonical_size: [32, 32],
            ..Default::default()
        };
        let ok = LinearClassifier::new(vec![0.0; 3 * 3 * 36], 0.0);
        assert!(MultiScaleDetector::new(params, ok).is_ok());

        let bad = LinearClassifier::new(vec![0.0; 10], 0.0);
        assert_eq!(
            MultiScaleDetector::new(params, bad).err(),
            Some(DetectorError::ClassifierInputLen {
                expected: 10,
                got: 324
            })
        );
    }

    #[test]
    fn scan_visits_exclusive_grid_and_back_projects() {
        let params = MultiScaleParams {
            window: [16, 16],
            stride: [8, 8],
            canonical_size: [16, 16],
            scale_factor: 100.0,
            threshold: 0.5,
            ..Default::default()
        };
        let det = MultiScaleDetector::new(params, always(0.9)).expect("detector");
        let img = LumaImage::filled(40, 32, 0.5).expect("img");
        let raw = det.detect_multi_scale(&img.view());
        // x in 0..24 step 8 -> 0, 8, 16; y in 0..16 step 8 -> 0, 8
        let origins: Vec<(i32, i32)> = raw.iter().map(|d| (d.rect.x, d.rect.y)).collect();
        assert_eq!(
            origins,
            vec![(0, 0), (8, 0), (16, 0), (0, 8), (8, 8), (16, 8)]
        );
        assert!(raw.iter().all(|d| d.rect.width == 16 && d.score == 0.9));
    }

    #[test]
    fn threshold_is_strict() {
        let params = MultiScaleParams {
            window: [16, 16],
            stride: [8, 8],
            canonical_size: [16, 16],
            threshold: 0.5,
            ..Default::default()
        };
        let det = MultiScaleDetector::new(params, always(0.5)).expect("detector");
        let img = LumaImage::filled(40, 40, 0.5).expect("img");
        assert!(det.detect_multi_scale(&img.view()).is_empty());
    }

    #[test]
    fn lower_levels_map_back_to_larger_rects() {
        let params = MultiScaleParams {
            window: [16, 16],
            stride: [16, 16],
            canonical_size: [16, 16],
            scale_factor: 2.0,
            threshold: 0.5,
            max_levels: Some(2),
            ..Default::default()
        };
        let det = MultiScaleDetector::new(params, always(0.9)).expect("detector");
        let img = LumaImage::filled(48, 48, 0.5).expect("img");
        let raw = det.detect_multi_scale(&img.view());
        // level 0: 48x48 -> origins 0, 16 per axis; level 1: 24x24 -> origin 0
        assert_eq!(raw.len(), 5);
        assert_eq!(raw[4].rect, Rect::new(0, 0, 32, 32));
    }

    #[test]
    fn window_larger_than_image_is_not_an_error() {
        let det =
            MultiScaleDetector::new(MultiScaleParams::default(), always(1.0)).expect("detector");
        let img = LumaImage::filled(40, 100, 0.5).expect("img");
        assert!(det.detect_multi_scale(&img.view()).is_empty());
        assert!(det.detect(&img.view()).is_empty());
    }
}
