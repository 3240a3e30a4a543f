use hog_detect_core::LumaImageView;
use serde::{Deserialize, Serialize};

use crate::block::normalize_blocks;
use crate::gradient::GradientField;
use crate::histogram::CellHistograms;
use crate::params::{descriptor_length, HogParams, HogParamsError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// HOG descriptor extractor for a validated configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HogParams", into = "HogParams")]
pub struct HogDescriptor {
    params: HogParams,
}

/// Intermediate results of one descriptor computation.
#[derive(Clone, Debug)]
pub struct HogStages {
    pub gradients: GradientField,
    pub cells: CellHistograms,
    pub descriptor: Vec<f32>,
}

impl HogDescriptor {
    /// Validate `params` and build the extractor.
    pub fn new(params: HogParams) -> Result<Self, HogParamsError> {
        params.validate()?;
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &HogParams {
        &self.params
    }

    /// Descriptor length for a `width x height` window, without running the
    /// pipeline.
    #[inline]
    pub fn length(&self, width: usize, height: usize) -> usize {
        descriptor_length(width, height, &self.params)
    }

    /// Gradients -> cell histograms -> normalized blocks over the whole image.
    ///
    /// Images smaller than one block produce an empty descriptor.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn compute(&self, image: &LumaImageView<'_>) -> Vec<f32> {
        let gradients = GradientField::compute(image);
        let cells = CellHistograms::compute(&gradients, &self.params);
        let mut out = Vec::new();
        normalize_blocks(&cells, &self.params, &mut out);
        out
    }

    /// Same as [`HogDescriptor::compute`], keeping every intermediate stage.
    pub fn compute_stages(&self, image: &LumaImageView<'_>) -> HogStages {
        let gradients = GradientField::compute(image);
        let cells = CellHistograms::compute(&gradients, &self.params);
        let mut descriptor = Vec::new();
        normalize_blocks(&cells, &self.params, &mut descriptor);
        HogStages {
            gradients,
            cells,
            descriptor,
        }
    }
}

impl TryFrom<HogParams> for HogDescriptor {
    type Error = HogParamsError;

    fn try_from(params: HogParams) -> Result<Self, Self::Error> {
        Self::new(params)
    }
}

impl From<HogDescriptor> for HogParams {
    fn from(d: HogDescriptor) -> Self {
        d.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use hog_detect_core::LumaImage;

    fn noise_image(width: usize, height: usize, seed: u32) -> LumaImage {
        let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
        LumaImage::from_fn(width, height, |_, _| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state % 1000) as f32 / 999.0
        })
        .expect("img")
    }

    #[test]
    fn computed_length_matches_closed_form() {
        let configs = [
            HogParams::default(),
            HogParams {
                bin_count: 4,
                cell_size: [3, 5],
                block_size: [1, 3],
            },
            HogParams {
                bin_count: 1,
                cell_size: [1, 1],
                block_size: [1, 1],
            },
            HogParams {
                bin_count: 12,
                cell_size: [6, 4],
                block_size: [3, 2],
            },
        ];
        for params in configs {
            let hog = HogDescriptor::new(params).expect("valid");
            for (w, h) in [(1, 1), (7, 9), (16, 16), (33, 20), (64, 48), (5, 40)] {
                let img = noise_image(w, h, (w * 31 + h) as u32);
                let d = hog.compute(&img.view());
                assert_eq!(d.len(), hog.length(w, h), "{params:?} {w}x{h}");
            }
        }
    }

    #[test]
    fn components_and_block_norms_are_bounded() {
        let hog = HogDescriptor::default();
        let img = noise_image(48, 40, 7);
        let d = hog.compute(&img.view());
        assert!(!d.is_empty());
        assert!(d.iter().all(|&v| (0.0..=1.0).contains(&v)));

        let block_len = hog.params().block_len();
        for block in d.chunks_exact(block_len) {
            let norm = block.iter().map(|v| v * v).sum::<f32>().sqrt();
            assert!(norm <= 1.0 + 1e-6, "block norm {norm}");
        }
    }

    #[test]
    fn single_angle_patch_concentrates_in_two_bins() {
        // constant diagonal gradient: gx == gy > 0 -> 45 degrees, between the
        // anchors at 40 and 80 for 9 bins
        let params = HogParams {
            bin_count: 9,
            cell_size: [4, 4],
            block_size: [1, 1],
        };
        let hog = HogDescriptor::new(params).expect("valid");
        let img = LumaImage::from_fn(12, 12, |x, y| 0.02 * (x + y) as f32).expect("img");
        let stages = hog.compute_stages(&img.view());

        // the centre cell has no zero-padded taps
        let hist = stages.cells.cell(1, 1);
        let total: f32 = (4..8)
            .flat_map(|y| (4..8).map(move |x| (x, y)))
            .map(|(x, y)| stages.gradients.at(x, y).0)
            .sum();

        assert_abs_diff_eq!(hist.iter().sum::<f32>(), total, epsilon = 1e-4);
        assert_abs_diff_eq!(hist[1], total * 35.0 / 40.0, epsilon = 1e-3);
        assert_abs_diff_eq!(hist[2], total * 5.0 / 40.0, epsilon = 1e-3);
        for (i, &v) in hist.iter().enumerate() {
            if i != 1 && i != 2 {
                assert_eq!(v, 0.0, "bin {i}");
            }
        }
    }

    #[test]
    fn tiny_image_yields_empty_descriptor() {
        let hog = HogDescriptor::default();
        let img = LumaImage::filled(15, 100, 0.3).expect("img");
        assert!(hog.compute(&img.view()).is_empty());
        assert_eq!(hog.length(15, 100), 0);
    }

    #[test]
    fn compute_is_deterministic() {
        let hog = HogDescriptor::default();
        let img = noise_image(32, 32, 3);
        assert_eq!(hog.compute(&img.view()), hog.compute(&img.view()));
        assert_eq!(
            hog.compute(&img.view()),
            hog.compute_stages(&img.view()).descriptor
        );
    }

    #[test]
    fn invalid_params_fail_on_deserialize() {
        let err = serde_json::from_str::<HogDescriptor>(r#"{"bin_count": 0}"#);
        assert!(err.is_err());
        let ok: HogDescriptor =
            serde_json::from_str(r#"{"cell_size": [4, 4]}"#).expect("valid json");
        assert_eq!(ok.params().cell_size, [4, 4]);
    }
}
