//! Detection post-processing: suppression, optional merging and grouping.
//!
//! [`aggregate`] runs the full pipeline configured by [`AggregationParams`];
//! the individual stages are exposed for callers that need only one of them.

mod group;
mod nms;
mod overlap;
mod params;

use hog_detect_core::{Detection, Rect};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(feature = "tracing")]
use tracing::instrument;

pub use group::{are_similar, group_rectangles, merge, partition};
pub use nms::{greedy_nms, regularized_nms, suppress_with};
pub use overlap::{iou, regularized_iou};
pub use params::{AggregationError, AggregationParams, SuppressionPolicy};

/// Suppress with the configured policy.
pub fn suppress(detections: &[Detection], params: &AggregationParams) -> Vec<Detection> {
    match params.policy {
        SuppressionPolicy::Greedy => greedy_nms(detections, params.overlap_threshold),
        SuppressionPolicy::Regularized { seed } => {
            let mut rng = StdRng::seed_from_u64(seed);
            regularized_nms(detections, params.overlap_threshold, &mut rng)
        }
    }
}

/// Suppress, optionally merge, then group.
///
/// `params` is expected to be valid (see [`AggregationParams::validate`]).
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(detections, params), fields(detections = detections.len()))
)]
pub fn aggregate(detections: &[Detection], params: &AggregationParams) -> Vec<Rect> {
    let kept = suppress(detections, params);
    let mut rects: Vec<Rect> = kept.iter().map(|d| d.rect).collect();
    if params.merge_intersecting {
        rects = merge(&rects);
    }
    let grouped = group_rectangles(&rects, params.group_threshold, params.eps);

    log::debug!(
        "aggregate: {} detections -> {} after suppression -> {} rects",
        detections.len(),
        kept.len(),
        grouped.len()
    );
    grouped
}
