//! Score-ordered suppression of overlapping detections.

use hog_detect_core::Detection;
use rand::Rng;

use crate::overlap::regularized_iou;

/// Generic suppression loop.
///
/// Repeatedly keeps the highest-scoring remaining detection (the earliest one
/// on ties) and drops every other remaining detection for which
/// `discard(best, candidate)` returns `true`. Candidates are tested in their
/// input order. Kept detections are returned in the order they were picked.
pub fn suppress_with<F>(detections: &[Detection], mut discard: F) -> Vec<Detection>
where
    F: FnMut(&Detection, &Detection) -> bool,
{
    let mut remaining = detections.to_vec();
    let mut kept = Vec::new();

    while !remaining.is_empty() {
        let mut best_idx = 0;
        for (i, d) in remaining.iter().enumerate().skip(1) {
            if d.score > remaining[best_idx].score {
                best_idx = i;
            }
        }
        let best = remaining[best_idx];
        kept.push(best);

        remaining = remaining
            .into_iter()
            .enumerate()
            .filter(|(i, d)| *i != best_idx && !discard(&best, d))
            .map(|(_, d)| d)
            .collect();
    }

    kept
}

/// Classic greedy NMS: drop candidates whose IoU with the kept detection
/// exceeds `overlap_threshold`.
pub fn greedy_nms(detections: &[Detection], overlap_threshold: f32) -> Vec<Detection> {
    suppress_with(detections, |best, cand| {
        best.rect.iou(&cand.rect) > overlap_threshold
    })
}

/// NMS with [`regularized_iou`] and a score-adaptive threshold
/// `overlap_threshold * (1 - (best.score - candidate.score))`.
pub fn regularized_nms<R: Rng + ?Sized>(
    detections: &[Detection],
    overlap_threshold: f32,
    rng: &mut R,
) -> Vec<Detection> {
    suppress_with(detections, |best, cand| {
        let threshold = overlap_threshold * (1.0 - (best.score - cand.score));
        regularized_iou(&best.rect, &cand.rect, rng) > threshold
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hog_detect_core::Rect;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn det(x: i32, y: i32, s: i32, score: f32) -> Detection {
        Detection::new(Rect::new(x, y, s, s), score)
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(greedy_nms(&[], 0.3).is_empty());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(regularized_nms(&[], 0.3, &mut rng).is_empty());
    }

    #[test]
    fn greedy_keeps_best_of_each_overlapping_pair() {
        let dets = [
            det(0, 0, 10, 0.6),
            det(1, 1, 10, 0.9),
            det(40, 40, 10, 0.7),
            det(41, 40, 10, 0.5),
        ];
        let kept = greedy_nms(&dets, 0.3);
        assert_eq!(kept, vec![dets[1], dets[2]]);
    }

    #[test]
    fn ties_keep_the_earliest() {
        let dets = [det(0, 0, 10, 0.8), det(2, 0, 10, 0.8)];
        assert_eq!(greedy_nms(&dets, 0.3), vec![dets[0]]);
    }

    #[test]
    fn threshold_equal_to_iou_is_kept() {
        // IoU = 50 / 150
        let a = det(0, 0, 10, 0.9);
        let b = Detection::new(Rect::new(5, 0, 10, 10), 0.8);
        let iou = a.rect.iou(&b.rect);
        assert_eq!(greedy_nms(&[a, b], iou).len(), 2);
        assert_eq!(greedy_nms(&[a, b], iou - 1e-3).len(), 1);
    }

    #[test]
    fn regularized_is_reproducible_for_a_seed() {
        let dets: Vec<Detection> = (0..30)
            .map(|i| det((i % 6) * 4, (i / 6) * 4, 16, 0.5 + (i as f32 * 0.37) % 0.5))
            .collect();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            regularized_nms(&dets, 0.3, &mut rng)
        };
        let a = run(9);
        let b = run(9);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.rect, y.rect);
            assert_eq!(x.score.to_bits(), y.score.to_bits());
        }
    }

    #[test]
    fn suppress_with_never_discards_everything() {
        let dets = [det(0, 0, 4, 0.1), det(100, 0, 4, 0.2)];
        let kept = suppress_with(&dets, |_, _| true);
        assert_eq!(kept, vec![dets[1]]);
    }
}
