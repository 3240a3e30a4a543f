//! Overlap measures between detection rectangles.

use hog_detect_core::Rect;
use rand::Rng;

/// Intersection over union; `0` for disjoint or degenerate rectangles.
#[inline]
pub fn iou(a: &Rect, b: &Rect) -> f32 {
    a.iou(b)
}

/// Randomized overlap measure that weighs the larger and the smaller area.
///
/// With `o` the overlap, `A_L`/`A_S` the larger/smaller area and
/// `r = A_S / (A_L + A_S)`, a mixing weight `λ = r/2 + r/2 * (u - 0.5)` is
/// drawn with `u ~ U[0, 1)` and the measure is
/// `(o/2) / (λ A_L + (1 - λ) A_S - o/2)`.
///
/// Exactly one value is drawn from `rng` per call, including for disjoint
/// pairs, so a seeded generator replays identically.
pub fn regularized_iou<R: Rng + ?Sized>(a: &Rect, b: &Rect, rng: &mut R) -> f32 {
    let u: f32 = rng.gen();

    let (area_a, area_b) = (a.area() as f32, b.area() as f32);
    let area_l = area_a.max(area_b);
    let area_s = area_a.min(area_b);
    let overlap = a.intersection_area(b) as f32;
    if overlap <= 0.0 {
        return 0.0;
    }

    let r = area_s / (area_l + area_s);
    let lambda = r / 2.0 + r / 2.0 * (u - 0.5);
    let half = overlap / 2.0;
    half / (lambda * area_l + (1.0 - lambda) * area_s - half)
}
