use serde::{Deserialize, Serialize};

/// Axis-aligned integer rectangle in image pixel coordinates.
///
/// `(x, y)` is the top-left corner. A rectangle with non-positive width or
/// height is degenerate: it intersects nothing and has zero area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Area in pixels, `0` for degenerate rectangles.
    #[inline]
    pub fn area(&self) -> i64 {
        if self.is_degenerate() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    /// Area of the overlap between `self` and `other`.
    pub fn intersection_area(&self, other: &Rect) -> i64 {
        if self.is_degenerate() || other.is_degenerate() {
            return 0;
        }
        let w = (self.right().min(other.right()) - self.x.max(other.x)).max(0);
        let h = (self.bottom().min(other.bottom()) - self.y.max(other.y)).max(0);
        w as i64 * h as i64
    }

    /// Whether the two rectangles touch or overlap.
    ///
    /// Edges are inclusive, so rectangles that share a border intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    /// Smallest rectangle containing both inputs.
    pub fn bounding_union(&self, other: &Rect) -> Rect {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Intersection over union, `0` when the rectangles do not overlap.
    pub fn iou(&self, other: &Rect) -> f32 {
        let overlap = self.intersection_area(other);
        if overlap == 0 {
            return 0.0;
        }
        let union = self.area() + other.area() - overlap;
        overlap as f32 / union as f32
    }
}

/// A scored rectangle produced by the sliding-window scan.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub rect: Rect,
    /// Classifier probability for the positive class, in `[0, 1]`.
    pub score: f32,
}

impl Detection {
    #[inline]
    pub const fn new(rect: Rect, score: f32) -> Self {
        Self { rect, score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn iou_of_rect_with_itself_is_one() {
        for r in [
            Rect::new(0, 0, 1, 1),
            Rect::new(-5, 3, 17, 9),
            Rect::new(100, 200, 64, 128),
        ] {
            assert_eq!(r.iou(&r), 1.0);
        }
    }

    #[test]
    fn disjoint_and_touching_rects_have_zero_iou() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.iou(&Rect::new(20, 20, 5, 5)), 0.0);
        let touching = Rect::new(10, 0, 10, 10);
        assert_eq!(a.iou(&touching), 0.0);
        assert!(a.intersects(&touching));
    }

    #[test]
    fn partial_overlap_iou() {
        let a = Rect::new(0, 0, 32, 32);
        let b = Rect::new(8, 0, 32, 32);
        // 24*32 / (2*1024 - 768)
        assert_abs_diff_eq!(a.iou(&b), 0.6, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_rect_intersects_nothing() {
        let a = Rect::new(0, 0, 10, 10);
        let flat = Rect::new(2, 2, 0, 5);
        let negative = Rect::new(2, 2, 4, -1);
        assert!(!a.intersects(&flat));
        assert!(!negative.intersects(&a));
        assert_eq!(a.iou(&flat), 0.0);
        assert_eq!(negative.area(), 0);
    }

    #[test]
    fn bounding_union_covers_both() {
        let u = Rect::new(0, 5, 4, 4).bounding_union(&Rect::new(2, 0, 10, 3));
        assert_eq!(u, Rect::new(0, 0, 12, 9));
    }
}
