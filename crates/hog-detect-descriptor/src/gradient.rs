//! Per-pixel Sobel gradients, magnitudes and orientations.

use hog_detect_core::LumaImageView;

/// Horizontal Sobel kernel, indexed `[ky + 1][kx + 1]`.
pub const SOBEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];

/// Vertical Sobel kernel, indexed `[ky + 1][kx + 1]`.
pub const SOBEL_Y: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Gradient field of a luminance image.
///
/// All grids share the source dimensions and are stored row-major. Taps that
/// fall outside the image contribute nothing to the sums. Angles are in
/// degrees in `[-180, 180]`.
#[derive(Clone, Debug)]
pub struct GradientField {
    width: usize,
    height: usize,
    gx: Vec<f32>,
    gy: Vec<f32>,
    magnitude: Vec<f32>,
    angle: Vec<f32>,
}

impl GradientField {
    pub fn compute(image: &LumaImageView<'_>) -> Self {
        let (w, h) = (image.width, image.height);
        let n = w * h;
        let mut gx = Vec::with_capacity(n);
        let mut gy = Vec::with_capacity(n);

        for y in 0..h {
            for x in 0..w {
                let mut sx = 0.0f32;
                let mut sy = 0.0f32;
                for ky in 0..3 {
                    let Some(yy) = (y + ky).checked_sub(1).filter(|&v| v < h) else {
                        continue;
                    };
                    for kx in 0..3 {
                        let Some(xx) = (x + kx).checked_sub(1).filter(|&v| v < w) else {
                            continue;
                        };
                        let p = image.get(xx, yy);
                        sx += SOBEL_X[ky][kx] * p;
                        sy += SOBEL_Y[ky][kx] * p;
                    }
                }
                gx.push(sx);
                gy.push(sy);
            }
        }

        let magnitude = gx
            .iter()
            .zip(&gy)
            .map(|(&dx, &dy)| (dx * dx + dy * dy).sqrt())
            .collect();
        let angle = gx
            .iter()
            .zip(&gy)
            .map(|(&dx, &dy)| dy.atan2(dx).to_degrees())
            .collect();

        Self {
            width: w,
            height: h,
            gx,
            gy,
            magnitude,
            angle,
        }
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
    pub fn gx(&self) -> &[f32] {
        &self.gx
    }

    #[inline]
    pub fn gy(&self) -> &[f32] {
        &self.gy
    }

    #[inline]
    pub fn magnitude(&self) -> &[f32] {
        &self.magnitude
    }

    #[inline]
    pub fn angle(&self) -> &[f32] {
        &self.angle
    }

    /// `(magnitude, angle)` at pixel `(x, y)`.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> (f32, f32) {
        let i = y * self.width + x;
        (self.magnitude[i], self.angle[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use hog_detect_core::LumaImage;

    #[test]
    fn flat_image_has_zero_interior_gradient() {
        let img = LumaImage::filled(5, 5, 0.7).expect("img");
        let g = GradientField::compute(&img.view());
        let (m, _) = g.at(2, 2);
        assert_abs_diff_eq!(m, 0.0, epsilon = 1e-6);
        // zero padding makes the border respond to the implicit dark frame
        assert!(g.at(0, 2).0 > 0.0);
    }

    #[test]
    fn horizontal_ramp_points_along_x() {
        let img = LumaImage::from_fn(6, 6, |x, _| x as f32 * 0.1).expect("img");
        let g = GradientField::compute(&img.view());
        let i = 3 * 6 + 3;
        // (1+2+1) * (0.4 - 0.2)
        assert_abs_diff_eq!(g.gx()[i], 0.8, epsilon = 1e-5);
        assert_abs_diff_eq!(g.gy()[i], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(g.angle()[i], 0.0, epsilon = 1e-4);
    }

    #[test]
    fn vertical_ramp_points_along_y() {
        let img = LumaImage::from_fn(6, 6, |_, y| 1.0 - y as f32 * 0.1).expect("img");
        let g = GradientField::compute(&img.view());
        let (m, a) = g.at(2, 3);
        assert_abs_diff_eq!(m, 0.8, epsilon = 1e-5);
        assert_abs_diff_eq!(a, -90.0, epsilon = 1e-3);
    }

    #[test]
    fn single_pixel_image() {
        let img = LumaImage::filled(1, 1, 1.0).expect("img");
        let g = GradientField::compute(&img.view());
        assert_eq!(g.magnitude(), &[0.0]);
    }
}
