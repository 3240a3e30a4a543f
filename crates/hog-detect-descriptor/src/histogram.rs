//! Per-cell orientation histograms with two-bin angular interpolation.

use crate::gradient::GradientField;
use crate::params::HogParams;

/// Guards the interpolation denominator.
const VOTE_EPS: f32 = 1e-6;

/// Orientation histograms for a grid of cells, row-major, `bin_count` values
/// per cell.
#[derive(Clone, Debug)]
pub struct CellHistograms {
    cells_x: usize,
    cells_y: usize,
    bin_count: usize,
    data: Vec<f32>,
}

impl CellHistograms {
    /// Build one histogram per whole cell of `field`.
    pub(crate) fn compute(field: &GradientField, params: &HogParams) -> Self {
        let (cells_x, cells_y) = params.cell_grid(field.width(), field.height());
        let [cell_h, cell_w] = params.cell_size;
        let bin_count = params.bin_count;
        let bin_width = params.bin_width_deg();

        let mut data = vec![0.0f32; cells_x * cells_y * bin_count];
        for (cell_idx, hist) in data.chunks_exact_mut(bin_count).enumerate() {
            let x0 = (cell_idx % cells_x) * cell_w;
            let y0 = (cell_idx / cells_x) * cell_h;
            for y in y0..y0 + cell_h {
                for x in x0..x0 + cell_w {
                    let (magnitude, angle) = field.at(x, y);
                    vote(hist, magnitude, angle, bin_width);
                }
            }
        }

        Self {
            cells_x,
            cells_y,
            bin_count,
            data,
        }
    }

    #[inline]
    pub fn cells_x(&self) -> usize {
        self.cells_x
    }

    #[inline]
    pub fn cells_y(&self) -> usize {
        self.cells_y
    }

    #[inline]
    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Histogram of the cell at column `cx`, row `cy`.
    #[inline]
    pub fn cell(&self, cx: usize, cy: usize) -> &[f32] {
        let start = (cy * self.cells_x + cx) * self.bin_count;
        &self.data[start..start + self.bin_count]
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Split `magnitude` between the two bins straddling `angle_deg`.
///
/// Bin `k` is anchored at `k * bin_width`. The angle is wrapped into
/// `[0, 360)` first; the last bin interpolates towards 360 degrees, i.e. bin 0.
pub(crate) fn vote(hist: &mut [f32], magnitude: f32, angle_deg: f32, bin_width: f32) {
    let n = hist.len();
    let mut angle = angle_deg;
    if angle < 0.0 {
        angle += 360.0;
    }
    if angle >= 360.0 {
        angle -= 360.0;
    }

    let raw = (angle / bin_width).floor().max(0.0) as usize;
    let a0 = raw as f32 * bin_width;
    let a1 = a0 + bin_width;
    let t = ((a1 - angle) / (a1 - a0 + VOTE_EPS)).clamp(0.0, 1.0);

    let bin0 = raw % n;
    let bin1 = (bin0 + 1) % n;
    hist[bin0] += magnitude * t;
    hist[bin1] += magnitude * (1.0 - t);
}
