use crate::histogram::CellHistograms;
use crate::params::HogParams;

/// Added to the block norm before dividing.
const NORM_EPS: f32 = 1e-6;

/// Append every normalized block vector of `cells` to `out`.
///
/// Blocks are visited row-major; inside a block the cell histograms are
/// concatenated in `(dy, dx, bin)` order, divided by `norm + eps` and clipped
/// to `[0, 1]`.
pub(crate) fn normalize_blocks(cells: &CellHistograms, params: &HogParams, out: &mut Vec<f32>) {
    let (blocks_x, blocks_y) = params.block_grid(cells.cells_x(), cells.cells_y());
    let [block_h, block_w] = params.block_size;
    out.reserve(blocks_x * blocks_y * params.block_len());

    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let start = out.len();
            for dy in 0..block_h {
                for dx in 0..block_w {
                    out.extend_from_slice(cells.cell(bx + dx, by + dy));
                }
            }

            let block = &mut out[start..];
            let norm = block.iter().map(|v| v * v).sum::<f32>().sqrt();
            let denom = norm + NORM_EPS;
            for v in block.iter_mut() {
                *v = (*v / denom).clamp(0.0, 1.0);
            }
        }
    }
}
