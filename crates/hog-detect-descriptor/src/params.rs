use serde::{Deserialize, Serialize};

/// HOG configuration.
///
/// Sizes are given as `[height, width]`. A configuration is validated once
/// when a [`crate::HogDescriptor`] is built from it; code receiving a
/// descriptor assumes the parameters are valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HogParams {
    /// Number of orientation bins spanning 0..360 degrees.
    pub bin_count: usize,
    /// Cell size in pixels.
    pub cell_size: [usize; 2],
    /// Block size in cells.
    pub block_size: [usize; 2],
}

impl Default for HogParams {
    fn default() -> Self {
        Self {
            bin_count: 9,
            cell_size: [8, 8],
            block_size: [2, 2],
        }
    }
}

/// Configuration validation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HogParamsError {
    #[error("bin_count must be >= 1")]
    ZeroBins,
    #[error("cell_size must be > 0 (got {height}x{width})")]
    ZeroCellSize { height: usize, width: usize },
    #[error("block_size must be >= 1 cell (got {height}x{width})")]
    ZeroBlockSize { height: usize, width: usize },
}

impl HogParams {
    pub fn validate(&self) -> Result<(), HogParamsError> {
        if self.bin_count == 0 {
            return Err(HogParamsError::ZeroBins);
        }
        let [ch, cw] = self.cell_size;
        if ch == 0 || cw == 0 {
            return Err(HogParamsError::ZeroCellSize {
                height: ch,
                width: cw,
            });
        }
        let [bh, bw] = self.block_size;
        if bh == 0 || bw == 0 {
            return Err(HogParamsError::ZeroBlockSize {
                height: bh,
                width: bw,
            });
        }
        Ok(())
    }

    /// Angular width of one bin in degrees.
    #[inline]
    pub fn bin_width_deg(&self) -> f32 {
        360.0 / self.bin_count as f32
    }

    /// Number of whole cells `(cells_x, cells_y)` covering a `width x height`
    /// image. Trailing partial cells are dropped.
    #[inline]
    pub fn cell_grid(&self, width: usize, height: usize) -> (usize, usize) {
        (width / self.cell_size[1], height / self.cell_size[0])
    }

    /// Number of block positions `(blocks_x, blocks_y)` on a cell grid.
    #[inline]
    pub fn block_grid(&self, cells_x: usize, cells_y: usize) -> (usize, usize) {
        (
            (cells_x + 1).saturating_sub(self.block_size[1]),
            (cells_y + 1).saturating_sub(self.block_size[0]),
        )
    }

    /// Length of one normalized block vector.
    #[inline]
    pub fn block_len(&self) -> usize {
        self.block_size[0] * self.block_size[1] * self.bin_count
    }
}

/// Descriptor length for a `width x height` window, computed from the
/// configuration alone.
///
/// `params` must be valid (see [`HogParams::validate`]).
pub fn descriptor_length(width: usize, height: usize, params: &HogParams) -> usize {
    let (cells_x, cells_y) = params.cell_grid(width, height);
    let (blocks_x, blocks_y) = params.block_grid(cells_x, cells_y);
    blocks_x * blocks_y * params.block_len()
}
