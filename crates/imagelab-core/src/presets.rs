//! Built-in preset kernels.
//!
//! Mirrors the grids the backend returns from its mask lookup so native
//! tools (the CLI, tests) can work without a server.  The browser client
//! always asks the backend.

use std::convert::Infallible;

use crate::mask::{KernelSize, MaskProvider, PresetKind};

/// Standard deviation of the Gaussian preset, in cells.
pub const GAUSSIAN_SIGMA: f64 = 1.0;

/// [`MaskProvider`] that computes presets locally.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPresets;

impl MaskProvider for BuiltinPresets {
    type Error = Infallible;

    fn fetch(&self, kind: PresetKind, size: KernelSize) -> Result<Vec<Vec<f64>>, Self::Error> {
        Ok(preset_values(kind, size))
    }
}

/// The `size × size` grid for `kind`.
#[must_use]
pub fn preset_values(kind: PresetKind, size: KernelSize) -> Vec<Vec<f64>> {
    let n = size.get();
    let mut grid = vec![vec![0.0; n]; n];
    match kind {
        PresetKind::Identity => {
            grid[n / 2][n / 2] = 1.0;
        }
        PresetKind::Shift => {
            grid[0][n - 1] = 1.0;
        }
        PresetKind::Gaussian => {
            #[allow(clippy::cast_precision_loss)]
            let offset = (n as f64 - 1.0) / 2.0;
            let two_sigma_sq = 2.0 * GAUSSIAN_SIGMA * GAUSSIAN_SIGMA;
            let mut sum = 0.0;
            for (i, row) in grid.iter_mut().enumerate() {
                for (j, cell) in row.iter_mut().enumerate() {
                    #[allow(clippy::cast_precision_loss)]
                    let (y, x) = (i as f64 - offset, j as f64 - offset);
                    *cell = (-x.mul_add(x, y * y) / two_sigma_sq).exp();
                    sum += *cell;
                }
            }
            for cell in grid.iter_mut().flatten() {
                *cell /= sum;
            }
        }
        PresetKind::Sharpen => {
            const SHARPEN: [[f64; 3]; 3] = [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];
            let pad = (n - 3) / 2;
            for (i, row) in SHARPEN.iter().enumerate() {
                grid[pad + i][pad..pad + 3].copy_from_slice(row);
            }
        }
    }
    grid
}
