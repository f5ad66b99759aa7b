//! Decoded raster grids handed to the terrain sampler
//!
//! Grids are plain row-major buffers as produced by a raster decoder: the
//! elevation band is `f32` (`GeoTIFF` float32) and the optional color band is
//! 8-bit RGB. Validation happens when the sampler loads them.

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};

/// Elevation raster, row-major `[iy * nx + ix]`, metres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationGrid {
    /// Number of columns
    pub nx: usize,
    /// Number of rows
    pub ny: usize,
    /// Elevation samples (m)
    pub data: Vec<f32>,
}

impl ElevationGrid {
    pub fn new(nx: usize, ny: usize, data: Vec<f32>) -> Self {
        ElevationGrid { nx, ny, data }
    }

    /// Uniform grid at a single elevation
    pub fn flat(nx: usize, ny: usize, elevation: f32) -> Self {
        ElevationGrid {
            nx,
            ny,
            data: vec![elevation; nx * ny],
        }
    }

    /// Grid with a single Gaussian cone centred on the raster
    ///
    /// `radius` is the e-folding distance in pixels.
    pub fn gaussian_hill(
        nx: usize,
        ny: usize,
        base_elevation: f32,
        peak_height: f32,
        radius: f32,
    ) -> Self {
        let mut data = Vec::with_capacity(nx * ny);
        let center_x = (nx.saturating_sub(1)) as f32 / 2.0;
        let center_y = (ny.saturating_sub(1)) as f32 / 2.0;

        for iy in 0..ny {
            for ix in 0..nx {
                let dx = ix as f32 - center_x;
                let dy = iy as f32 - center_y;
                let dist_sq = dx * dx + dy * dy;

                // Gaussian hill profile
                let height_factor = (-dist_sq / (radius * radius)).exp();
                data.push(base_elevation + peak_height * height_factor);
            }
        }

        ElevationGrid { nx, ny, data }
    }

    /// Check that the grid is non-empty and its buffer holds `nx * ny` values
    ///
    /// # Errors
    ///
    /// [`SimError::EmptyGrid`] for a zero dimension,
    /// [`SimError::GridSizeMismatch`] for a buffer of the wrong length.
    pub fn validate(&self) -> Result<()> {
        if self.nx == 0 || self.ny == 0 {
            return Err(SimError::EmptyGrid);
        }
        if self.data.len() != self.nx * self.ny {
            return Err(SimError::GridSizeMismatch {
                nx: self.nx,
                ny: self.ny,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Raw value at a cell, `None` outside the grid
    #[inline]
    pub fn get(&self, ix: usize, iy: usize) -> Option<f32> {
        if ix >= self.nx || iy >= self.ny {
            return None;
        }
        self.data.get(iy * self.nx + ix).copied()
    }
}

/// 8-bit RGB pixel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb { r, g, b }
    }
}

/// Color raster co-registered with an elevation grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorGrid {
    pub nx: usize,
    pub ny: usize,
    pub data: Vec<Rgb>,
}

impl ColorGrid {
    pub fn new(nx: usize, ny: usize, data: Vec<Rgb>) -> Self {
        ColorGrid { nx, ny, data }
    }

    /// Interleave separate red, green and blue bands
    ///
    /// The result is truncated to the shortest band.
    pub fn from_bands(nx: usize, ny: usize, red: &[u8], green: &[u8], blue: &[u8]) -> Self {
        let data = red
            .iter()
            .zip(green)
            .zip(blue)
            .map(|((&r, &g), &b)| Rgb { r, g, b })
            .collect();
        ColorGrid { nx, ny, data }
    }

    #[inline]
    pub fn get(&self, ix: usize, iy: usize) -> Option<Rgb> {
        if ix >= self.nx || iy >= self.ny {
            return None;
        }
        self.data.get(iy * self.nx + ix).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert_eq!(ElevationGrid::flat(4, 3, 10.0).validate(), Ok(()));
        assert_eq!(
            ElevationGrid::new(0, 3, Vec::new()).validate(),
            Err(SimError::EmptyGrid)
        );
        assert_eq!(
            ElevationGrid::new(2, 2, vec![1.0; 3]).validate(),
            Err(SimError::GridSizeMismatch {
                nx: 2,
                ny: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_gaussian_hill_peaks_at_center() {
        let grid = ElevationGrid::gaussian_hill(21, 21, 100.0, 900.0, 5.0);
        let peak = grid.get(10, 10).unwrap();
        assert_eq!(peak, 1000.0);

        let corner = grid.get(0, 0).unwrap();
        assert!(corner < 101.0);
        assert!(grid.data.iter().all(|&e| (100.0..=1000.0).contains(&e)));
    }

    #[test]
    fn test_get_bounds() {
        let grid = ElevationGrid::flat(3, 2, 5.0);
        assert_eq!(grid.get(2, 1), Some(5.0));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.get(0, 2), None);
    }

    #[test]
    fn test_color_bands_interleave() {
        let colors = ColorGrid::from_bands(2, 1, &[10, 20], &[30, 40], &[50, 60]);
        assert_eq!(colors.get(1, 0), Some(Rgb::new(20, 40, 60)));
        assert_eq!(colors.get(2, 0), None);
        assert_eq!(Rgb::from([1, 2, 3]), Rgb::new(1, 2, 3));
    }
}
