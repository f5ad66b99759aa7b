//! Georeferenced terrain elevation lookup
//!
//! Answers "how high is the ground under map coordinate (x, y)" for the
//! particle integrator. Elevations are bilinearly interpolated between the
//! four surrounding pixel centres; where any of them is missing (off the
//! grid or flagged no-data) the lookup falls back to the nearest pixel.
//!
//! Missing ground is NaN, never a panic or an error: a particle over NaN
//! ground simply cannot land there.

use super::elevation_grid::{ColorGrid, ElevationGrid, Rgb};
use super::geo_transform::{GeoExtent, GeoTransform};
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Anything the engine can test particle altitude against
///
/// Implementors are shared across rayon workers during a step.
pub trait GroundSurface: Sync {
    /// Ground elevation (m) under map position `(x, y)`, NaN when unknown
    fn ground_elevation(&self, x: f64, y: f64) -> f64;
}

/// Infinite horizontal plane at a fixed elevation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatGround(pub f64);

impl GroundSurface for FlatGround {
    #[inline]
    fn ground_elevation(&self, _x: f64, _y: f64) -> f64 {
        self.0
    }
}

/// Elevation raster plus its georeferencing
#[derive(Debug, Clone)]
pub struct TerrainSampler {
    /// `None` until a grid has been loaded
    grid: Option<ElevationGrid>,
    colors: Option<ColorGrid>,
    transform: GeoTransform,
    /// Sentinel in the grid's own `f32` precision
    no_data: Option<f32>,
    /// (min, max) over valid cells, NaN when unknown
    height_range: (f64, f64),
}

impl Default for TerrainSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainSampler {
    /// Empty sampler; every query returns NaN until [`TerrainSampler::load`]
    pub fn new() -> Self {
        TerrainSampler {
            grid: None,
            colors: None,
            transform: GeoTransform::identity(),
            no_data: None,
            height_range: (f64::NAN, f64::NAN),
        }
    }

    /// Build a sampler from a grid in one step
    ///
    /// # Errors
    ///
    /// Same as [`TerrainSampler::load`].
    pub fn from_grid(
        grid: ElevationGrid,
        transform: GeoTransform,
        no_data: Option<f64>,
    ) -> Result<Self> {
        let mut sampler = Self::new();
        sampler.load(grid, transform, no_data)?;
        Ok(sampler)
    }

    /// Replace the elevation grid
    ///
    /// `no_data` is compared against cells after conversion to `f32`. Any
    /// previously loaded colors are dropped.
    ///
    /// # Errors
    ///
    /// [`SimError::EmptyGrid`] or [`SimError::GridSizeMismatch`] for a
    /// malformed grid, [`SimError::SingularTransform`] for a transform that
    /// cannot be inverted. On error the sampler keeps its previous state.
    pub fn load(
        &mut self,
        grid: ElevationGrid,
        transform: GeoTransform,
        no_data: Option<f64>,
    ) -> Result<()> {
        if let Err(e) = grid.validate() {
            warn!("Rejected terrain grid: {}", e);
            return Err(e);
        }
        if !transform.is_invertible() {
            let determinant = transform.determinant();
            warn!("Rejected terrain transform, determinant {:e}", determinant);
            return Err(SimError::SingularTransform { determinant });
        }

        let no_data = no_data.map(|v| v as f32);
        let height_range = valid_range(&grid.data, no_data);

        info!(
            "Loaded terrain: {}x{} cells, pixel {:.2}x{:.2}, elevation {:.1}-{:.1} m",
            grid.nx,
            grid.ny,
            transform.pixel_size_x(),
            transform.pixel_size_y(),
            height_range.0,
            height_range.1
        );

        self.grid = Some(grid);
        self.colors = None;
        self.transform = transform;
        self.no_data = no_data;
        self.height_range = height_range;
        Ok(())
    }

    /// Attach a color raster matching the loaded grid
    ///
    /// # Errors
    ///
    /// [`SimError::TerrainNotLoaded`] before any grid is loaded,
    /// [`SimError::ColorGridMismatch`] when dimensions differ.
    pub fn load_colors(&mut self, colors: ColorGrid) -> Result<()> {
        let Some(grid) = &self.grid else {
            warn!("Rejected color grid: no terrain loaded");
            return Err(SimError::TerrainNotLoaded);
        };

        let expected = grid.nx * grid.ny;
        if colors.nx != grid.nx || colors.ny != grid.ny || colors.data.len() != expected {
            warn!(
                "Rejected color grid: {}x{} ({} pixels) against {}x{} terrain",
                colors.nx,
                colors.ny,
                colors.data.len(),
                grid.nx,
                grid.ny
            );
            return Err(SimError::ColorGridMismatch {
                expected,
                actual: colors.data.len(),
            });
        }

        info!("Loaded terrain colors: {}x{}", colors.nx, colors.ny);
        self.colors = Some(colors);
        Ok(())
    }

    /// Map → fractional pixel coordinates, `None` if singular
    #[inline]
    pub fn geo_to_pixel(&self, geo_x: f64, geo_y: f64) -> Option<(f64, f64)> {
        self.transform.geo_to_pixel(geo_x, geo_y)
    }

    /// Fractional pixel → map coordinates
    #[inline]
    pub fn pixel_to_geo(&self, px: f64, py: f64) -> (f64, f64) {
        self.transform.pixel_to_geo(px, py)
    }

    /// Valid elevation of one cell, `None` off-grid or no-data
    #[inline]
    fn cell(grid: &ElevationGrid, no_data: Option<f32>, ix: i64, iy: i64) -> Option<f64> {
        if ix < 0 || iy < 0 {
            return None;
        }
        let v = grid.get(ix as usize, iy as usize)?;
        if v.is_nan() || no_data == Some(v) {
            return None;
        }
        Some(f64::from(v))
    }

    /// Ground elevation (m) at map position `(geo_x, geo_y)`
    ///
    /// NaN if no grid is loaded or the position falls more than half a pixel
    /// outside the raster. Otherwise bilinear between the four surrounding
    /// cells, or the nearest cell when any of the four is missing.
    pub fn elevation_at(&self, geo_x: f64, geo_y: f64) -> f64 {
        let Some(grid) = &self.grid else {
            return f64::NAN;
        };
        let Some((px, py)) = self.transform.geo_to_pixel(geo_x, geo_y) else {
            return f64::NAN;
        };
        if !(px.is_finite() && py.is_finite()) {
            return f64::NAN;
        }
        if px < -0.5 || py < -0.5 || px > grid.nx as f64 - 0.5 || py > grid.ny as f64 - 0.5 {
            return f64::NAN;
        }

        let x0 = px.floor() as i64;
        let y0 = py.floor() as i64;
        let fx = px - x0 as f64;
        let fy = py - y0 as f64;

        let corners = (
            Self::cell(grid, self.no_data, x0, y0),
            Self::cell(grid, self.no_data, x0 + 1, y0),
            Self::cell(grid, self.no_data, x0, y0 + 1),
            Self::cell(grid, self.no_data, x0 + 1, y0 + 1),
        );

        match corners {
            (Some(e00), Some(e10), Some(e01), Some(e11)) => {
                let e0 = e00 * (1.0 - fx) + e10 * fx;
                let e1 = e01 * (1.0 - fx) + e11 * fx;
                e0 * (1.0 - fy) + e1 * fy
            }
            _ => Self::cell(grid, self.no_data, px.round() as i64, py.round() as i64)
                .unwrap_or(f64::NAN),
        }
    }

    /// [`TerrainSampler::elevation_at`] with absence as `None`
    pub fn try_elevation_at(&self, geo_x: f64, geo_y: f64) -> Option<f64> {
        let z = self.elevation_at(geo_x, geo_y);
        (!z.is_nan()).then_some(z)
    }

    /// (min, max) elevation over valid cells, computed at load
    ///
    /// `(NaN, NaN)` if nothing is loaded or every cell is no-data.
    pub fn height_range(&self) -> (f64, f64) {
        self.height_range
    }

    /// Color of the pixel nearest to `(px, py)`
    pub fn color_at_pixel(&self, px: f64, py: f64) -> Option<Rgb> {
        let colors = self.colors.as_ref()?;
        if !(px.is_finite() && py.is_finite()) {
            return None;
        }
        let ix = px.round();
        let iy = py.round();
        if ix < 0.0 || iy < 0.0 {
            return None;
        }
        colors.get(ix as usize, iy as usize)
    }

    /// Color of the pixel nearest to map position `(geo_x, geo_y)`
    pub fn color_at(&self, geo_x: f64, geo_y: f64) -> Option<Rgb> {
        let (px, py) = self.geo_to_pixel(geo_x, geo_y)?;
        self.color_at_pixel(px, py)
    }

    /// Map-space bounding box of the loaded raster
    pub fn extent(&self) -> Option<GeoExtent> {
        self.grid
            .as_ref()
            .map(|g| GeoExtent::of_raster(&self.transform, g.nx, g.ny))
    }

    /// Number of columns (0 if not loaded)
    pub fn width(&self) -> usize {
        self.grid.as_ref().map_or(0, |g| g.nx)
    }

    /// Number of rows (0 if not loaded)
    pub fn height(&self) -> usize {
        self.grid.as_ref().map_or(0, |g| g.ny)
    }

    pub fn pixel_size_x(&self) -> f64 {
        self.transform.pixel_size_x()
    }

    pub fn pixel_size_y(&self) -> f64 {
        self.transform.pixel_size_y()
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn no_data(&self) -> Option<f32> {
        self.no_data
    }

    pub fn is_loaded(&self) -> bool {
        self.grid.is_some()
    }

    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }
}

impl GroundSurface for TerrainSampler {
    #[inline]
    fn ground_elevation(&self, x: f64, y: f64) -> f64 {
        self.elevation_at(x, y)
    }
}

/// (min, max) over finite, non-sentinel cells
fn valid_range(data: &[f32], no_data: Option<f32>) -> (f64, f64) {
    let mut min_elev = f64::INFINITY;
    let mut max_elev = f64::NEG_INFINITY;

    for &v in data {
        if v.is_nan() || no_data == Some(v) {
            continue;
        }
        let v = f64::from(v);
        min_elev = min_elev.min(v);
        max_elev = max_elev.max(v);
    }

    if min_elev > max_elev {
        (f64::NAN, f64::NAN)
    } else {
        (min_elev, max_elev)
    }
}
