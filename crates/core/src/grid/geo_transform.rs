//! Affine georeferencing between raster pixel space and map coordinates
//!
//! Coefficients follow the GDAL geotransform order:
//!
//! ```text
//! [originX, pixelSizeX, rowRotation, originY, colRotation, pixelSizeY]
//!
//! geoX = originX + px × pixelSizeX  + py × rowRotation
//! geoY = originY + px × colRotation + py × pixelSizeY
//! ```
//!
//! North-up rasters have zero rotations and a negative `pixelSizeY`.

use serde::{Deserialize, Serialize};

/// Determinants smaller than this make the transform non-invertible
pub const SINGULAR_DETERMINANT: f64 = 1e-12;

/// Six-coefficient affine transform in GDAL order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform([f64; 6]);

impl Default for GeoTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl GeoTransform {
    /// Wrap raw GDAL coefficients
    pub const fn new(coefficients: [f64; 6]) -> Self {
        GeoTransform(coefficients)
    }

    /// Pixel coordinates are map coordinates
    pub const fn identity() -> Self {
        GeoTransform([0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }

    /// North-up raster with square pixels, `origin` at the top-left corner
    pub const fn north_up(origin_x: f64, origin_y: f64, pixel_size: f64) -> Self {
        GeoTransform([origin_x, pixel_size, 0.0, origin_y, 0.0, -pixel_size])
    }

    /// Raw coefficients in GDAL order
    pub fn coefficients(&self) -> [f64; 6] {
        self.0
    }

    /// Determinant of the linear part, `pixelSizeX × pixelSizeY − rowRotation × colRotation`
    #[inline]
    pub fn determinant(&self) -> f64 {
        let [_, sx, rx, _, ry, sy] = self.0;
        sx * sy - rx * ry
    }

    /// True when map coordinates can be mapped back to pixels
    #[inline]
    pub fn is_invertible(&self) -> bool {
        self.determinant().abs() >= SINGULAR_DETERMINANT
    }

    /// Pixel width along the raster X axis (map units)
    pub fn pixel_size_x(&self) -> f64 {
        self.0[1]
    }

    /// Pixel height along the raster Y axis (map units, negative when north-up)
    pub fn pixel_size_y(&self) -> f64 {
        self.0[5]
    }

    /// Forward transform, pixel → map
    #[inline]
    pub fn pixel_to_geo(&self, px: f64, py: f64) -> (f64, f64) {
        let [x0, sx, rx, y0, ry, sy] = self.0;
        (x0 + px * sx + py * rx, y0 + px * ry + py * sy)
    }

    /// Inverse transform, map → fractional pixel
    ///
    /// Returns `None` when the transform is singular.
    #[inline]
    pub fn geo_to_pixel(&self, geo_x: f64, geo_y: f64) -> Option<(f64, f64)> {
        let [x0, sx, rx, y0, ry, sy] = self.0;
        let det = sx * sy - rx * ry;
        if det.abs() < SINGULAR_DETERMINANT {
            return None;
        }

        let dx = geo_x - x0;
        let dy = geo_y - y0;
        Some(((sy * dx - rx * dy) / det, (-ry * dx + sx * dy) / det))
    }
}

/// Axis-aligned map-space bounding box of a raster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoExtent {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl GeoExtent {
    /// Bounding box of the outer pixel edges of an `nx × ny` raster
    pub fn of_raster(transform: &GeoTransform, nx: usize, ny: usize) -> Self {
        let (w, h) = (nx as f64, ny as f64);
        let corners = [
            transform.pixel_to_geo(0.0, 0.0),
            transform.pixel_to_geo(w, 0.0),
            transform.pixel_to_geo(0.0, h),
            transform.pixel_to_geo(w, h),
        ];

        let mut extent = GeoExtent {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for (x, y) in corners {
            extent.min_x = extent.min_x.min(x);
            extent.max_x = extent.max_x.max(x);
            extent.min_y = extent.min_y.min(y);
            extent.max_y = extent.max_y.max(y);
        }
        extent
    }

    /// True if `(x, y)` lies inside the box, edges included
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Map-space centre of the box
    pub fn center(&self) -> (f64, f64) {
        (
            0.5 * (self.min_x + self.max_x),
            0.5 * (self.min_y + self.max_y),
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}
