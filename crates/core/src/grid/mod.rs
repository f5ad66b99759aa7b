//! Terrain rasters and ground lookup

pub mod elevation_grid;
pub mod geo_transform;
pub mod terrain;

pub use elevation_grid::{ColorGrid, ElevationGrid, Rgb};
pub use geo_transform::{GeoExtent, GeoTransform, SINGULAR_DETERMINANT};
pub use terrain::{FlatGround, GroundSurface, TerrainSampler};
