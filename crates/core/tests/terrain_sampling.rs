//! Terrain lookups against a synthetic volcano

use approx::assert_relative_eq;
use volcano_sim_core::{ElevationGrid, GeoTransform, GroundSurface, TerrainSampler};

const PIXEL: f64 = 30.0;

fn volcano() -> TerrainSampler {
    TerrainSampler::from_grid(
        ElevationGrid::gaussian_hill(101, 81, 200.0, 1800.0, 15.0),
        GeoTransform::north_up(440_000.0, 4_520_000.0, PIXEL),
        Some(-9999.0),
    )
    .unwrap()
}

#[test]
fn test_grid_aligned_queries_are_exact() {
    let terrain = volcano();
    let grid = ElevationGrid::gaussian_hill(101, 81, 200.0, 1800.0, 15.0);

    for &(ix, iy) in &[(0, 0), (50, 40), (100, 80), (17, 63), (99, 1)] {
        let (gx, gy) = terrain.pixel_to_geo(ix as f64, iy as f64);
        let expected = f64::from(grid.get(ix, iy).unwrap());
        assert_eq!(terrain.elevation_at(gx, gy), expected);
    }
}

#[test]
fn test_elevation_is_idempotent() {
    let terrain = volcano();
    let points = [
        (440_015.5, 4_519_990.25),
        (441_512.0, 4_518_800.0),
        (442_999.0, 4_517_601.0),
        (0.0, 0.0),
    ];
    for (x, y) in points {
        let first = terrain.elevation_at(x, y);
        let second = terrain.elevation_at(x, y);
        assert!(first.to_bits() == second.to_bits());
    }
}

#[test]
fn test_summit_and_range() {
    let terrain = volcano();
    let extent = terrain.extent().unwrap();
    assert_eq!(extent.width(), 101.0 * PIXEL);
    assert_eq!(extent.height(), 81.0 * PIXEL);

    let (summit_x, summit_y) = terrain.pixel_to_geo(50.0, 40.0);
    assert_relative_eq!(terrain.elevation_at(summit_x, summit_y), 2000.0, epsilon = 1e-3);

    let (lo, hi) = terrain.height_range();
    assert_relative_eq!(hi, 2000.0, epsilon = 1e-3);
    assert!(lo >= 200.0 && lo < 201.0);
}

#[test]
fn test_outside_raster_is_absent() {
    let terrain = volcano();
    let extent = terrain.extent().unwrap();

    assert!(terrain.elevation_at(extent.min_x - 100.0, extent.max_y).is_nan());
    assert_eq!(terrain.try_elevation_at(extent.max_x + 1.0, extent.min_y - 1.0), None);
    assert!(terrain.ground_elevation(0.0, 0.0).is_nan());
}

#[test]
fn test_bilinear_stays_between_neighbours() {
    let terrain = volcano();
    let (x0, y0) = terrain.pixel_to_geo(40.0, 30.0);
    let (x1, y1) = terrain.pixel_to_geo(41.0, 31.0);
    let (xm, ym) = terrain.pixel_to_geo(40.5, 30.5);

    let corners = [
        terrain.elevation_at(x0, y0),
        terrain.elevation_at(x1, y0),
        terrain.elevation_at(x0, y1),
        terrain.elevation_at(x1, y1),
    ];
    let mid = terrain.elevation_at(xm, ym);
    let lo = corners.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = corners.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert!(mid >= lo && mid <= hi);
}
