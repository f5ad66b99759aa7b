//! Vector type alias for 3D positions and directions.

use nalgebra::Vector3;

/// 3D vector type for positions, velocities, and forces.
///
/// This is a simple alias for `nalgebra::Vector3<f64>`. Positions live in a
/// projected CRS where easting/northing run to hundreds of kilometres, so the
/// simulation keeps double precision throughout.
pub type Vec3 = Vector3<f64>;
