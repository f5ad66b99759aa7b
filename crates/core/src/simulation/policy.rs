//! Host-side bookkeeping applied on top of the engine's own partition

use crate::core_types::Particle;
use crate::grid::GeoExtent;
use tracing::debug;

/// Move grounded particles lying outside `extent` into `escaped`
///
/// Order is preserved in both sets. Returns the number moved. The engine
/// never calls this; hosts that treat the raster edge as an open boundary
/// run it after each step.
pub fn reclassify_outside_extent(
    grounded: &mut Vec<Particle>,
    escaped: &mut Vec<Particle>,
    extent: &GeoExtent,
) -> usize {
    let before = grounded.len();
    let mut kept = Vec::with_capacity(before);

    for particle in grounded.drain(..) {
        let position = particle.position();
        if extent.contains(position.x, position.y) {
            kept.push(particle);
        } else {
            escaped.push(particle);
        }
    }
    *grounded = kept;

    let moved = before - grounded.len();
    if moved > 0 {
        debug!("Reclassified {} grounded particles outside the terrain extent", moved);
    }
    moved
}
