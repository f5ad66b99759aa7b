//! Population telemetry for host displays and logs

use super::ESCAPE_CEILING;
use crate::core_types::{Material, Particle};
use rustc_hash::FxHashMap;

/// Altitude statistics over particles strictly between sea level and the ceiling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltitudeStats {
    /// Number of particles contributing
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Snapshot of a particle set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulationSummary {
    /// Every particle in the set
    pub total: usize,
    /// `None` when no particle has a usable altitude
    pub altitude: Option<AltitudeStats>,
    /// Particle count per material
    pub per_material: FxHashMap<Material, usize>,
}

impl PopulationSummary {
    /// Summarise `particles`
    ///
    /// NaN altitudes and altitudes outside `(0, ESCAPE_CEILING)` are left
    /// out of the altitude statistics but still counted.
    pub fn from_particles(particles: &[Particle]) -> Self {
        let mut per_material = FxHashMap::default();
        let mut sum = 0.0;
        let mut count = 0usize;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for p in particles {
            *per_material.entry(p.material()).or_insert(0) += 1;

            let z = p.altitude();
            if z > 0.0 && z < ESCAPE_CEILING {
                sum += z;
                count += 1;
                min = min.min(z);
                max = max.max(z);
            }
        }

        let altitude = (count > 0).then(|| AltitudeStats {
            count,
            mean: sum / count as f64,
            min,
            max,
        });

        PopulationSummary {
            total: particles.len(),
            altitude,
            per_material,
        }
    }

    /// Number of particles of `material`
    pub fn count_of(&self, material: Material) -> usize {
        self.per_material.get(&material).copied().unwrap_or(0)
    }

    /// Mean usable altitude, if any
    pub fn mean_altitude(&self) -> Option<f64> {
        self.altitude.map(|a| a.mean)
    }
}
