//! Closed-form ballistic estimates
//!
//! Drag-free projectile formulas and the quadratic-regime terminal velocity.
//! They bound what the integrator should produce and give hosts a quick
//! hazard-radius estimate without stepping a population.

use super::forces::{GRAVITY, SPHERE_DRAG_COEFFICIENT};
use crate::core_types::Particle;

/// Horizontal range in vacuum over flat ground (m)
///
/// `R = v0² × sin(2θ) / g`, with `angle` measured from the horizontal.
pub fn max_range(initial_speed: f64, angle: f64) -> f64 {
    initial_speed * initial_speed * (2.0 * angle).sin() / GRAVITY
}

/// Time of flight in vacuum over flat ground (s)
///
/// `t = 2 × v0 × sin(θ) / g`, with `angle` measured from the horizontal.
pub fn flight_time(initial_speed: f64, angle: f64) -> f64 {
    2.0 * initial_speed * angle.sin() / GRAVITY
}

/// Terminal fall speed (m/s) from the drag-weight balance in the quadratic regime
///
/// ```text
/// w_t = sqrt(2 × m × g / (ρ_air × C_d × A))
/// ```
///
/// Buoyancy is ignored; returns 0 for non-positive air density.
pub fn terminal_velocity(particle: &Particle, air_density: f64) -> f64 {
    if air_density <= 0.0 {
        return 0.0;
    }
    let weight = particle.mass() * GRAVITY;
    (2.0 * weight / (air_density * SPHERE_DRAG_COEFFICIENT * particle.cross_section())).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Material, Vec3};
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_range_peaks_at_45_degrees() {
        let v0 = 150.0;
        let best = max_range(v0, FRAC_PI_4);
        assert_relative_eq!(best, v0 * v0 / GRAVITY, max_relative = 1e-12);
        assert!(max_range(v0, 0.3) < best);
        assert!(max_range(v0, 1.2) < best);
    }

    #[test]
    fn test_vertical_shot_flight_time() {
        // Straight up at 98.0665 m/s returns after 20 s
        let t = flight_time(98.0665, std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(t, 20.0, max_relative = 1e-12);
    }

    #[test]
    fn test_terminal_velocity_grows_with_size() {
        let small = Particle::from_material(Vec3::zeros(), Vec3::zeros(), 0.002, Material::Lapilli);
        let large = Particle::from_material(Vec3::zeros(), Vec3::zeros(), 0.2, Material::VolcanicBomb);

        let w_small = terminal_velocity(&small, 1.225);
        let w_large = terminal_velocity(&large, 1.225);
        assert!(w_small > 0.0);
        assert!(w_large > 5.0 * w_small);
        assert_eq!(terminal_velocity(&small, 0.0), 0.0);
    }
}
