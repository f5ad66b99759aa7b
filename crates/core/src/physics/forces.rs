//! Force model for a spherical particle in still or moving air
//!
//! Pure functions: nothing here owns state, so every call is safe from any
//! number of rayon workers at once.
//!
//! # Forces
//!
//! 1. **Gravity** `F_g = m × g`, always along −z
//! 2. **Buoyancy** `F_b = ρ_air × V × g`, always along +z (Archimedes)
//! 3. **Drag**, opposing the velocity relative to the air, with the regime
//!    picked by the particle Reynolds number `Re = ρ_air × |v_rel| × d / μ`:
//!    ```text
//!    Re < 1  (Stokes)     F_d = 6π × μ × r × |v_rel|
//!    Re >= 1 (quadratic)  F_d = ½ × ρ_air × |v_rel|² × C_d × π r²
//!    ```
//!
//! # References
//!
//! - Stokes, G.G. (1851). "On the effect of the internal friction of fluids on
//!   the motion of pendulums." Trans. Cambridge Phil. Soc. 9, 8-106.
//! - Bonadonna, C., Ernst, G.G.J., Sparks, R.S.J. (1998). "Thickness variations
//!   and volume estimates of tephra fall deposits: the importance of particle
//!   Reynolds number." J. Volcanol. Geotherm. Res. 81, 173-187.

use crate::core_types::{Particle, Vec3};
use std::f64::consts::PI;

/// Standard gravity (m/s²)
pub const GRAVITY: f64 = 9.80665;

/// Dynamic viscosity of air (Pa·s)
pub const AIR_VISCOSITY: f64 = 1.8e-5;

/// Drag coefficient of a smooth sphere in the Newton regime
pub const SPHERE_DRAG_COEFFICIENT: f64 = 0.47;

/// Relative speeds below this produce no drag (m/s)
pub const MIN_RELATIVE_SPEED: f64 = 1e-12;

/// Reynolds number separating the Stokes and quadratic drag laws
pub const STOKES_REYNOLDS_LIMIT: f64 = 1.0;

/// Drag law in effect for a given flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragRegime {
    /// Viscous (creeping) flow, drag linear in speed
    Stokes,
    /// Inertial flow, drag quadratic in speed
    Quadratic,
}

impl DragRegime {
    /// Select the regime for a particle Reynolds number
    #[inline]
    pub fn from_reynolds(reynolds: f64) -> Self {
        if reynolds < STOKES_REYNOLDS_LIMIT {
            DragRegime::Stokes
        } else {
            DragRegime::Quadratic
        }
    }
}

/// Weight of the particle (N), acting along −z
#[inline]
pub fn gravity_force(particle: &Particle) -> f64 {
    particle.mass() * GRAVITY
}

/// Buoyant lift on the particle (N), acting along +z
#[inline]
pub fn buoyancy_force(particle: &Particle, air_density: f64) -> f64 {
    air_density * particle.volume() * GRAVITY
}

/// Particle Reynolds number for a sphere of `diameter` moving at `speed`
#[inline]
pub fn reynolds_number(speed: f64, diameter: f64, air_density: f64) -> f64 {
    air_density * speed.abs() * diameter / AIR_VISCOSITY
}

/// Stokes drag magnitude (N)
#[inline]
pub fn stokes_drag_magnitude(speed: f64, particle: &Particle) -> f64 {
    6.0 * PI * AIR_VISCOSITY * particle.radius() * speed
}

/// Quadratic (Newton) drag magnitude (N) with the sphere drag coefficient
#[inline]
pub fn quadratic_drag_magnitude(speed: f64, particle: &Particle, air_density: f64) -> f64 {
    0.5 * air_density * speed * speed * SPHERE_DRAG_COEFFICIENT * particle.cross_section()
}

/// Drag magnitude (N) using the regime selected by the Reynolds number
pub fn drag_magnitude(speed: f64, particle: &Particle, air_density: f64) -> f64 {
    let re = reynolds_number(speed, particle.diameter(), air_density);
    match DragRegime::from_reynolds(re) {
        DragRegime::Stokes => stokes_drag_magnitude(speed, particle),
        DragRegime::Quadratic => quadratic_drag_magnitude(speed, particle, air_density),
    }
}

/// Drag force vector (N) for a particle moving at `relative_velocity` through air
///
/// `relative_velocity` is particle velocity minus wind velocity. The result
/// points opposite to it; below [`MIN_RELATIVE_SPEED`] the force is zero.
pub fn drag_force(relative_velocity: Vec3, particle: &Particle, air_density: f64) -> Vec3 {
    let speed = relative_velocity.norm();
    if speed < MIN_RELATIVE_SPEED {
        return Vec3::zeros();
    }

    let magnitude = drag_magnitude(speed, particle, air_density);
    -relative_velocity * (magnitude / speed)
}
