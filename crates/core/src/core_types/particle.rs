//! Ejecta particle state and derived physical quantities
//!
//! A particle is a rigid sphere of uniform density. Everything beyond position,
//! velocity, density, diameter and material is derived on demand:
//!
//! ```text
//! r = d / 2
//! V = 4/3 · π · r³
//! m = ρ · V
//! ```
//!
//! The engine divides by mass every step, so construction rejects
//! non-positive or non-finite diameters and densities.

use crate::core_types::material::Material;
use crate::core_types::vec3::Vec3;
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Single ejecta particle
///
/// # Example
///
/// ```
/// use volcano_sim_core::{Material, Particle, Vec3};
///
/// let bomb = Particle::from_material(
///     Vec3::new(451_200.0, 4_519_800.0, 1_200.0), // UTM position, vent rim
///     Vec3::new(0.0, 0.0, 180.0),                 // near-vertical ejection
///     0.08,                                       // 8 cm
///     Material::VolcanicBomb,
/// );
///
/// assert_eq!(bomb.density(), 2700.0);
/// assert!(bomb.mass() > 0.7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub(crate) position: Vec3,
    pub(crate) velocity: Vec3,
    pub(crate) density: f64,  // kg/m³
    pub(crate) diameter: f64, // m
    pub(crate) material: Material,
}

impl Particle {
    /// Create a new particle
    ///
    /// Panics if `density` or `diameter` is not a finite positive number; use
    /// [`Particle::try_new`] for unvalidated input.
    #[track_caller]
    pub fn new(
        position: Vec3,
        velocity: Vec3,
        density: f64,
        diameter: f64,
        material: Material,
    ) -> Self {
        assert!(
            density.is_finite() && density > 0.0,
            "Particle::new: density must be positive, got {density}"
        );
        assert!(
            diameter.is_finite() && diameter > 0.0,
            "Particle::new: diameter must be positive, got {diameter}"
        );
        Particle {
            position,
            velocity,
            density,
            diameter,
            material,
        }
    }

    /// Create a new particle, validating the physical parameters
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] when `density` or `diameter` is
    /// zero, negative or not finite.
    pub fn try_new(
        position: Vec3,
        velocity: Vec3,
        density: f64,
        diameter: f64,
        material: Material,
    ) -> Result<Self> {
        if !(density.is_finite() && density > 0.0) {
            return Err(SimError::invalid(
                "density",
                format!("must be positive, got {density}"),
            ));
        }
        if !(diameter.is_finite() && diameter > 0.0) {
            return Err(SimError::invalid(
                "diameter",
                format!("must be positive, got {diameter}"),
            ));
        }
        Ok(Particle {
            position,
            velocity,
            density,
            diameter,
            material,
        })
    }

    /// Create a particle whose density is the material's reference density
    #[track_caller]
    pub fn from_material(position: Vec3, velocity: Vec3, diameter: f64, material: Material) -> Self {
        Self::new(
            position,
            velocity,
            material.reference_density(),
            diameter,
            material,
        )
    }

    /// Sphere radius (m)
    #[inline]
    pub fn radius(&self) -> f64 {
        0.5 * self.diameter
    }

    /// Sphere volume (m³)
    #[inline]
    pub fn volume(&self) -> f64 {
        let r = self.radius();
        (4.0 / 3.0) * PI * r * r * r
    }

    /// Mass (kg)
    #[inline]
    pub fn mass(&self) -> f64 {
        self.density * self.volume()
    }

    /// Cross-sectional area presented to the flow (m²)
    #[inline]
    pub fn cross_section(&self) -> f64 {
        let r = self.radius();
        PI * r * r
    }

    /// Get current position (m)
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Get current velocity (m/s)
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Get density (kg/m³)
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Get diameter (m)
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// Get material tag
    pub fn material(&self) -> Material {
        self.material
    }

    /// Current elevation (m)
    #[inline]
    pub fn altitude(&self) -> f64 {
        self.position.z
    }

    /// Displace the particle by `delta`
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Move the particle to `position`
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Overwrite the particle velocity
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }
}
