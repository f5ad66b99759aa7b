//! Ejecta cloud: particle release at the vent and time stepping
//!
//! `EjectaCloud` owns the airborne population. Each step it:
//! 1. Samples ambient wind and air density at every particle's altitude
//! 2. Applies gravity, buoyancy and Reynolds-regime drag
//! 3. Integrates with semi-implicit Euler (velocity first, then position)
//! 4. Moves particles at or below the ground into the caller's grounded set,
//!    and particles at or above the escape ceiling into the escaped set
//!
//! The per-particle update runs on rayon workers. The host's atmosphere is
//! borrowed for the step and only queried through its stateless `&self`
//! surface, and turbulence draws come from each worker's thread-local RNG.

pub mod config;
pub mod policy;
pub mod stats;

pub use config::{AmbientFallback, EruptionConfig, VentConfig};
pub use policy::reclassify_outside_extent;
pub use stats::{AltitudeStats, PopulationSummary};

use crate::core_types::{Particle, Vec3};
use crate::error::Result;
use crate::grid::GroundSurface;
use crate::physics::{buoyancy_force, drag_force, gravity_force};
use crate::weather::AtmosphereModel;
use rand::Rng;
use rayon::prelude::*;
use std::f64::consts::{PI, TAU};
use tracing::debug;

/// Altitude (m) at or above which a particle has left the modelled atmosphere
pub const ESCAPE_CEILING: f64 = 100_000.0;

/// Added to the particle mass before dividing the net force
const MASS_FLOOR: f64 = 1e-12;

/// Largest launch angle from vertical (rad)
const MAX_LAUNCH_ANGLE: f64 = 0.1 * PI;

/// Where a particle belongs after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleFate {
    Airborne,
    /// At or below the ground surface
    Grounded,
    /// At or above [`ESCAPE_CEILING`]
    Escaped,
}

/// Apply the ground / ceiling partition rule to one particle
///
/// The ground test comes first. A NaN ground elevation never grounds.
#[inline]
pub fn classify<G: GroundSurface + ?Sized>(particle: &Particle, ground: &G) -> ParticleFate {
    let position = particle.position();
    let ground_z = ground.ground_elevation(position.x, position.y);

    if position.z <= ground_z {
        ParticleFate::Grounded
    } else if position.z >= ESCAPE_CEILING {
        ParticleFate::Escaped
    } else {
        ParticleFate::Airborne
    }
}

/// Counts from one call to [`EjectaCloud::advance`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Particles appended to the grounded set
    pub grounded: usize,
    /// Particles appended to the escaped set
    pub escaped: usize,
    /// Particles still airborne after the step
    pub airborne: usize,
}

impl StepReport {
    /// Particles that left the airborne set this step
    pub fn moved(&self) -> usize {
        self.grounded + self.escaped
    }
}

/// Airborne ejecta population
#[derive(Debug, Clone, Default)]
pub struct EjectaCloud {
    particles: Vec<Particle>,
}

impl EjectaCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release `count` particles from `vent` using the thread RNG
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`](crate::SimError::InvalidParameter)
    /// if the vent fails validation; nothing is released in that case.
    pub fn generate(&mut self, count: usize, vent: &VentConfig) -> Result<usize> {
        self.generate_with_rng(count, vent, &mut rand::rng())
    }

    /// Release `count` particles from `vent`, drawing from `rng`
    ///
    /// Positions are uniform over the vent disc (`r = R·√u`), azimuth is
    /// uniform, and the launch direction leans at most 0.1π from vertical.
    /// Every particle gets the material's reference density.
    ///
    /// # Errors
    ///
    /// Same as [`EjectaCloud::generate`].
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        vent: &VentConfig,
        rng: &mut R,
    ) -> Result<usize> {
        vent.validate()?;

        let density = vent.material.reference_density();
        self.particles.reserve(count);

        for _ in 0..count {
            let r = vent.radius * rng.random::<f64>().sqrt();
            let theta = rng.random_range(0.0..TAU);
            let speed = rng.random_range(vent.speed_min..=vent.speed_max);
            let phi = rng.random_range(0.0..=MAX_LAUNCH_ANGLE);
            let diameter = rng.random_range(vent.diameter_min..=vent.diameter_max);

            let position = vent.position + Vec3::new(r * theta.cos(), r * theta.sin(), 0.0);
            let velocity = Vec3::new(
                speed * phi.sin() * theta.cos(),
                speed * phi.sin() * theta.sin(),
                speed * phi.cos(),
            );

            self.particles.push(Particle::new(
                position,
                velocity,
                density,
                diameter,
                vent.material,
            ));
        }

        debug!(
            "Released {} {} particles at ({:.1}, {:.1}, {:.1}), {} airborne",
            count,
            vent.material,
            vent.position.x,
            vent.position.y,
            vent.position.z,
            self.particles.len()
        );
        Ok(count)
    }

    /// Advance every airborne particle by `dt` seconds
    ///
    /// With `atmosphere` given, wind and density come from the host's model
    /// at each particle's altitude and only `fallback.updraft` is read;
    /// otherwise `fallback` supplies all ambient air.
    ///
    /// Particles that reach the ground are appended to `grounded`, those
    /// reaching [`ESCAPE_CEILING`] to `escaped`. Neither output is read or
    /// cleared. Relative order of the remaining airborne particles is kept.
    pub fn advance<G: GroundSurface + ?Sized>(
        &mut self,
        dt: f64,
        atmosphere: Option<&AtmosphereModel>,
        fallback: &AmbientFallback,
        grounded: &mut Vec<Particle>,
        escaped: &mut Vec<Particle>,
        ground: &G,
    ) -> StepReport {
        self.particles
            .par_iter_mut()
            .for_each_init(rand::rng, |rng, particle| {
                let (wind, air_density) =
                    ambient_at(particle.altitude(), atmosphere, fallback, rng);
                integrate(particle, wind, air_density, dt);
            });

        let fates: Vec<ParticleFate> = self
            .particles
            .par_iter()
            .map(|p| classify(p, ground))
            .collect();

        let mut report = StepReport::default();
        let mut airborne = Vec::with_capacity(self.particles.len());
        for (particle, fate) in self.particles.drain(..).zip(fates) {
            match fate {
                ParticleFate::Airborne => airborne.push(particle),
                ParticleFate::Grounded => {
                    report.grounded += 1;
                    grounded.push(particle);
                }
                ParticleFate::Escaped => {
                    report.escaped += 1;
                    escaped.push(particle);
                }
            }
        }
        self.particles = airborne;
        report.airborne = self.particles.len();

        debug!(
            "Step dt={:.3}s: {} grounded, {} escaped, {} airborne",
            dt, report.grounded, report.escaped, report.airborne
        );
        report
    }

    /// Airborne particles
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Drop every airborne particle
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Add an already-built particle to the airborne set
    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }
}

/// Wind vector (with updraft and turbulence) and air density at `altitude`
fn ambient_at<R: Rng + ?Sized>(
    altitude: f64,
    atmosphere: Option<&AtmosphereModel>,
    fallback: &AmbientFallback,
    rng: &mut R,
) -> (Vec3, f64) {
    match atmosphere {
        Some(atm) => {
            let sample = atm.sample_at(altitude);
            let wind = Vec3::new(
                sample.wind_u + atm.turbulence_sample_with(rng),
                sample.wind_v + atm.turbulence_sample_with(rng),
                fallback.updraft + atm.turbulence_sample_with(rng),
            );
            (wind, sample.air_density())
        }
        None => {
            let mut wind = fallback.wind();
            if fallback.turbulence > 0.0 {
                for axis in wind.iter_mut() {
                    *axis += fallback.turbulence * rng.random_range(-1.0..=1.0);
                }
            }
            (wind, fallback.air_density)
        }
    }
}

/// One semi-implicit Euler step under gravity, buoyancy and drag
#[inline]
fn integrate(particle: &mut Particle, wind: Vec3, air_density: f64, dt: f64) {
    let relative = particle.velocity - wind;
    let drag = drag_force(relative, particle, air_density);
    let gravity = gravity_force(particle);
    let buoyancy = buoyancy_force(particle, air_density);

    let net = Vec3::new(drag.x, drag.y, -gravity + buoyancy + drag.z);
    let acceleration = net / (particle.mass() + MASS_FLOOR);

    particle.velocity += acceleration * dt;
    particle.position += particle.velocity * dt;
}
