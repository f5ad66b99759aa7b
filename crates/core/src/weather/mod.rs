//! Ambient air conditions along the ejecta flight path
//!
//! Wind, temperature, pressure and humidity as a function of altitude, plus
//! the turbulence that perturbs particle wind each step.
//!
//! # Scientific References
//!
//! - ICAO Standard Atmosphere (1993) for the fallback profile.
//! - Folch, A. (2012). "A review of tephra transport and dispersal models:
//!   Evolution, current status, and future perspectives." J. Volcanol.
//!   Geotherm. Res. 235-236, 96-115.

pub mod atmosphere;

pub use atmosphere::{
    wind_components, AtmosphereModel, AtmosphereSample, ALTITUDE_EPSILON, ATMOSPHERE_CEILING,
    DRY_AIR_GAS_CONSTANT,
};
