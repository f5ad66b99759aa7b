//! Eruption and ambient-air parameters
//!
//! Defaults reproduce a moderate Strombolian episode: 30 m vent, 150-200 m/s
//! ejection, 0.5-2 mm clasts released in batches of up to 30 per 50 ms tick.

use crate::core_types::{Material, Vec3};
use crate::error::{Result, SimError};
use crate::weather::AtmosphereModel;
use serde::{Deserialize, Serialize};

/// Where and how particles leave the vent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentConfig {
    /// Vent centre in map coordinates; z is the release altitude (m)
    pub position: Vec3,
    /// Release disc radius (m)
    pub radius: f64,
    /// Slowest ejection speed (m/s)
    pub speed_min: f64,
    /// Fastest ejection speed (m/s)
    pub speed_max: f64,
    /// Smallest clast diameter (m)
    pub diameter_min: f64,
    /// Largest clast diameter (m)
    pub diameter_max: f64,
    /// Material of every released particle; sets its density
    pub material: Material,
}

impl Default for VentConfig {
    fn default() -> Self {
        VentConfig {
            position: Vec3::zeros(),
            radius: 30.0,
            speed_min: 150.0,
            speed_max: 200.0,
            diameter_min: 0.0005,
            diameter_max: 0.002,
            material: Material::VolcanicAsh,
        }
    }
}

impl VentConfig {
    /// Same vent, moved to `position`
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Same vent, releasing `material`
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Check the ranges before sampling from them
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidParameter`] for a non-finite value, a negative
    /// radius or speed, a non-positive diameter, or an inverted range.
    pub fn validate(&self) -> Result<()> {
        if !self.position.iter().all(|c| c.is_finite()) {
            return Err(SimError::invalid("position", "must be finite"));
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(SimError::invalid(
                "radius",
                format!("must be non-negative, got {}", self.radius),
            ));
        }
        check_range("speed", self.speed_min, self.speed_max, 0.0)?;
        check_range("diameter", self.diameter_min, self.diameter_max, 0.0)?;
        if self.diameter_min <= 0.0 {
            return Err(SimError::invalid(
                "diameter",
                format!("minimum must be positive, got {}", self.diameter_min),
            ));
        }
        Ok(())
    }
}

fn check_range(name: &'static str, min: f64, max: f64, floor: f64) -> Result<()> {
    if !(min.is_finite() && max.is_finite()) {
        return Err(SimError::invalid(name, "range must be finite"));
    }
    if min < floor {
        return Err(SimError::invalid(
            name,
            format!("minimum {min} is below {floor}"),
        ));
    }
    if min > max {
        return Err(SimError::invalid(
            name,
            format!("inverted range {min}..{max}"),
        ));
    }
    Ok(())
}

/// Ambient air used when a step runs without an atmosphere model
///
/// When the host passes a model to the step only `updraft` is read from here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientFallback {
    /// kg/m³
    pub air_density: f64,
    /// Eastward wind (m/s)
    pub wind_u: f64,
    /// Northward wind (m/s)
    pub wind_v: f64,
    /// Vertical air motion (m/s)
    pub updraft: f64,
    /// Half-width of the per-axis uniform wind perturbation (m/s)
    pub turbulence: f64,
}

impl Default for AmbientFallback {
    fn default() -> Self {
        AmbientFallback {
            air_density: 1.225,
            wind_u: 0.0,
            wind_v: 0.0,
            updraft: 0.0,
            turbulence: 0.05,
        }
    }
}

impl AmbientFallback {
    /// Sea-level air with no wind, updraft or turbulence
    pub fn still_air() -> Self {
        AmbientFallback {
            turbulence: 0.0,
            ..Self::default()
        }
    }

    /// Snapshot of the model's current conditions
    ///
    /// Takes the gusty current wind, the current air density and half the
    /// model turbulence, with no updraft.
    pub fn from_atmosphere(atmosphere: &AtmosphereModel) -> Self {
        let (wind_u, wind_v) = atmosphere.gusty_wind();
        AmbientFallback {
            air_density: atmosphere.air_density(),
            wind_u,
            wind_v,
            updraft: 0.0,
            turbulence: atmosphere.turbulence() * 0.5,
        }
    }

    /// Wind vector including the updraft, before turbulence
    pub fn wind(&self) -> Vec3 {
        Vec3::new(self.wind_u, self.wind_v, self.updraft)
    }
}

/// Whole-episode parameters for a host loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EruptionConfig {
    /// Vent template; the host fills in position and per-batch material
    pub vent: VentConfig,
    /// Release height above the ground at the vent (m)
    pub vent_height: f64,
    /// Integration step (s)
    pub dt: f64,
    /// Particles released over the whole episode
    pub total_particles: usize,
    /// Upper bound of the random batch released each tick
    pub max_per_tick: usize,
    /// Atmosphere turbulence intensity (m/s)
    pub turbulence: f64,
    /// Hard stop for the host loop
    pub max_steps: usize,
}

impl Default for EruptionConfig {
    fn default() -> Self {
        EruptionConfig {
            vent: VentConfig::default(),
            vent_height: 500.0,
            dt: 0.05,
            total_particles: 6000,
            max_per_tick: 30,
            turbulence: 0.1,
            max_steps: 20_000,
        }
    }
}

impl EruptionConfig {
    /// # Errors
    ///
    /// [`SimError::InvalidParameter`] for a non-positive step, an empty
    /// batch bound, negative turbulence, or an invalid vent.
    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::invalid(
                "dt",
                format!("must be positive, got {}", self.dt),
            ));
        }
        if self.max_per_tick == 0 {
            return Err(SimError::invalid("max_per_tick", "must be at least 1"));
        }
        if !(self.turbulence.is_finite() && self.turbulence >= 0.0) {
            return Err(SimError::invalid(
                "turbulence",
                format!("must be non-negative, got {}", self.turbulence),
            ));
        }
        self.vent.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(VentConfig::default().validate(), Ok(()));
        assert_eq!(EruptionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_vent_rejects_bad_ranges() {
        let inverted = VentConfig {
            speed_min: 200.0,
            speed_max: 150.0,
            ..VentConfig::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(SimError::InvalidParameter { name: "speed", .. })
        ));

        let zero_diameter = VentConfig {
            diameter_min: 0.0,
            ..VentConfig::default()
        };
        assert!(matches!(
            zero_diameter.validate(),
            Err(SimError::InvalidParameter { name: "diameter", .. })
        ));

        let negative_radius = VentConfig {
            radius: -1.0,
            ..VentConfig::default()
        };
        assert!(matches!(
            negative_radius.validate(),
            Err(SimError::InvalidParameter { name: "radius", .. })
        ));

        let nan_position = VentConfig::default().at(Vec3::new(f64::NAN, 0.0, 0.0));
        assert!(nan_position.validate().is_err());
    }

    #[test]
    fn test_degenerate_ranges_allowed() {
        let fixed = VentConfig {
            radius: 0.0,
            speed_min: 100.0,
            speed_max: 100.0,
            diameter_min: 0.001,
            diameter_max: 0.001,
            ..VentConfig::default()
        };
        assert_eq!(fixed.validate(), Ok(()));
    }

    #[test]
    fn test_eruption_rejects_zero_dt() {
        let config = EruptionConfig {
            dt: 0.0,
            ..EruptionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidParameter { name: "dt", .. })
        ));
    }

    #[test]
    fn test_fallback_from_still_atmosphere() {
        let atmosphere = AtmosphereModel::new(0.0);
        let fallback = AmbientFallback::from_atmosphere(&atmosphere);
        assert_eq!(fallback.wind_u, 2.0);
        assert_eq!(fallback.wind_v, 1.0);
        assert_eq!(fallback.turbulence, 0.0);
        assert!((fallback.air_density - 1.225).abs() < 1e-3);
    }
}
