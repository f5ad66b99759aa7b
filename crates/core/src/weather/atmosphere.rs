//! Vertical atmosphere profile
//!
//! Altitude-indexed wind, temperature, pressure and humidity, interpolated
//! linearly between sounding levels, with an analytic standard-atmosphere
//! fallback when no sounding is loaded.
//!
//! # Query surfaces
//!
//! The model exposes two ways to ask about the air:
//!
//! - **Stateless**: [`AtmosphereModel::sample_at`], [`AtmosphereModel::wind_at`],
//!   [`AtmosphereModel::density_at`] and [`AtmosphereModel::turbulence_sample`].
//!   These take `&self` and are what the particle integrator calls, from many
//!   rayon workers at once.
//! - **Cached**: [`AtmosphereModel::update_for_altitude`] stores the evaluated
//!   sample as the "current" ambient condition for hosts that display it. The
//!   integrator never reads this cache.
//!
//! # Fallback profile
//!
//! ```text
//! T(a) = 15 − 0.0065 × a            (°C, ISA tropospheric lapse rate)
//! P(a) = 101325 × exp(−a / 8500)    (Pa, barometric formula)
//! H(a) = max(0, 50 − 0.002 × a)     (%)
//! u(a) = 2 + 0.001 × a              (m/s)
//! v(a) = 1 + 0.0005 × a             (m/s)
//! ```
//!
//! # References
//!
//! - ICAO Standard Atmosphere (1993)
//! - Wallace, J.M., Hobbs, P.V. (2006). "Atmospheric Science: An Introductory
//!   Survey", 2nd ed., ch. 3 (hypsometric equation, ideal gas law for dry air)

use crate::core_types::units::{Celsius, Pascals, Percent};
use crate::error::{Result, SimError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Ceiling (m) for the analytic fallback and the cached current sample
pub const ATMOSPHERE_CEILING: f64 = 20_000.0;

/// Levels closer than this are treated as the same altitude (m)
pub const ALTITUDE_EPSILON: f64 = 1e-6;

/// Specific gas constant for dry air, J/(kg·K)
pub const DRY_AIR_GAS_CONSTANT: f64 = 287.05;

/// Pressure scale height used by the fallback profile (m)
const SCALE_HEIGHT: f64 = 8500.0;

/// One level of an atmospheric sounding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereSample {
    /// Altitude above sea level (m)
    pub altitude: f64,
    /// Eastward wind component (m/s)
    pub wind_u: f64,
    /// Northward wind component (m/s)
    pub wind_v: f64,
    /// Air temperature
    pub temperature: Celsius,
    /// Air pressure
    pub pressure: Pascals,
    /// Relative humidity
    pub humidity: Percent,
}

impl AtmosphereSample {
    /// Create a sample from its fields
    pub fn new(
        altitude: f64,
        wind_u: f64,
        wind_v: f64,
        temperature: Celsius,
        pressure: Pascals,
        humidity: Percent,
    ) -> Self {
        AtmosphereSample {
            altitude,
            wind_u,
            wind_v,
            temperature,
            pressure,
            humidity,
        }
    }

    /// Analytic fallback conditions at `altitude`
    ///
    /// The altitude is clamped to `[0, ATMOSPHERE_CEILING]` first.
    pub fn standard(altitude: f64) -> Self {
        let a = altitude.clamp(0.0, ATMOSPHERE_CEILING);
        AtmosphereSample {
            altitude: a,
            wind_u: 2.0 + 0.001 * a,
            wind_v: 1.0 + 0.0005 * a,
            temperature: Celsius::new(15.0 - 0.0065 * a),
            pressure: Pascals::new(101325.0 * (-a / SCALE_HEIGHT).exp()),
            humidity: Percent::new((50.0 - 0.002 * a).max(0.0)),
        }
    }

    /// Fallback profile sampled every `spacing` metres from sea level
    ///
    /// `standard_column(21, 500.0)` gives the 0-10 km column used when a
    /// sounding source yields no usable rows.
    pub fn standard_column(levels: usize, spacing: f64) -> Vec<Self> {
        (0..levels)
            .map(|i| Self::standard(i as f64 * spacing))
            .collect()
    }

    /// Dry-air density from the ideal gas law (kg/m³)
    ///
    /// `ρ = P / (R_d × T)`
    #[inline]
    pub fn air_density(&self) -> f64 {
        *self.pressure / (DRY_AIR_GAS_CONSTANT * *self.temperature.to_kelvin())
    }

    /// Horizontal wind `(u, v)` in m/s
    #[inline]
    pub fn wind(&self) -> (f64, f64) {
        (self.wind_u, self.wind_v)
    }

    /// Linear blend towards `upper`, stamped with `altitude`
    fn lerp(&self, upper: &Self, t: f64, altitude: f64) -> Self {
        AtmosphereSample {
            altitude,
            wind_u: self.wind_u + t * (upper.wind_u - self.wind_u),
            wind_v: self.wind_v + t * (upper.wind_v - self.wind_v),
            temperature: self.temperature.lerp(upper.temperature, t),
            pressure: self.pressure.lerp(upper.pressure, t),
            humidity: self.humidity.lerp(upper.humidity, t),
        }
    }
}

/// Convert a wind speed and meteorological direction into `(u, v)` components
///
/// `direction_deg` is the bearing in degrees clockwise from north, applied as
/// `u = s × sin(θ)`, `v = s × cos(θ)`.
pub fn wind_components(speed: f64, direction_deg: f64) -> (f64, f64) {
    let theta = direction_deg.to_radians();
    (speed * theta.sin(), speed * theta.cos())
}

/// Altitude-indexed atmosphere with turbulence injection
///
/// Cloning is cheap: the profile storage is shared, only the turbulence
/// intensity and the cached current sample are per-clone.
#[derive(Debug, Clone)]
pub struct AtmosphereModel {
    /// Sorted ascending by altitude, no two levels within `ALTITUDE_EPSILON`
    profile: Arc<[AtmosphereSample]>,
    /// Half-width of the uniform turbulence perturbation (m/s)
    turbulence: f64,
    /// Last evaluated ambient condition (host telemetry only)
    current: AtmosphereSample,
}

impl Default for AtmosphereModel {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl AtmosphereModel {
    /// Model without a sounding, at sea level, with the given turbulence (m/s)
    pub fn new(turbulence: f64) -> Self {
        Self::with_surface(AtmosphereSample::standard(0.0), turbulence)
    }

    /// Model without a sounding, starting from explicit current conditions
    pub fn with_surface(current: AtmosphereSample, turbulence: f64) -> Self {
        AtmosphereModel {
            profile: Arc::from(Vec::new()),
            turbulence: turbulence.max(0.0),
            current,
        }
    }

    /// Replace the profile with `samples`
    ///
    /// Samples are sorted by altitude and levels within `ALTITUDE_EPSILON` of
    /// the level below collapse onto it. The current sample is refreshed at
    /// its altitude.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::EmptyProfile`] if no sample with a finite altitude
    /// is supplied; the model is left unchanged.
    pub fn load_profile(&mut self, mut samples: Vec<AtmosphereSample>) -> Result<()> {
        samples.retain(|s| s.altitude.is_finite());
        if samples.is_empty() {
            warn!("Rejected empty atmosphere profile, keeping previous state");
            return Err(SimError::EmptyProfile);
        }

        samples.sort_by(|a, b| a.altitude.total_cmp(&b.altitude));
        samples.dedup_by(|later, kept| later.altitude - kept.altitude < ALTITUDE_EPSILON);

        info!(
            "Loaded atmosphere profile: {} levels, {:.0}-{:.0} m",
            samples.len(),
            samples[0].altitude,
            samples[samples.len() - 1].altitude
        );

        self.profile = Arc::from(samples);
        let altitude = self.current.altitude;
        self.update_for_altitude(altitude);
        Ok(())
    }

    /// Drop the loaded profile and fall back to the analytic atmosphere
    pub fn clear_profile(&mut self) {
        self.profile = Arc::from(Vec::new());
    }

    /// Conditions at `altitude`, without touching the cached current sample
    ///
    /// With a profile loaded the raw altitude is interpolated, holding the
    /// lowest and highest levels outside the sounding. Without one the
    /// analytic fallback is evaluated at the altitude clamped to
    /// `[0, ATMOSPHERE_CEILING]`.
    pub fn sample_at(&self, altitude: f64) -> AtmosphereSample {
        if self.profile.is_empty() {
            AtmosphereSample::standard(altitude)
        } else {
            self.interpolate(altitude)
        }
    }

    /// Profile lookup, clamped to the first and last levels
    fn interpolate(&self, altitude: f64) -> AtmosphereSample {
        let profile = &self.profile;
        let upper = profile.partition_point(|s| s.altitude < altitude);

        if upper == 0 {
            return profile[0];
        }
        if upper == profile.len() {
            return profile[profile.len() - 1];
        }

        let lo = &profile[upper - 1];
        let hi = &profile[upper];
        let span = hi.altitude - lo.altitude;
        if span < ALTITUDE_EPSILON {
            return *lo;
        }
        if altitude == hi.altitude {
            return *hi;
        }

        let t = (altitude - lo.altitude) / span;
        lo.lerp(hi, t, altitude)
    }

    /// Evaluate conditions at `altitude` and store them as the current sample
    ///
    /// The altitude is clamped to `[0, ATMOSPHERE_CEILING]` first.
    pub fn update_for_altitude(&mut self, altitude: f64) -> &AtmosphereSample {
        self.current = self.sample_at(altitude.clamp(0.0, ATMOSPHERE_CEILING));
        debug!(
            "Atmosphere at {:.0} m: T={}, P={}, wind=({:.2}, {:.2})",
            self.current.altitude,
            self.current.temperature,
            self.current.pressure,
            self.current.wind_u,
            self.current.wind_v
        );
        &self.current
    }

    /// Horizontal wind `(u, v)` at `altitude` (stateless)
    pub fn wind_at(&self, altitude: f64) -> (f64, f64) {
        self.sample_at(altitude).wind()
    }

    /// Dry-air density at `altitude` (stateless, kg/m³)
    pub fn density_at(&self, altitude: f64) -> f64 {
        self.sample_at(altitude).air_density()
    }

    /// Dry-air density of the cached current sample (kg/m³)
    pub fn air_density(&self) -> f64 {
        self.current.air_density()
    }

    /// One uniform perturbation in `[−turbulence, +turbulence]` (m/s)
    ///
    /// Draws from the calling thread's RNG, so independent across calls and
    /// across rayon workers.
    pub fn turbulence_sample(&self) -> f64 {
        self.turbulence_sample_with(&mut rand::rng())
    }

    /// One uniform perturbation drawn from `rng`
    pub fn turbulence_sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.turbulence <= 0.0 {
            return 0.0;
        }
        rng.random_range(-self.turbulence..=self.turbulence)
    }

    /// Current horizontal wind with one turbulence sample added per component
    pub fn gusty_wind(&self) -> (f64, f64) {
        let mut rng = rand::rng();
        (
            self.current.wind_u + self.turbulence_sample_with(&mut rng),
            self.current.wind_v + self.turbulence_sample_with(&mut rng),
        )
    }

    /// Cached current sample
    pub fn current(&self) -> &AtmosphereSample {
        &self.current
    }

    /// Loaded profile levels, ascending by altitude (empty if none)
    pub fn profile(&self) -> &[AtmosphereSample] {
        &self.profile
    }

    /// True when a sounding has been loaded
    pub fn has_profile(&self) -> bool {
        !self.profile.is_empty()
    }

    /// Turbulence intensity (m/s)
    pub fn turbulence(&self) -> f64 {
        self.turbulence
    }

    /// Set the turbulence intensity (m/s); negative values become 0
    pub fn set_turbulence(&mut self, turbulence: f64) {
        self.turbulence = turbulence.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn level(altitude: f64, temperature: f64) -> AtmosphereSample {
        AtmosphereSample::new(
            altitude,
            altitude / 1000.0,
            -altitude / 2000.0,
            Celsius::new(temperature),
            Pascals::new(101325.0 - altitude * 10.0),
            Percent::new(60.0 - altitude / 100.0),
        )
    }

    fn three_level_model() -> AtmosphereModel {
        let mut model = AtmosphereModel::new(0.0);
        model
            .load_profile(vec![level(0.0, 15.0), level(1000.0, 10.0), level(2000.0, 5.0)])
            .unwrap();
        model
    }

    #[test]
    fn test_midpoint_interpolation() {
        let mut model = three_level_model();
        let s = *model.update_for_altitude(500.0);

        assert_eq!(*s.temperature, 12.5);
        assert_eq!(s.altitude, 500.0);
        assert_relative_eq!(s.wind_u, 0.5);
        assert_relative_eq!(s.wind_v, -0.25);
        assert_relative_eq!(*s.pressure, 101325.0 - 5000.0);
        assert_relative_eq!(*s.humidity, 55.0);
    }

    #[test]
    fn test_clamps_below_and_above_profile() {
        let mut model = three_level_model();

        let low = *model.update_for_altitude(-50.0);
        assert_eq!(low, level(0.0, 15.0));

        let high = *model.update_for_altitude(5000.0);
        assert_eq!(high, level(2000.0, 5.0));
    }

    #[test]
    fn test_exact_level_returns_level() {
        let model = three_level_model();
        assert_eq!(model.sample_at(1000.0), level(1000.0, 10.0));
    }

    #[test]
    fn test_fallback_profile() {
        let mut model = AtmosphereModel::new(0.0);
        let s = *model.update_for_altitude(1000.0);

        assert_relative_eq!(*s.temperature, 8.5);
        assert_relative_eq!(*s.pressure, 101325.0 * (-1000.0_f64 / 8500.0).exp());
        assert_relative_eq!(*s.humidity, 48.0);
        assert_relative_eq!(s.wind_u, 3.0);
        assert_relative_eq!(s.wind_v, 1.5);
    }

    #[test]
    fn test_fallback_clamps_to_ceiling() {
        let mut model = AtmosphereModel::new(0.0);
        let s = *model.update_for_altitude(35_000.0);
        assert_eq!(s.altitude, ATMOSPHERE_CEILING);
        assert_relative_eq!(*s.temperature, 15.0 - 0.0065 * ATMOSPHERE_CEILING);
        assert_relative_eq!(*s.humidity, 10.0);
    }

    #[test]
    fn test_stateless_queries_follow_profile_above_ceiling() {
        let mut model = AtmosphereModel::new(0.0);
        let windy = |altitude: f64, u: f64| {
            AtmosphereSample::new(
                altitude,
                u,
                0.0,
                Celsius::new(-50.0),
                Pascals::new(5000.0),
                Percent::new(5.0),
            )
        };
        model
            .load_profile(vec![windy(0.0, 0.0), windy(20_000.0, 10.0), windy(30_000.0, 30.0)])
            .unwrap();

        let (u, _) = model.wind_at(25_000.0);
        assert_relative_eq!(u, 20.0);
        assert_eq!(model.sample_at(25_000.0).altitude, 25_000.0);
        // Above the sounding the top level holds
        assert_relative_eq!(model.wind_at(90_000.0).0, 30.0);

        // The cached sample is still capped
        let current = *model.update_for_altitude(25_000.0);
        assert_eq!(current.altitude, ATMOSPHERE_CEILING);
        assert_relative_eq!(current.wind_u, 10.0);
    }

    #[test]
    fn test_fallback_sample_clamped_without_profile() {
        let model = AtmosphereModel::new(0.0);
        let s = model.sample_at(60_000.0);
        assert_eq!(s.altitude, ATMOSPHERE_CEILING);
        assert_eq!(model.sample_at(-100.0), AtmosphereSample::standard(0.0));
    }

    #[test]
    fn test_sea_level_density() {
        let s = AtmosphereSample::standard(0.0);
        assert_relative_eq!(s.air_density(), 1.225, epsilon = 1e-3);
        assert!(AtmosphereSample::standard(10_000.0).air_density() < 0.5);
    }

    #[test]
    fn test_empty_profile_rejected_and_state_kept() {
        let mut model = three_level_model();
        assert_eq!(model.load_profile(Vec::new()), Err(SimError::EmptyProfile));
        assert_eq!(model.profile().len(), 3);
        assert_eq!(*model.sample_at(500.0).temperature, 12.5);
    }

    #[test]
    fn test_profile_sorted_and_near_duplicates_collapse() {
        let mut model = AtmosphereModel::new(0.0);
        model
            .load_profile(vec![
                level(2000.0, 5.0),
                level(0.0, 15.0),
                level(1000.0, 10.0),
                level(1000.0 + 1e-9, -40.0),
            ])
            .unwrap();

        let altitudes: Vec<f64> = model.profile().iter().map(|s| s.altitude).collect();
        assert_eq!(altitudes, vec![0.0, 1000.0, 2000.0]);
        assert_eq!(*model.profile()[1].temperature, 10.0);
    }

    #[test]
    fn test_stateless_queries_leave_cache_alone() {
        let mut model = three_level_model();
        model.update_for_altitude(0.0);
        let before = *model.current();

        let (u, v) = model.wind_at(1500.0);
        assert_relative_eq!(u, 1.5);
        assert_relative_eq!(v, -0.75);
        let _ = model.density_at(1800.0);
        let _ = model.sample_at(200.0);

        assert_eq!(*model.current(), before);
    }

    #[test]
    fn test_turbulence_bounds() {
        let model = AtmosphereModel::new(0.5);
        let mut rng = StdRng::seed_from_u64(7);
        let draws: Vec<f64> = (0..2000)
            .map(|_| model.turbulence_sample_with(&mut rng))
            .collect();

        assert!(draws.iter().all(|d| d.abs() <= 0.5));
        assert!(draws.iter().any(|d| *d > 0.25));
        assert!(draws.iter().any(|d| *d < -0.25));
    }

    #[test]
    fn test_zero_turbulence_is_silent() {
        let mut model = AtmosphereModel::new(0.0);
        assert_eq!(model.turbulence_sample(), 0.0);

        model.set_turbulence(-3.0);
        assert_eq!(model.turbulence(), 0.0);
        assert_eq!(model.gusty_wind(), model.current().wind());
    }

    #[test]
    fn test_wind_components() {
        let (u, v) = wind_components(10.0, 90.0);
        assert_relative_eq!(u, 10.0, epsilon = 1e-12);
        assert_relative_eq!(v, 0.0, epsilon = 1e-12);

        let (u, v) = wind_components(10.0, 0.0);
        assert_relative_eq!(u, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_standard_column() {
        let column = AtmosphereSample::standard_column(21, 500.0);
        assert_eq!(column.len(), 21);
        assert_eq!(column[20].altitude, 10_000.0);
        assert!(column
            .windows(2)
            .all(|w| w[1].pressure < w[0].pressure && w[1].temperature < w[0].temperature));
    }
}
