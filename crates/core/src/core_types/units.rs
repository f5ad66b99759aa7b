//! Semantic unit types for type-safe physical quantity handling
//!
//! Newtype wrappers for the atmospheric quantities carried by profile samples,
//! so a temperature cannot be passed where a pressure is expected.
//!
//! # Design Philosophy
//! - All types wrap `f64`: pressures span five orders of magnitude between the
//!   vent and the stratosphere and ejecta densities span four
//! - Implements `Deref<Target = f64>`, total ordering and `Display`
//! - Provides explicit conversion methods between related types
//! - Serde support for serialization
//! - Total ordering via Ord trait (NaN handled as greater than all values)
//!
//! # Usage
//! ```
//! use volcano_sim_core::core_types::units::{Celsius, Kelvin};
//!
//! let temp = Celsius::new(25.0);
//! let kelvin: Kelvin = temp.into();
//! assert!((*kelvin - 298.15).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Implements `Eq`/`Ord` (total order), `Deref<Target = f64>` and the raw
/// `f64` conversions shared by every unit type in this module.
macro_rules! scalar_unit {
    ($name:ident) => {
        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                f64_total_cmp(self.0, other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl From<$name> for f64 {
            fn from(v: $name) -> f64 {
                v.0
            }
        }

        impl $name {
            /// Linear interpolation `self + t * (other - self)`
            #[inline]
            #[must_use]
            pub fn lerp(self, other: Self, t: f64) -> Self {
                $name(self.0 + t * (other.0 - self.0))
            }
        }
    };
}

// ============================================================================
// TEMPERATURE TYPES
// ============================================================================

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Celsius(f64);

scalar_unit!(Celsius);

impl Celsius {
    /// Celsius to Kelvin conversion offset (0°C = 273.15 K)
    const CELSIUS_KELVIN_OFFSET: f64 = 273.15;

    /// Create a new Celsius temperature. Asserts value >= absolute zero (-273.15°C).
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= -Self::CELSIUS_KELVIN_OFFSET,
            "Celsius::new: value is below absolute zero (-273.15°C)"
        );
        Celsius(value)
    }

    /// Convert to Kelvin
    #[inline]
    #[must_use]
    pub fn to_kelvin(self) -> Kelvin {
        Kelvin(self.0 + Self::CELSIUS_KELVIN_OFFSET)
    }
}

impl From<Celsius> for Kelvin {
    fn from(c: Celsius) -> Kelvin {
        c.to_kelvin()
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

/// Absolute temperature in Kelvin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kelvin(f64);

scalar_unit!(Kelvin);

impl fmt::Display for Kelvin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} K", self.0)
    }
}

// ============================================================================
// PRESSURE
// ============================================================================

/// Pressure in Pascals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Pascals(f64);

scalar_unit!(Pascals);

impl Pascals {
    /// Create a new pressure. Asserts value >= 0.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Pascals::new: negative pressure is invalid");
        Pascals(value)
    }
}

impl fmt::Display for Pascals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0} Pa", self.0)
    }
}

// ============================================================================
// RATIOS
// ============================================================================

/// A percentage (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Percent(f64);

scalar_unit!(Percent);

impl Percent {
    /// Create a new percentage
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Percent(value)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celsius_to_kelvin() {
        let k = Celsius::new(15.0).to_kelvin();
        assert!((*k - 288.15).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "below absolute zero")]
    fn test_celsius_rejects_below_absolute_zero() {
        let _ = Celsius::new(-300.0);
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = Celsius::new(15.0);
        let b = Celsius::new(5.0);
        assert_eq!(a.lerp(b, 0.5), Celsius::new(10.0));
        assert_eq!(*Pascals::new(100.0).lerp(Pascals::new(200.0), 0.25), 125.0);
    }

    #[test]
    fn test_total_ordering() {
        let lo = Pascals::new(500.0);
        let hi = Pascals::new(90000.0);
        assert_eq!(lo.max(hi), hi);
        assert!(Percent::new(10.0) < Percent::new(20.0));
    }
}
