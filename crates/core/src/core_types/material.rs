//! Closed set of ejecta materials and their reference properties
//!
//! Each material maps to a fixed reference density through a constant table
//! indexed by the enum discriminant. Gases are included because the vent also
//! releases volatile parcels; they are modelled as (very light) spheres like
//! every other particle.
//!
//! | Material        | Density (kg/m³) |
//! |-----------------|-----------------|
//! | Water vapor     | 0.6             |
//! | CO2             | 1.98            |
//! | SO2             | 2.62            |
//! | `HCl`           | 1.49            |
//! | HF              | 0.98            |
//! | CO              | 1.25            |
//! | Volcanic ash    | 2400            |
//! | Lapilli         | 2600            |
//! | Volcanic bomb   | 2700            |
//! | Volcanic glass  | 2500            |

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference density per material, in declaration order (kg/m³)
const MATERIAL_DENSITY: [f64; Material::COUNT] = [
    0.6, 1.98, 2.62, 1.49, 0.98, 1.25, 2400.0, 2600.0, 2700.0, 2500.0,
];

/// Display name per material, in declaration order
const MATERIAL_NAME: [&str; Material::COUNT] = [
    "H2O",
    "CO2",
    "SO2",
    "HCl",
    "HF",
    "CO",
    "Volcanic Ash",
    "Lapilli",
    "Volcanic Bomb",
    "Volcanic Glass",
];

/// Display color per material (RGB), in declaration order
const MATERIAL_COLOR: [[u8; 3]; Material::COUNT] = [
    [255, 0, 0],
    [0, 255, 0],
    [0, 0, 255],
    [255, 255, 0],
    [255, 0, 255],
    [0, 255, 255],
    [128, 128, 128],
    [139, 69, 19],
    [105, 105, 105],
    [169, 169, 169],
];

/// Ejecta material type
///
/// The discriminant doubles as the index used by hosts that select a material
/// with an integer choice (see [`Material::from_index`]).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Material {
    /// Water vapor (H2O)
    WaterVapor = 0,
    /// Carbon dioxide
    CarbonDioxide = 1,
    /// Sulfur dioxide
    SulfurDioxide = 2,
    /// Hydrogen chloride
    HydrogenChloride = 3,
    /// Hydrogen fluoride
    HydrogenFluoride = 4,
    /// Carbon monoxide
    CarbonMonoxide = 5,
    /// Fine ash (< 2 mm)
    #[default]
    VolcanicAsh = 6,
    /// Lapilli (2-64 mm)
    Lapilli = 7,
    /// Volcanic bombs (> 64 mm)
    VolcanicBomb = 8,
    /// Obsidian / pumice glass fragments
    VolcanicGlass = 9,
}

impl Material {
    /// Number of materials in the closed set
    pub const COUNT: usize = 10;

    /// Every material, in index order
    pub const ALL: [Material; Material::COUNT] = [
        Material::WaterVapor,
        Material::CarbonDioxide,
        Material::SulfurDioxide,
        Material::HydrogenChloride,
        Material::HydrogenFluoride,
        Material::CarbonMonoxide,
        Material::VolcanicAsh,
        Material::Lapilli,
        Material::VolcanicBomb,
        Material::VolcanicGlass,
    ];

    /// Look up a material by its integer index (0-9)
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownMaterial`] for an index outside the set.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(SimError::UnknownMaterial(index))
    }

    /// Integer index of this material
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Reference density in kg/m³ assigned to every particle of this material
    #[inline]
    pub fn reference_density(self) -> f64 {
        MATERIAL_DENSITY[self.index()]
    }

    /// Short display name
    pub fn name(self) -> &'static str {
        MATERIAL_NAME[self.index()]
    }

    /// RGB color used by renderers to tint particles of this material
    pub fn display_color(self) -> [u8; 3] {
        MATERIAL_COLOR[self.index()]
    }

    /// True for the volatile (gas-phase) materials
    pub fn is_gas(self) -> bool {
        self.index() < Material::VolcanicAsh.index()
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (i, material) in Material::ALL.iter().enumerate() {
            assert_eq!(material.index(), i);
            assert_eq!(Material::from_index(i), Ok(*material));
        }
    }

    #[test]
    fn test_unknown_index_rejected() {
        assert_eq!(
            Material::from_index(10),
            Err(SimError::UnknownMaterial(10))
        );
    }

    #[test]
    fn test_reference_densities() {
        assert_eq!(Material::WaterVapor.reference_density(), 0.6);
        assert_eq!(Material::VolcanicAsh.reference_density(), 2400.0);
        assert_eq!(Material::VolcanicBomb.reference_density(), 2700.0);
        assert!(Material::ALL.iter().all(|m| m.reference_density() > 0.0));
    }

    #[test]
    fn test_gas_split() {
        assert!(Material::SulfurDioxide.is_gas());
        assert!(!Material::Lapilli.is_gas());
        assert_eq!(Material::ALL.iter().filter(|m| m.is_gas()).count(), 6);
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(Material::VolcanicGlass.to_string(), "Volcanic Glass");
        assert_eq!(Material::Lapilli.display_color(), [139, 69, 19]);
    }
}
