//! Error type shared by the loaders and the simulation engine.

use thiserror::Error;

/// Failures surfaced when loading data or configuring a simulation.
///
/// Query-time absence (a terrain lookup off the grid, a no-data pixel) is not
/// an error: those paths return NaN or `None` instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// The elevation grid has zero width or height.
    #[error("elevation grid is empty")]
    EmptyGrid,

    /// The elevation buffer does not hold `nx * ny` values.
    #[error("elevation grid holds {actual} values, expected {nx}x{ny}")]
    GridSizeMismatch {
        /// Declared number of columns
        nx: usize,
        /// Declared number of rows
        ny: usize,
        /// Length of the supplied buffer
        actual: usize,
    },

    /// The color grid does not match the loaded elevation grid.
    #[error("color grid holds {actual} pixels, expected {expected}")]
    ColorGridMismatch {
        /// Number of pixels in the elevation grid
        expected: usize,
        /// Number of pixels supplied
        actual: usize,
    },

    /// Colors were supplied before any elevation grid was loaded.
    #[error("terrain has not been loaded")]
    TerrainNotLoaded,

    /// The affine transform cannot be inverted.
    #[error("geographic transform is singular (determinant {determinant:e})")]
    SingularTransform {
        /// Determinant of the 2x2 linear part
        determinant: f64,
    },

    /// An atmosphere profile with no samples was supplied.
    #[error("atmosphere profile is empty")]
    EmptyProfile,

    /// A material index outside the closed material set.
    #[error("no material with index {0}")]
    UnknownMaterial(usize),

    /// A physical or generation parameter is out of its valid domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter
        name: &'static str,
        /// Human-readable description of the violation
        reason: String,
    },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
