//! Volcanic Ejecta Simulation Core Library
//!
//! Ballistic transport of volcanic ejecta from a vent, through a layered
//! atmosphere, down onto a georeferenced terrain surface.
//!
//! ## Components
//!
//! - Particles as uniform-density spheres tagged with a material
//! - Gravity, buoyancy and Reynolds-regime (Stokes / Newton) drag
//! - Altitude-indexed atmosphere profile with turbulence injection
//! - DEM elevation lookup with bilinear interpolation and no-data handling
//! - Parallel semi-implicit Euler integration with ground / ceiling partition

// Core types and utilities
pub mod core_types;
pub mod error;

// Simulation modules (organized in subfolders)
pub mod grid;
pub mod physics;
pub mod simulation;
pub mod weather;

// Re-export core types
pub use core_types::{Material, Particle, Vec3};
pub use error::{Result, SimError};

// Re-export simulation types
pub use grid::{
    ColorGrid, ElevationGrid, FlatGround, GeoExtent, GeoTransform, GroundSurface, Rgb,
    TerrainSampler,
};
pub use simulation::{
    classify, reclassify_outside_extent, AmbientFallback, EjectaCloud, EruptionConfig,
    ParticleFate, PopulationSummary, StepReport, VentConfig, ESCAPE_CEILING,
};
pub use weather::{AtmosphereModel, AtmosphereSample};
