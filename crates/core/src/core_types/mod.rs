//! Core types and utilities

pub mod material;
pub mod particle;
pub mod units;
pub mod vec3;

pub use material::Material;
pub use particle::Particle;
pub use units::*;
pub use vec3::Vec3;
