//! Force model and closed-form ballistic estimates

pub mod ballistics;
pub mod forces;

pub use ballistics::{flight_time, max_range, terminal_velocity};
pub use forces::{
    buoyancy_force, drag_force, drag_magnitude, gravity_force, quadratic_drag_magnitude,
    reynolds_number, stokes_drag_magnitude, DragRegime, AIR_VISCOSITY, GRAVITY,
    MIN_RELATIVE_SPEED, SPHERE_DRAG_COEFFICIENT, STOKES_REYNOLDS_LIMIT,
};
