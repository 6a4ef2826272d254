//! # keeper_math - 2D Navigation Math
//!
//! Vector and orientation primitives shared by the steering core and the
//! simulation harness. Everything lives on the ground plane, so only 2D
//! types are provided.

pub mod angle;
pub mod vector;

pub use angle::*;
pub use vector::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
    pub const FRAC_PI_2: f32 = PI / 2.0;
    pub const EPSILON: f32 = 1e-6;
}

/// Clamp value between min and max
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min { min }
    else if value > max { max }
    else { value }
}
