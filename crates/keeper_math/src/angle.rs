//! Orientation helpers
//!
//! Orientations are radians measured counter-clockwise from the +X axis.

use crate::consts::{PI, TAU};
use crate::vector::Vec2;

/// Wrap an angle into `(-PI, PI]`
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}

/// Orientation pointing along `v`
#[inline]
pub fn vector_to_angle(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Unit vector for an orientation
#[inline]
pub fn angle_to_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
