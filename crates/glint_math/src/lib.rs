//! Glint math kernel.
//!
//! Re-exports `glam` and layers the ray tracing specific pieces on top:
//! the [`VectorExt`] trait, [`Ray`] with a cached reciprocal direction,
//! and the axis-aligned [`Aabb`].

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod ray;
mod vector;

pub use aabb::Aabb;
pub use ray::Ray;
pub use vector::VectorExt;

/// Tolerance for floating point comparisons against zero.
pub const EPSILON: f32 = 0.001;

/// Is `x` approximately equal to `c`?
#[inline]
pub fn is_approx(x: f32, c: f32) -> bool {
    (x - c).abs() < EPSILON
}

/// Is `x` approximately zero?
#[inline]
pub fn is_zero(x: f32) -> bool {
    is_approx(x, 0.0)
}
