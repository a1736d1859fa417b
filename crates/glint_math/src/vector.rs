// Vector utilities for Vec3
//
// Extends glam::Vec3 with the reflection/refraction conventions the shading
// code relies on. glam already covers add/sub/neg/scale/dot/cross/normalize
// and project_onto.

use glam::Vec3;

/// Extension trait for Vec3 with ray tracing helpers.
pub trait VectorExt {
    /// Vector from `self` to `other`.
    fn to(self, other: Vec3) -> Vec3;

    /// Mirror this vector about the normal `n`.
    ///
    /// Both vectors point away from the surface; the result is the unit
    /// vector on the other side of `n` at the same angle.
    fn reflect_about(self, n: Vec3) -> Vec3;

    /// Refract this (incoming) vector through a surface with normal `n`,
    /// where `eta` is the ratio of indices of refraction.
    ///
    /// Returns `None` on total internal reflection.
    fn refract_through(self, n: Vec3, eta: f32) -> Option<Vec3>;
}

impl VectorExt for Vec3 {
    #[inline]
    fn to(self, other: Vec3) -> Vec3 {
        other - self
    }

    #[inline]
    fn reflect_about(self, n: Vec3) -> Vec3 {
        (n * 2.0 * self.dot(n) - self).normalize()
    }

    fn refract_through(self, n: Vec3, eta: f32) -> Option<Vec3> {
        let d = self.normalize();
        let n = n.normalize();
        let c = -n.dot(d);
        let k = 1.0 - eta * eta * (1.0 - c * c);
        if k < 0.0 {
            return None;
        }
        Some((n * (eta * c - k.sqrt()) + d * eta).normalize())
    }
}
