use crate::{Vec3, VectorExt};

/// A ray in 3D space with origin and unit direction.
///
/// The component-wise reciprocal of the direction is computed once at
/// construction so slab tests against bounding boxes need no divisions.
/// Zero direction components produce infinite reciprocals; the slab test
/// checks those axes against the origin instead.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub inv_direction: Vec3,
}

impl Ray {
    /// Create a new ray. The direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction.normalize();
        Self {
            origin,
            direction,
            inv_direction: direction.recip(),
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the (unit) direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Reflect this incoming ray about `n` at point `pt`.
    pub fn reflect_about(&self, pt: Vec3, n: Vec3) -> Ray {
        Ray::new(pt, (-self.direction).reflect_about(n))
    }

    /// Refract this incoming ray through a surface at `pt` with normal `n`.
    ///
    /// Returns `None` on total internal reflection.
    pub fn refract_through(&self, pt: Vec3, n: Vec3, eta: f32) -> Option<Ray> {
        self.direction
            .refract_through(n, eta)
            .map(|direction| Ray::new(pt, direction))
    }
}
