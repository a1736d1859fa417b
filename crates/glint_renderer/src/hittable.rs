//! Hittable trait and intersection records.

use std::cmp::Ordering;

use glint_core::Material;
use glint_math::{Aabb, Ray, Vec3};

use crate::Surface;

/// Whether a ray passes into or out of a volume at a hit point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Incidence {
    /// The ray arrives from outside (direction opposes the normal).
    Entering,
    /// The ray leaves the interior (direction agrees with the normal).
    Exiting,
}

/// Record of a ray-surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance along the ray; always positive
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Outward-facing unit surface normal at `point`
    pub normal: Vec3,
    pub incidence: Incidence,
}

impl Hit {
    /// Orders hits by distance along the ray.
    pub fn cmp_distance(&self, other: &Hit) -> Ordering {
        self.t.total_cmp(&other.t)
    }

    /// The normal as a ray leaving the hit point.
    pub fn normal_ray(&self) -> Ray {
        Ray::new(self.point, self.normal)
    }
}

/// A hit together with the surface it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    pub hit: Hit,
    pub surface: &'a Surface,
}

impl<'a> Intersection<'a> {
    /// Material of the surface that was hit.
    pub fn material(&self) -> &'a Material {
        self.surface.material()
    }
}

/// Capability interface shared by every primitive.
pub trait Hittable: Send + Sync {
    /// Nearest intersection no further than `max_dist` along `ray`.
    ///
    /// Degenerate configurations (parallel rays, zero determinants) are
    /// misses, never errors.
    fn intersect(&self, ray: &Ray, max_dist: f32) -> Option<Hit>;

    /// Outward unit normal at a point on the surface.
    fn normal_at(&self, point: Vec3) -> Vec3;

    /// Axis-aligned bounding box of the surface.
    fn bounding_box(&self) -> Aabb;

    /// Representative position, used to partition surfaces in the BVH.
    fn position(&self) -> Vec3;

    fn material(&self) -> &Material;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit_at(t: f32) -> Hit {
        Hit {
            t,
            point: Vec3::new(0.0, 0.0, -t),
            normal: Vec3::Z,
            incidence: Incidence::Entering,
        }
    }

    #[test]
    fn test_hits_order_by_distance() {
        let mut hits = vec![hit_at(3.0), hit_at(0.5), hit_at(2.0)];
        hits.sort_by(Hit::cmp_distance);

        let ts: Vec<f32> = hits.iter().map(|h| h.t).collect();
        assert_eq!(ts, vec![0.5, 2.0, 3.0]);

        let nearest = [hit_at(4.0), hit_at(1.0)]
            .into_iter()
            .min_by(Hit::cmp_distance)
            .unwrap();
        assert_eq!(nearest.t, 1.0);
    }

    #[test]
    fn test_normal_ray() {
        let ray = hit_at(2.0).normal_ray();
        assert_eq!(ray.origin(), Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(ray.direction(), Vec3::Z);
    }
}
