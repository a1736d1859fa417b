//! Infinite plane primitive.

use glint_core::Material;
use glint_math::{is_zero, Aabb, Ray, Vec3, EPSILON};

use crate::hittable::{Hit, Hittable, Incidence};

/// An infinite plane through `point` with unit `normal`.
#[derive(Debug, Clone)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    material: Material,
}

impl Plane {
    /// Create a new plane. The normal is normalized.
    pub fn new(point: Vec3, normal: Vec3, material: Material) -> Self {
        Self {
            point,
            normal: normal.normalize(),
            material,
        }
    }
}

/// Ray-plane distance, or `None` for parallel rays and hits outside
/// `[EPSILON, max_dist]`.
pub(crate) fn plane_distance(point: Vec3, normal: Vec3, ray: &Ray, max_dist: f32) -> Option<f32> {
    let denom = ray.direction().dot(normal);
    if is_zero(denom) {
        return None;
    }

    let t = (point - ray.origin()).dot(normal) / denom;
    (EPSILON..=max_dist).contains(&t).then_some(t)
}

impl Hittable for Plane {
    fn intersect(&self, ray: &Ray, max_dist: f32) -> Option<Hit> {
        let t = plane_distance(self.point, self.normal, ray, max_dist)?;

        Some(Hit {
            t,
            point: ray.at(t),
            normal: self.normal,
            incidence: Incidence::Entering,
        })
    }

    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    /// Unbounded, except along the normal when the plane is axis-aligned.
    fn bounding_box(&self) -> Aabb {
        let n = self.normal;
        let mut bbox = Aabb::UNIVERSE;

        for axis in 0..3 {
            let others = [(axis + 1) % 3, (axis + 2) % 3];
            if others.iter().all(|&i| n[i] == 0.0) {
                bbox.min[axis] = self.point[axis];
                bbox.max[axis] = self.point[axis];
            }
        }

        bbox
    }

    fn position(&self) -> Vec3 {
        self.point
    }

    fn material(&self) -> &Material {
        &self.material
    }
}
