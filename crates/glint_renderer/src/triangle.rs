//! Triangle primitives for ray tracing.
//!
//! Intersection is a two-step test: hit the supporting plane, then check
//! the barycentric coordinates of the hit point.

use glint_core::Material;
use glint_math::{Aabb, Ray, Vec3};

use crate::hittable::{Hit, Hittable, Incidence};
use crate::plane::plane_distance;

/// A flat-shaded triangle.
#[derive(Debug, Clone)]
pub struct Triangle {
    vertices: [Vec3; 3],
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    material: Material,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// The face normal is `(v2 - v0) x (v1 - v0)`, so vertices listed
    /// clockwise when seen from the front face the viewer.
    pub fn new(vertices: [Vec3; 3], material: Material) -> Self {
        let [v0, v1, v2] = vertices;
        let normal = (v2 - v0).cross(v1 - v0).normalize();

        // Pad thin dimensions to avoid degenerate AABBs
        let delta = Vec3::splat(0.0001);
        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);
        let bbox = Aabb::new(min - delta, max + delta);

        Self {
            vertices,
            normal,
            material,
            bbox,
        }
    }

    pub fn vertices(&self) -> &[Vec3; 3] {
        &self.vertices
    }

    /// Barycentric weights of `point` (assumed on the supporting plane),
    /// each the ratio of the opposite sub-triangle's area to the whole.
    ///
    /// Returns `None` for degenerate triangles.
    fn barycentric(&self, point: Vec3) -> Option<Vec3> {
        let [v0, v1, v2] = self.vertices;
        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let w = point - v0;

        let n = e1.cross(e2);
        let area2 = n.length_squared();
        if area2 == 0.0 {
            return None;
        }

        let b1 = w.cross(e2).dot(n) / area2;
        let b2 = e1.cross(w).dot(n) / area2;
        Some(Vec3::new(1.0 - b1 - b2, b1, b2))
    }

    /// Hit distance and barycentric weights of the hit point.
    fn intersect_weights(&self, ray: &Ray, max_dist: f32) -> Option<(f32, Vec3, Vec3)> {
        let t = plane_distance(self.vertices[0], self.normal, ray, max_dist)?;
        let point = ray.at(t);

        let weights = self.barycentric(point)?;
        if weights.y < 0.0 || weights.z < 0.0 || weights.y + weights.z > 1.0 {
            return None;
        }

        Some((t, point, weights))
    }
}

impl Hittable for Triangle {
    fn intersect(&self, ray: &Ray, max_dist: f32) -> Option<Hit> {
        let (t, point, _) = self.intersect_weights(ray, max_dist)?;

        Some(Hit {
            t,
            point,
            normal: self.normal,
            incidence: Incidence::Entering,
        })
    }

    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn position(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices;
        (v0 + v1 + v2) / 3.0
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

/// A triangle with per-vertex normals, shaded with the barycentric
/// interpolation of those normals.
#[derive(Debug, Clone)]
pub struct NormalTriangle {
    triangle: Triangle,
    normals: [Vec3; 3],
}

impl NormalTriangle {
    /// Create a new smooth triangle. Vertex normals are normalized.
    pub fn new(vertices: [Vec3; 3], normals: [Vec3; 3], material: Material) -> Self {
        Self {
            triangle: Triangle::new(vertices, material),
            normals: normals.map(Vec3::normalize),
        }
    }

    fn interpolate(&self, weights: Vec3) -> Vec3 {
        let [n0, n1, n2] = self.normals;
        (n0 * weights.x + n1 * weights.y + n2 * weights.z).normalize()
    }
}

impl Hittable for NormalTriangle {
    fn intersect(&self, ray: &Ray, max_dist: f32) -> Option<Hit> {
        let (t, point, weights) = self.triangle.intersect_weights(ray, max_dist)?;

        Some(Hit {
            t,
            point,
            normal: self.interpolate(weights),
            incidence: Incidence::Entering,
        })
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        match self.triangle.barycentric(point) {
            Some(weights) => self.interpolate(weights),
            None => self.triangle.normal,
        }
    }

    fn bounding_box(&self) -> Aabb {
        self.triangle.bbox
    }

    fn position(&self) -> Vec3 {
        self.triangle.position()
    }

    fn material(&self) -> &Material {
        &self.triangle.material
    }
}
