//! Sphere primitive for ray tracing.

use glint_core::Material;
use glint_math::{is_zero, Aabb, Ray, Vec3, VectorExt};

use crate::hittable::{Hit, Hittable, Incidence};

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Material,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        let rvec = Vec3::splat(radius.abs());
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }
}

impl Hittable for Sphere {
    fn intersect(&self, ray: &Ray, max_dist: f32) -> Option<Hit> {
        let oc = ray.origin().to(self.center);

        // Projection of the center onto the ray
        let base = ray.direction().dot(oc);
        if base < 0.0 {
            return None;
        }

        let discriminant = base * base - oc.length_squared() + self.radius * self.radius;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // Nearest root, unless it is the surface the ray is leaving
        let near = base - sqrtd;
        let t = if near > 0.0 && !is_zero(near) {
            near
        } else {
            base + sqrtd
        };
        if is_zero(t) || t > max_dist {
            return None;
        }

        let point = ray.at(t);
        let normal = self.normal_at(point);
        let incidence = if ray.direction().dot(normal) < 0.0 {
            Incidence::Entering
        } else {
            Incidence::Exiting
        };

        Some(Hit {
            t,
            point,
            normal,
            incidence,
        })
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        self.center.to(point).normalize()
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn position(&self) -> Vec3 {
        self.center
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere() -> Sphere {
        Sphere::new(Vec3::ZERO, 1.0, Material::default())
    }

    #[test]
    fn test_sphere_hit_through_center() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 0.5, Material::default());
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);

        let hit = sphere.intersect(&ray, f32::INFINITY).unwrap();

        // center distance minus radius
        assert!((hit.t - 4.5).abs() < 1e-5);
        assert_eq!(hit.incidence, Incidence::Entering);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_hit_from_random_directions() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        let sphere = Sphere::new(Vec3::new(1.0, -2.0, 0.5), 1.5, Material::default());

        for _ in 0..100 {
            let dir = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if dir.length() < 0.1 {
                continue;
            }
            let dist: f32 = rng.gen_range(3.0..20.0);
            let origin = sphere.center() - dir.normalize() * dist;

            let hit = sphere.intersect(&Ray::new(origin, dir), f32::INFINITY).unwrap();
            assert!((hit.t - (dist - 1.5)).abs() < 1e-3);
            assert_eq!(hit.incidence, Incidence::Entering);
        }
    }

    #[test]
    fn test_sphere_exit_from_inside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let hit = unit_sphere().intersect(&ray, f32::INFINITY).unwrap();

        assert!((hit.t - 1.0).abs() < 1e-6);
        assert_eq!(hit.incidence, Incidence::Exiting);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = unit_sphere();

        // Passes beside the sphere
        let ray = Ray::new(Vec3::new(0.0, 2.0, 5.0), -Vec3::Z);
        assert!(sphere.intersect(&ray, f32::INFINITY).is_none());

        // Sphere behind the origin
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(sphere.intersect(&ray, f32::INFINITY).is_none());

        // Sphere beyond max_dist
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        assert!(sphere.intersect(&ray, 3.0).is_none());
        assert!(sphere.intersect(&ray, 4.5).is_some());
    }

    #[test]
    fn test_sphere_no_self_intersection() {
        let sphere = unit_sphere();

        // Leaving the surface outward
        let ray = Ray::new(Vec3::Z, Vec3::Z);
        assert!(sphere.intersect(&ray, f32::INFINITY).is_none());

        // Leaving the surface inward: the far side, not the start point
        let ray = Ray::new(Vec3::Z, -Vec3::Z);
        let hit = sphere.intersect(&ray, f32::INFINITY).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-5);
        assert_eq!(hit.incidence, Incidence::Exiting);
    }

    #[test]
    fn test_sphere_bounding_box() {
        let sphere = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 0.5, Material::default());
        let bbox = sphere.bounding_box();

        assert_eq!(bbox.min, Vec3::new(0.5, 1.5, 2.5));
        assert_eq!(bbox.max, Vec3::new(1.5, 2.5, 3.5));
        assert_eq!(sphere.position(), Vec3::new(1.0, 2.0, 3.0));
    }
}
