//! Whitted-style recursive shading.
//!
//! Direct Phong lighting with hard shadows at every hit the ray enters,
//! plus recursive mirror reflection and refraction.

use std::cell::Cell;

use glint_core::{Color, Material};
use glint_math::{Ray, Vec3, VectorExt};

use crate::hittable::{Hit, Incidence};
use crate::{Bvh, Scene};

/// Default recursion cap.
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Computes the color seen along rays through a scene.
///
/// One tracer per worker thread; the scene and BVH are shared.
pub struct Tracer<'s> {
    scene: &'s Scene,
    bvh: &'s Bvh,
    /// Camera position, the viewpoint for specular highlights
    eye: Vec3,
    max_depth: u32,
    rays: Cell<u64>,
}

impl<'s> Tracer<'s> {
    pub fn new(scene: &'s Scene, bvh: &'s Bvh, max_depth: u32) -> Self {
        Self {
            scene,
            bvh,
            eye: scene.camera.position,
            max_depth,
            rays: Cell::new(0),
        }
    }

    /// Number of `color_along_ray` evaluations so far, primary and
    /// secondary. Shadow rays are not counted.
    pub fn rays_traced(&self) -> u64 {
        self.rays.get()
    }

    /// Color seen along `ray`, `depth` bounces away from the camera.
    ///
    /// Past the maximum depth this is the background color, so the
    /// recursion always terminates.
    pub fn color_along_ray(&self, ray: &Ray, depth: u32) -> Color {
        self.rays.set(self.rays.get() + 1);

        if depth > self.max_depth {
            return self.scene.background;
        }

        let Some(found) = self.bvh.intersect(self.scene, ray, f32::INFINITY) else {
            return self.scene.background;
        };
        let hit = found.hit;
        let material = found.material();

        match hit.incidence {
            Incidence::Entering => self.shade(ray, &hit, material, depth),
            Incidence::Exiting => {
                // Leaving the volume: bend out through the surface, or
                // bounce back inside on total internal reflection
                let inward = -hit.normal;
                let next = ray
                    .refract_through(hit.point, inward, material.ior)
                    .unwrap_or_else(|| ray.reflect_about(hit.point, inward));
                self.color_along_ray(&next, depth + 1)
            }
        }
    }

    fn shade(&self, ray: &Ray, hit: &Hit, material: &Material, depth: u32) -> Color {
        let mut color = material.ambient * self.scene.ambient;
        color += self.direct_light(hit, material);

        if !material.specular.is_black() {
            let reflected = ray.reflect_about(hit.point, hit.normal);
            color += material.specular * self.color_along_ray(&reflected, depth + 1);
        }

        if material.is_transmissive() {
            if let Some(refracted) = ray.refract_through(hit.point, hit.normal, 1.0 / material.ior)
            {
                color += material.transmissive * self.color_along_ray(&refracted, depth + 1);
            }
        }

        color
    }

    /// Diffuse and Phong specular light from every light that can see the
    /// hit point.
    fn direct_light(&self, hit: &Hit, material: &Material) -> Color {
        let to_eye = hit.point.to(self.eye).normalize_or_zero();
        let mut color = Color::new(0.0, 0.0, 0.0, 0.0);

        for light in self.scene.lights() {
            let to_light = light.vector_from(hit.point).normalize();
            let shadow = Ray::new(hit.point, to_light);
            if self.bvh.occluded(self.scene, &shadow, light.distance(hit.point)) {
                continue;
            }

            let intensity = light.intensity_at(hit.point);
            let lambert = to_light.dot(hit.normal).max(0.0);
            let phong = to_eye
                .dot(to_light.reflect_about(hit.normal))
                .max(0.0)
                .powf(material.phong_exponent);

            color += material.diffuse * intensity * lambert;
            color += material.specular * intensity * phong;
        }

        color
    }
}
