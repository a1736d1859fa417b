//! The closed set of renderable surfaces.

use glint_core::{Material, Shape};
use glint_math::{Aabb, Ray, Vec3};

use crate::hittable::{Hit, Hittable};
use crate::{NormalTriangle, Plane, Sphere, Triangle};

/// Any primitive the renderer can intersect.
#[derive(Debug, Clone)]
pub enum Surface {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
    NormalTriangle(NormalTriangle),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Surface::Sphere($s) => $body,
            Surface::Plane($s) => $body,
            Surface::Triangle($s) => $body,
            Surface::NormalTriangle($s) => $body,
        }
    };
}

impl Hittable for Surface {
    #[inline]
    fn intersect(&self, ray: &Ray, max_dist: f32) -> Option<Hit> {
        dispatch!(self, s => s.intersect(ray, max_dist))
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        dispatch!(self, s => s.normal_at(point))
    }

    fn bounding_box(&self) -> Aabb {
        dispatch!(self, s => s.bounding_box())
    }

    fn position(&self) -> Vec3 {
        dispatch!(self, s => s.position())
    }

    fn material(&self) -> &Material {
        dispatch!(self, s => s.material())
    }
}

impl From<&Shape> for Surface {
    fn from(shape: &Shape) -> Self {
        match *shape {
            Shape::Sphere {
                center,
                radius,
                material,
            } => Surface::Sphere(Sphere::new(center, radius, material)),
            Shape::Plane {
                point,
                normal,
                material,
            } => Surface::Plane(Plane::new(point, normal, material)),
            Shape::Triangle { vertices, material } => {
                Surface::Triangle(Triangle::new(vertices, material))
            }
            Shape::NormalTriangle {
                vertices,
                normals,
                material,
            } => Surface::NormalTriangle(NormalTriangle::new(vertices, normals, material)),
        }
    }
}

impl From<Sphere> for Surface {
    fn from(s: Sphere) -> Self {
        Surface::Sphere(s)
    }
}

impl From<Plane> for Surface {
    fn from(p: Plane) -> Self {
        Surface::Plane(p)
    }
}

impl From<Triangle> for Surface {
    fn from(t: Triangle) -> Self {
        Surface::Triangle(t)
    }
}

impl From<NormalTriangle> for Surface {
    fn from(t: NormalTriangle) -> Self {
        Surface::NormalTriangle(t)
    }
}
