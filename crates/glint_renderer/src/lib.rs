//! Glint Renderer - CPU Whitted ray tracing
//!
//! Recursive ray tracer with Phong shading, hard shadows, mirror
//! reflection and refraction over analytic primitives, accelerated by a
//! BVH and rendered with adaptive per-pixel sampling on a worker pool.
//!
//! # Example
//!
//! ```ignore
//! use glint_renderer::{RenderConfig, Renderer, Scene};
//!
//! let desc = glint_core::load_sdl("scene.txt")?;
//! let scene = Scene::from_description(&desc);
//! let image = Renderer::new(&scene, RenderConfig::default())?.render()?;
//! ```

mod bvh;
mod camera;
mod hittable;
mod plane;
mod renderer;
mod scene;
mod shading;
mod sphere;
mod surface;
mod triangle;

pub use bvh::{Bvh, BvhNode, DEFAULT_LEAF_SIZE};
pub use camera::Camera;
pub use hittable::{Hit, Hittable, Incidence, Intersection};
pub use plane::Plane;
pub use renderer::{Framebuffer, Progress, RenderConfig, RenderError, Renderer, Rgba8};
pub use scene::{Scene, SurfaceId};
pub use shading::{Tracer, DEFAULT_MAX_DEPTH};
pub use sphere::Sphere;
pub use surface::Surface;
pub use triangle::{NormalTriangle, Triangle};

/// Re-export common math types from glint_math
pub use glint_math::{Aabb, Ray, Vec3};
