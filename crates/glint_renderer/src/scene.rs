//! Renderable scene: an arena of surfaces plus lights and camera.

use glint_core::{CameraSettings, Color, Light, SceneDescription};

use crate::{Camera, Surface};

/// Index of a surface in its [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

impl SurfaceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Scene owning every surface for the duration of a render.
///
/// Built once, then shared read-only across render workers. The BVH refers
/// to surfaces by [`SurfaceId`].
#[derive(Debug, Clone)]
pub struct Scene {
    surfaces: Vec<Surface>,
    lights: Vec<Light>,
    pub camera: CameraSettings,
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub ambient: Color,
}

impl Scene {
    /// Create an empty scene rendered at `width` x `height`.
    pub fn new(width: u32, height: u32, camera: CameraSettings) -> Self {
        Self {
            surfaces: Vec::new(),
            lights: Vec::new(),
            camera,
            width,
            height,
            background: Color::BLACK,
            ambient: Color::BLACK,
        }
    }

    /// Build a scene from a loaded description.
    pub fn from_description(desc: &SceneDescription) -> Self {
        let mut scene = Self::new(desc.width, desc.height, desc.camera);
        scene.background = desc.background;
        scene.ambient = desc.ambient;

        for shape in &desc.shapes {
            scene.add_surface(Surface::from(shape));
        }
        for light in &desc.lights {
            scene.add_light(*light);
        }

        log::debug!(
            "Scene built: {} surfaces, {} lights",
            scene.surfaces.len(),
            scene.lights.len()
        );
        scene
    }

    /// Add a surface, returning its handle.
    pub fn add_surface(&mut self, surface: impl Into<Surface>) -> SurfaceId {
        let id = SurfaceId(self.surfaces.len() as u32);
        self.surfaces.push(surface.into());
        id
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    #[inline]
    pub fn surface(&self, id: SurfaceId) -> &Surface {
        &self.surfaces[id.index()]
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// Handles of every surface, in insertion order.
    pub fn surface_ids(&self) -> impl Iterator<Item = SurfaceId> {
        (0..self.surfaces.len() as u32).map(SurfaceId)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Camera for this scene's resolution.
    pub fn camera(&self) -> Camera {
        Camera::new(&self.camera, self.width, self.height)
    }

    /// Number of pixels in the output image.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
