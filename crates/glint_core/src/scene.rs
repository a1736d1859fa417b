//! Scene description types for Glint.
//!
//! This module defines the renderer-agnostic scene representation produced
//! by the SDL loader. The renderer turns it into intersectable surfaces.

use glint_math::Vec3;

use crate::{Color, Light, Material};

/// Pinhole camera placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Eye position
    pub position: Vec3,

    /// Viewing direction
    pub direction: Vec3,

    /// Up vector
    pub up: Vec3,

    /// Vertical half-angle of the field of view, in degrees
    pub half_angle: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::Z,
            up: Vec3::Y,
            half_angle: 45.0,
        }
    }
}

/// Geometry of a single surface together with its material.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere {
        center: Vec3,
        radius: f32,
        material: Material,
    },
    Plane {
        point: Vec3,
        normal: Vec3,
        material: Material,
    },
    Triangle {
        vertices: [Vec3; 3],
        material: Material,
    },
    /// Triangle with per-vertex normals for smooth shading.
    NormalTriangle {
        vertices: [Vec3; 3],
        normals: [Vec3; 3],
        material: Material,
    },
}

/// Everything needed to render a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    /// Output image width in pixels
    pub width: u32,

    /// Output image height in pixels
    pub height: u32,

    pub camera: CameraSettings,

    /// Color returned by rays that escape the scene
    pub background: Color,

    /// Ambient light applied to every surface
    pub ambient: Color,

    pub shapes: Vec<Shape>,

    pub lights: Vec<Light>,

    /// Recursion depth override requested by the scene file
    pub max_depth: Option<u32>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            camera: CameraSettings::default(),
            background: Color::BLACK,
            ambient: Color::BLACK,
            shapes: Vec::new(),
            lights: Vec::new(),
            max_depth: None,
        }
    }
}

impl SceneDescription {
    /// Number of pixels in the output image.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
