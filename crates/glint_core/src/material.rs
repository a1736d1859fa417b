//! Phong-style surface materials.

use crate::Color;

/// How a surface responds to light.
///
/// Every coefficient is a color so each channel can be tinted separately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Response to the scene's ambient light
    pub ambient: Color,

    /// Lambertian response to direct light
    pub diffuse: Color,

    /// Phong highlight strength; also weights mirror reflection
    pub specular: Color,

    /// Weight of light refracted through the surface
    pub transmissive: Color,

    /// Phong exponent (larger = tighter highlight)
    pub phong_exponent: f32,

    /// Index of refraction (1.0 = vacuum, 1.5 = glass)
    pub ior: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Color::BLACK,
            diffuse: Color::WHITE,
            specular: Color::BLACK,
            transmissive: Color::BLACK,
            phong_exponent: 5.0,
            ior: 1.0,
        }
    }
}

impl Material {
    /// A purely diffuse material of the given color.
    pub fn diffuse(color: Color) -> Self {
        Self {
            diffuse: color,
            ..Default::default()
        }
    }

    /// A perfect mirror: no diffuse response, full specular reflection.
    pub fn mirror() -> Self {
        Self {
            diffuse: Color::BLACK,
            specular: Color::WHITE,
            ..Default::default()
        }
    }

    /// True if any light is transmitted through the surface.
    pub fn is_transmissive(&self) -> bool {
        !self.transmissive.is_black()
    }
}
