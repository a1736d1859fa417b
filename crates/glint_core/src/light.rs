//! Light sources.
//!
//! The shading engine only ever asks a light three things: which way it is
//! from a point, how far away it is, and how bright it is there.

use glint_math::{Vec3, VectorExt};

use crate::Color;

/// A light source in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Omnidirectional light with inverse-square falloff.
    Point { position: Vec3, intensity: Color },

    /// Point light restricted to a cone around `direction`.
    ///
    /// Full intensity inside `inner_angle`, none outside `outer_angle`
    /// (both in degrees from the axis), linear ramp between.
    Spot {
        position: Vec3,
        direction: Vec3,
        inner_angle: f32,
        outer_angle: f32,
        intensity: Color,
    },

    /// Infinitely distant light. `to_light` points from the scene toward
    /// the light, i.e. against the direction the light travels.
    Directional { to_light: Vec3, intensity: Color },
}

impl Light {
    /// Create a point light.
    pub fn point(position: Vec3, intensity: Color) -> Self {
        Light::Point {
            position,
            intensity,
        }
    }

    /// Create a spot light.
    ///
    /// # Panics
    ///
    /// Panics unless `0 < inner_angle < outer_angle < 360`.
    pub fn spot(
        position: Vec3,
        direction: Vec3,
        inner_angle: f32,
        outer_angle: f32,
        intensity: Color,
    ) -> Self {
        assert!(
            inner_angle > 0.0 && outer_angle > inner_angle && outer_angle < 360.0,
            "invalid spot light cone: inner {inner_angle}, outer {outer_angle}"
        );
        Light::Spot {
            position,
            direction: direction.normalize(),
            inner_angle,
            outer_angle,
            intensity,
        }
    }

    /// Create a directional light shining along `direction`.
    pub fn directional(direction: Vec3, intensity: Color) -> Self {
        Light::Directional {
            to_light: -direction.normalize(),
            intensity,
        }
    }

    /// Vector from `pt` toward the light (not normalized for positional
    /// lights).
    pub fn vector_from(&self, pt: Vec3) -> Vec3 {
        match *self {
            Light::Point { position, .. } | Light::Spot { position, .. } => pt.to(position),
            Light::Directional { to_light, .. } => to_light,
        }
    }

    /// Distance from `pt` to the light; infinite for directional lights.
    pub fn distance(&self, pt: Vec3) -> f32 {
        match *self {
            Light::Point { position, .. } | Light::Spot { position, .. } => {
                pt.distance(position)
            }
            Light::Directional { .. } => f32::INFINITY,
        }
    }

    /// Light arriving at `pt`.
    pub fn intensity_at(&self, pt: Vec3) -> Color {
        match *self {
            Light::Point { intensity, .. } => inverse_square(intensity, self.distance(pt)),
            Light::Spot {
                position,
                direction,
                inner_angle,
                outer_angle,
                intensity,
            } => {
                let base = inverse_square(intensity, self.distance(pt));
                let cos = position.to(pt).normalize().dot(direction).clamp(-1.0, 1.0);
                let angle = cos.acos().to_degrees();
                if angle <= inner_angle {
                    base
                } else if angle >= outer_angle {
                    Color::BLACK
                } else {
                    base * ((outer_angle - angle) / (outer_angle - inner_angle))
                }
            }
            Light::Directional { intensity, .. } => intensity,
        }
    }
}

#[inline]
fn inverse_square(intensity: Color, dist: f32) -> Color {
    intensity * (1.0 / (dist * dist))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_light_falloff() {
        let light = Light::point(Vec3::new(0.0, 5.0, 0.0), Color::WHITE);

        assert_eq!(light.distance(Vec3::ZERO), 5.0);
        assert_eq!(light.vector_from(Vec3::ZERO), Vec3::new(0.0, 5.0, 0.0));

        let i = light.intensity_at(Vec3::new(0.0, 3.0, 0.0));
        assert!((i.r - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_directional_light() {
        let light = Light::directional(Vec3::new(0.0, -2.0, 0.0), Color::rgb(0.5, 0.5, 0.5));

        assert_eq!(light.vector_from(Vec3::new(9.0, 1.0, -3.0)), Vec3::Y);
        assert!(light.distance(Vec3::ZERO).is_infinite());
        assert_eq!(light.intensity_at(Vec3::splat(100.0)), Color::rgb(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_spot_light_cone() {
        let light = Light::spot(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y, 20.0, 40.0, Color::WHITE);

        // On axis: full inverse-square intensity
        let on_axis = light.intensity_at(Vec3::ZERO);
        assert!((on_axis.r - 1.0).abs() < 1e-5);

        // 45 degrees off axis: outside the outer cone
        let outside = light.intensity_at(Vec3::new(1.0, 0.0, 0.0));
        assert!(outside.is_black());

        // 30 degrees: halfway through the ramp
        let p = Vec3::new(30f32.to_radians().tan(), 0.0, 0.0);
        let ramp = light.intensity_at(p);
        let full = 1.0 / p.distance_squared(Vec3::new(0.0, 1.0, 0.0));
        assert!((ramp.r - 0.5 * full).abs() < 1e-3);
    }

    #[test]
    #[should_panic]
    fn test_spot_light_invalid_cone_panics() {
        Light::spot(Vec3::ZERO, Vec3::Y, 40.0, 20.0, Color::WHITE);
    }
}
