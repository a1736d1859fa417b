//! Pinhole camera for primary ray generation.

use glint_core::CameraSettings;
use glint_math::{Ray, Vec3};

/// Camera that maps normalized image coordinates to rays.
///
/// The image plane sits at distance `height / (2 tan(half_angle))` from the
/// eye, so one unit on the plane is one pixel.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    direction: Vec3,
    right: Vec3,
    up: Vec3,

    /// Distance from the eye to the image plane
    dist: f32,

    half_width: f32,
    half_height: f32,
}

impl Camera {
    /// Create a camera for an image of `width` x `height` pixels.
    ///
    /// The up vector is re-orthogonalized against the viewing direction.
    pub fn new(settings: &CameraSettings, width: u32, height: u32) -> Self {
        let direction = settings.direction.normalize();
        let right = direction.cross(settings.up).normalize();
        let up = right.cross(direction);

        let height = height as f32;
        let dist = height / (2.0 * settings.half_angle.to_radians().tan());

        Self {
            position: settings.position,
            direction,
            right,
            up,
            dist,
            half_width: width as f32 / 2.0,
            half_height: height / 2.0,
        }
    }

    /// Ray through normalized image coordinates `x, y` in `[-1, 1]`,
    /// x pointing right and y pointing up.
    pub fn ray_through(&self, x: f32, y: f32) -> Ray {
        let on_plane = self.direction * self.dist
            + self.right * (x * self.half_width)
            + self.up * (y * self.half_height);
        Ray::new(self.position, on_plane)
    }
}
