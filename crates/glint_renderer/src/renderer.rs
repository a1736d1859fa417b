//! Concurrent adaptive renderer.
//!
//! Pixels are dealt out round-robin: worker `w` of `n` owns every pixel `i`
//! with `i % n == w`. Workers never touch each other's pixels, so the only
//! shared mutable state is the [`Progress`] counter.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use bytemuck::{Pod, Zeroable};
use glint_core::Color;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bvh::DEFAULT_LEAF_SIZE;
use crate::shading::DEFAULT_MAX_DEPTH;
use crate::{Bvh, Camera, Scene, Tracer};

/// Errors raised before or while starting a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to start render workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to read render configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Worker threads; 0 lets rayon decide
    pub threads: usize,
    /// Maximum recursion depth for reflection and refraction
    pub max_depth: u32,
    /// Samples always taken per pixel
    pub min_samples: u32,
    /// Hard cap on samples per pixel
    pub max_samples: u32,
    /// Stop sampling once luminance range / sample count drops below this
    pub convergence_threshold: f32,
    /// Maximum surfaces per BVH leaf
    pub bvh_leaf_size: usize,
    /// Seed for reproducible jitter; entropy when absent
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            min_samples: 8,
            max_samples: 256,
            convergence_threshold: 0.01,
            bvh_leaf_size: DEFAULT_LEAF_SIZE,
            seed: None,
        }
    }
}

impl RenderConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.min_samples == 0 {
            return Err(RenderError::InvalidConfig(
                "min_samples must be at least 1".into(),
            ));
        }
        if self.max_samples < self.min_samples {
            return Err(RenderError::InvalidConfig(format!(
                "max_samples ({}) is below min_samples ({})",
                self.max_samples, self.min_samples
            )));
        }
        if self.bvh_leaf_size == 0 {
            return Err(RenderError::InvalidConfig(
                "bvh_leaf_size must be at least 1".into(),
            ));
        }
        if self.convergence_threshold.is_nan() || self.convergence_threshold < 0.0 {
            return Err(RenderError::InvalidConfig(format!(
                "convergence_threshold must be non-negative, got {}",
                self.convergence_threshold
            )));
        }
        Ok(())
    }
}

/// Pixels rendered so far, shared by every worker.
///
/// Workers report in batches; each 10% milestone is logged once.
#[derive(Debug)]
pub struct Progress {
    total: usize,
    state: Mutex<ProgressState>,
}

#[derive(Debug, Default)]
struct ProgressState {
    pixels: usize,
    rays: u64,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            state: Mutex::new(ProgressState::default()),
        }
    }

    /// Record `pixels` finished pixels that took `rays` rays.
    pub fn add(&self, pixels: usize, rays: u64) {
        let mut state = self.state();
        let before = state.pixels;
        state.pixels += pixels;
        state.rays += rays;

        if self.total > 0 {
            let milestone = |n: usize| n * 10 / self.total;
            if milestone(state.pixels) > milestone(before) {
                log::info!("Rendered {}%", milestone(state.pixels) * 10);
            }
        }
    }

    /// Finished pixels so far.
    pub fn rendered(&self) -> usize {
        self.state().pixels
    }

    /// Rays traced so far.
    pub fn rays(&self) -> u64 {
        self.state().rays
    }

    /// Counts stay valid if a worker panicked while holding the lock.
    fn state(&self) -> MutexGuard<'_, ProgressState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Completed fraction in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        self.rendered() as f32 / self.total as f32
    }
}

/// Pixels reported to [`Progress`] at a time.
const PROGRESS_BATCH: usize = 64;

/// 8-bit RGBA pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Color> for Rgba8 {
    fn from(color: Color) -> Self {
        let [r, g, b, a] = color.to_rgba8();
        Self { r, g, b, a }
    }
}

/// Final 8-bit image, row-major from the top-left corner.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Rgba8>,
}

impl Framebuffer {
    /// Create a new framebuffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba8::default(); width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Rgba8 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, pixel: Rgba8) {
        self.pixels[(y * self.width + x) as usize] = pixel;
    }

    /// Raw RGBA bytes, ready for an image encoder.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Renders a scene with a fixed set of workers.
pub struct Renderer<'s> {
    scene: &'s Scene,
    bvh: Bvh,
    camera: Camera,
    config: RenderConfig,
    progress: Progress,
}

impl<'s> Renderer<'s> {
    /// Validate `config` and build the BVH for `scene`.
    pub fn new(scene: &'s Scene, config: RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;

        let start = Instant::now();
        let bvh = Bvh::build(scene, config.bvh_leaf_size);
        log::info!(
            "Built BVH over {} surfaces in {:.2?}",
            scene.surfaces().len(),
            start.elapsed()
        );

        Ok(Self {
            scene,
            bvh,
            camera: scene.camera(),
            config,
            progress: Progress::new(scene.pixel_count()),
        })
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Render the whole image on a pool of worker threads.
    pub fn render(&self) -> Result<Framebuffer, RenderError> {
        let total = self.scene.pixel_count();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()?;
        let workers = pool.current_num_threads().clamp(1, total.max(1));

        log::info!(
            "Rendering {}x{} with {} workers",
            self.scene.width,
            self.scene.height,
            workers
        );
        let start = Instant::now();

        let parts: Vec<Vec<Color>> = pool.install(|| {
            (0..workers)
                .into_par_iter()
                .map(|worker| self.render_pixels(worker, workers))
                .collect()
        });

        let mut framebuffer = Framebuffer::new(self.scene.width, self.scene.height);
        for (worker, colors) in parts.into_iter().enumerate() {
            for (k, color) in colors.into_iter().enumerate() {
                framebuffer.pixels[worker + k * workers] = color.into();
            }
        }

        log::info!(
            "Rendered {} pixels in {:.2?} ({} rays)",
            total,
            start.elapsed(),
            self.progress.rays()
        );
        Ok(framebuffer)
    }

    /// Render pixels `start, start + stride, start + 2 * stride, ...`.
    ///
    /// # Panics
    ///
    /// Panics unless `start < stride`.
    pub fn render_pixels(&self, start: usize, stride: usize) -> Vec<Color> {
        assert!(start < stride, "worker {start} out of range for {stride} workers");

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(start as u64)),
            None => StdRng::from_entropy(),
        };
        let tracer = Tracer::new(self.scene, &self.bvh, self.config.max_depth);

        let mut colors = Vec::with_capacity(self.scene.pixel_count() / stride + 1);
        let mut reported_rays = 0;
        for index in (start..self.scene.pixel_count()).step_by(stride) {
            colors.push(self.sample_pixel(&tracer, index, &mut rng));

            if colors.len() % PROGRESS_BATCH == 0 {
                self.progress.add(PROGRESS_BATCH, tracer.rays_traced() - reported_rays);
                reported_rays = tracer.rays_traced();
            }
        }
        self.progress
            .add(colors.len() % PROGRESS_BATCH, tracer.rays_traced() - reported_rays);

        colors
    }

    /// Adaptive jittered sampling of one pixel.
    ///
    /// Keeps sampling until at least `min_samples` were taken and the
    /// luminance range per sample falls below the convergence threshold,
    /// or `max_samples` is reached.
    fn sample_pixel(&self, tracer: &Tracer, index: usize, rng: &mut StdRng) -> Color {
        let width = self.scene.width as usize;
        let px = (index % width) as f32;
        let py = (index / width) as f32;
        let half_w = self.scene.width as f32 / 2.0;
        let half_h = self.scene.height as f32 / 2.0;

        let min_samples = self.config.min_samples as usize;
        let max_samples = self.config.max_samples as usize;
        let mut samples = Vec::with_capacity(min_samples);
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;

        loop {
            let jx: f32 = rng.gen();
            let jy: f32 = rng.gen();
            let x = (px - half_w + jx) / half_w;
            let y = -(py - half_h + jy) / half_h;

            let color = tracer.color_along_ray(&self.camera.ray_through(x, y), 0);
            let luminance = color.luminance();
            lo = lo.min(luminance);
            hi = hi.max(luminance);
            samples.push(color);

            let n = samples.len();
            let converged =
                n >= min_samples && (hi - lo) / (n as f32) < self.config.convergence_threshold;
            if converged || n >= max_samples {
                break;
            }
        }

        Color::average(&samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sphere;
    use glint_core::{CameraSettings, Light, Material};
    use glint_math::Vec3;

    /// Unit sphere at the origin seen from z = 5, lit from above.
    fn sphere_scene(size: u32) -> Scene {
        let camera = CameraSettings {
            position: Vec3::new(0.0, 0.0, 5.0),
            direction: -Vec3::Z,
            up: Vec3::Y,
            half_angle: 20.0,
        };
        let mut scene = Scene::new(size, size, camera);
        scene.add_surface(Sphere::new(Vec3::ZERO, 1.0, Material::default()));
        scene.add_light(Light::point(Vec3::new(0.0, 5.0, 0.0), Color::WHITE));
        scene
    }

    fn seeded(threads: usize) -> RenderConfig {
        RenderConfig {
            threads,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_config_defaults_and_json() {
        let config = RenderConfig::from_json(r#"{ "max_samples": 64, "seed": 7 }"#).unwrap();
        assert_eq!(config.max_samples, 64);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.min_samples, 8);
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.bvh_leaf_size, 4);
        assert!((config.convergence_threshold - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_config_validation() {
        let bad = [
            r#"{ "min_samples": 0 }"#,
            r#"{ "min_samples": 16, "max_samples": 8 }"#,
            r#"{ "bvh_leaf_size": 0 }"#,
            r#"{ "convergence_threshold": -1.0 }"#,
        ];
        for json in bad {
            assert!(matches!(
                RenderConfig::from_json(json),
                Err(RenderError::InvalidConfig(_))
            ));
        }

        assert!(matches!(
            RenderConfig::from_json("{ not json"),
            Err(RenderError::Config(_))
        ));
    }

    #[test]
    fn test_progress_counts_batches() {
        let progress = Progress::new(100);
        progress.add(30, 300);
        progress.add(25, 50);

        assert_eq!(progress.rendered(), 55);
        assert_eq!(progress.rays(), 350);
        assert!((progress.fraction() - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_progress_survives_poisoned_lock() {
        let progress = Progress::new(10);
        progress.add(2, 20);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = progress.state.lock().unwrap();
            panic!("worker died");
        }));
        assert!(result.is_err());
        assert!(progress.state.is_poisoned());

        progress.add(3, 30);
        assert_eq!(progress.rendered(), 5);
        assert_eq!(progress.rays(), 50);
    }

    #[test]
    fn test_framebuffer_bytes() {
        let mut fb = Framebuffer::new(2, 1);
        fb.set(1, 0, Color::rgb(1.0, 0.5, 2.0).into());

        assert_eq!(fb.get(1, 0), Rgba8 { r: 255, g: 127, b: 255, a: 255 });
        assert_eq!(fb.as_bytes(), &[0, 0, 0, 0, 255, 127, 255, 255]);
    }

    #[test]
    fn test_render_sphere_center_lit_corners_background() {
        let scene = sphere_scene(4);
        let renderer = Renderer::new(&scene, seeded(2)).unwrap();
        let fb = renderer.render().unwrap();

        // Corner pixels never see the sphere
        let background = Rgba8::from(scene.background);
        for (x, y) in [(0, 0), (3, 0), (0, 3), (3, 3)] {
            assert_eq!(fb.get(x, y), background);
        }

        // Upper center pixels face the light
        let center = fb.get(1, 1);
        assert!(center.r > 0 && center.g > 0 && center.b > 0);

        assert_eq!(renderer.progress().rendered(), 16);
        assert!(renderer.progress().rays() >= 16 * 8);
    }

    #[test]
    fn test_render_pixels_partition() {
        let scene = sphere_scene(4);
        let renderer = Renderer::new(&scene, seeded(1)).unwrap();

        let sizes: Vec<usize> = (0..3).map(|w| renderer.render_pixels(w, 3).len()).collect();
        assert_eq!(sizes, vec![6, 5, 5]);
        assert_eq!(renderer.progress().rendered(), 16);
    }

    #[test]
    fn test_corner_pixel_is_exactly_background() {
        let scene = sphere_scene(4);
        let renderer = Renderer::new(&scene, seeded(1)).unwrap();

        // Worker 0 of 16 owns pixel 0 alone
        let colors = renderer.render_pixels(0, 16);
        assert_eq!(colors, vec![scene.background]);
    }

    #[test]
    fn test_seeded_render_is_reproducible() {
        let scene = sphere_scene(4);
        let a = Renderer::new(&scene, seeded(2)).unwrap().render().unwrap();
        let b = Renderer::new(&scene, seeded(2)).unwrap().render().unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    #[should_panic]
    fn test_render_pixels_rejects_bad_worker() {
        let scene = sphere_scene(2);
        let renderer = Renderer::new(&scene, seeded(1)).unwrap();
        renderer.render_pixels(2, 2);
    }
}
