//! Glint Core - Scene model and scene description loading.
//!
//! This crate provides:
//!
//! - **Scene model types**: `Color`, `Material`, `Light`, `CameraSettings`,
//!   `Shape` and the `SceneDescription` that ties them together
//! - **SDL support**: parsing and validating the line-oriented scene
//!   description language
//!
//! # Example
//!
//! ```ignore
//! use glint_core::sdl::load_sdl;
//!
//! let scene = load_sdl("scene.txt")?;
//! println!("Loaded {} shapes, {} lights",
//!     scene.shapes.len(),
//!     scene.lights.len());
//! ```

pub mod color;
pub mod light;
pub mod material;
pub mod scene;
pub mod sdl;

// Re-export commonly used types
pub use color::Color;
pub use light::Light;
pub use material::Material;
pub use scene::{CameraSettings, SceneDescription, Shape};
pub use sdl::{load_sdl, load_sdl_from_string};
