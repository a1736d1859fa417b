//! SDL (scene description language) support for Glint.
//!
//! Scene files are plain text with one directive per line:
//!
//! ```text
//! # comment
//! film_resolution 320 240
//! camera 0 0 5  0 0 -1  0 1 0  30
//! material 0.1 0.1 0.1  0.8 0.2 0.2  0.3 0.3 0.3  20  0 0 0  1
//! sphere 0 0 0 1
//! point_light 10 10 10  0 5 5
//! ```
//!
//! Parsing happens in two passes: [`parse_sdl`] checks syntax (known
//! directive, field count, numbers) and produces typed [`Record`]s, then the
//! loader checks semantics (declaration order, pool bounds, value ranges)
//! and builds a [`SceneDescription`](crate::SceneDescription).

mod types;
mod parser;
mod loader;

pub use types::*;
pub use parser::*;
pub use loader::*;
