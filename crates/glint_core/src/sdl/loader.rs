//! High-level SDL scene loading.
//!
//! This module provides the main entry point for loading scene files and
//! validating them into a [`SceneDescription`]. Any error here aborts the
//! load before the renderer sees the scene.

use std::path::Path;

use glint_math::Vec3;
use thiserror::Error;

use crate::scene::{CameraSettings, SceneDescription, Shape};
use crate::sdl::parser::{parse_sdl, ParseError};
use crate::sdl::types::{Directive, Record};
use crate::{Light, Material};

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("`{directive}` at line {line} before `{declaration}` was declared")]
    Undeclared {
        line: usize,
        directive: &'static str,
        declaration: &'static str,
    },

    #[error("Too many {pool}s at line {line}: at most {max} declared")]
    PoolOverflow {
        line: usize,
        pool: &'static str,
        max: usize,
    },

    #[error("{pool} index {index} at line {line} out of range ({count} declared)")]
    IndexOutOfRange {
        line: usize,
        pool: &'static str,
        index: i64,
        count: usize,
    },

    #[error("Invalid `{directive}` at line {line}: {message}")]
    InvalidValue {
        line: usize,
        directive: &'static str,
        message: String,
    },
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load an SDL file and return its scene description.
///
/// # Example
///
/// ```ignore
/// use glint_core::sdl::load_sdl;
///
/// let scene = load_sdl("scene.txt")?;
/// println!("Loaded {} shapes", scene.shapes.len());
/// ```
pub fn load_sdl<P: AsRef<Path>>(path: P) -> LoadResult<SceneDescription> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    log::debug!("Loading scene {}", path.display());
    load_sdl_from_string(&content)
}

/// Load SDL from a string (useful for testing).
pub fn load_sdl_from_string(content: &str) -> LoadResult<SceneDescription> {
    let records = parse_sdl(content)?;

    let mut builder = SceneBuilder::new();
    for record in &records {
        builder.process(record)?;
    }

    Ok(builder.finish())
}

/// A bounded pool of vertices or normals referenced by index.
struct Pool {
    name: &'static str,
    declaration: &'static str,
    max: Option<usize>,
    items: Vec<Vec3>,
}

impl Pool {
    fn new(name: &'static str, declaration: &'static str) -> Self {
        Self {
            name,
            declaration,
            max: None,
            items: Vec::new(),
        }
    }

    fn declare(&mut self, line: usize, max: i64) -> LoadResult<()> {
        if max < 1 {
            return Err(LoadError::InvalidValue {
                line,
                directive: self.declaration,
                message: format!("maximum must be positive, got {max}"),
            });
        }
        self.max = Some(max as usize);
        Ok(())
    }

    fn push(&mut self, line: usize, directive: &'static str, v: Vec3) -> LoadResult<()> {
        let max = self.max.ok_or(LoadError::Undeclared {
            line,
            directive,
            declaration: self.declaration,
        })?;
        if self.items.len() >= max {
            return Err(LoadError::PoolOverflow {
                line,
                pool: self.name,
                max,
            });
        }
        self.items.push(v);
        Ok(())
    }

    fn get(&self, line: usize, index: i64) -> LoadResult<Vec3> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.items.get(i).copied())
            .ok_or(LoadError::IndexOutOfRange {
                line,
                pool: self.name,
                index,
                count: self.items.len(),
            })
    }

    fn get3(&self, line: usize, indices: [i64; 3]) -> LoadResult<[Vec3; 3]> {
        Ok([
            self.get(line, indices[0])?,
            self.get(line, indices[1])?,
            self.get(line, indices[2])?,
        ])
    }
}

/// Internal builder for constructing a scene description from records.
struct SceneBuilder {
    scene: SceneDescription,
    vertices: Pool,
    normals: Pool,
    /// Material applied to subsequently declared surfaces
    material: Material,
}

impl SceneBuilder {
    fn new() -> Self {
        Self {
            scene: SceneDescription::default(),
            vertices: Pool::new("vertex", "max_vertices"),
            normals: Pool::new("normal", "max_normals"),
            material: Material::default(),
        }
    }

    fn process(&mut self, record: &Record) -> LoadResult<()> {
        let line = record.line;
        let keyword = record.directive.keyword();

        match record.directive {
            Directive::Camera {
                position,
                direction,
                up,
                half_angle,
            } => {
                let direction = nonzero(line, keyword, direction)?;
                let up = nonzero(line, keyword, up)?;
                if half_angle <= 0.0 || half_angle >= 90.0 {
                    return Err(invalid(
                        line,
                        keyword,
                        format!("half-angle must be within (0, 90) degrees, got {half_angle}"),
                    ));
                }
                if direction.cross(up).length_squared() == 0.0 {
                    return Err(invalid(line, keyword, "up vector is parallel to direction".into()));
                }
                self.scene.camera = CameraSettings {
                    position,
                    direction,
                    up,
                    half_angle,
                };
            }
            Directive::FilmResolution { width, height } => {
                let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
                    return Err(invalid(line, keyword, format!("{width}x{height} out of range")));
                };
                if w == 0 || h == 0 {
                    return Err(invalid(line, keyword, format!("{w}x{h} has no pixels")));
                }
                self.scene.width = w;
                self.scene.height = h;
            }
            Directive::MaxVertices(max) => self.vertices.declare(line, max)?,
            Directive::MaxNormals(max) => self.normals.declare(line, max)?,
            Directive::Vertex(v) => self.vertices.push(line, keyword, v)?,
            Directive::Normal(n) => {
                let n = nonzero(line, keyword, n)?;
                self.normals.push(line, keyword, n)?
            }
            Directive::Triangle(indices) => {
                let vertices = self.vertices.get3(line, indices)?;
                degenerate_check(line, keyword, &vertices)?;
                self.scene.shapes.push(Shape::Triangle {
                    vertices,
                    material: self.material,
                });
            }
            Directive::NormalTriangle { vertices, normals } => {
                let vertices = self.vertices.get3(line, vertices)?;
                let normals = self.normals.get3(line, normals)?;
                degenerate_check(line, keyword, &vertices)?;
                self.scene.shapes.push(Shape::NormalTriangle {
                    vertices,
                    normals,
                    material: self.material,
                });
            }
            Directive::Sphere { center, radius } => {
                if radius <= 0.0 {
                    return Err(invalid(line, keyword, format!("radius must be positive, got {radius}")));
                }
                self.scene.shapes.push(Shape::Sphere {
                    center,
                    radius,
                    material: self.material,
                });
            }
            Directive::Plane { point, normal } => {
                let normal = nonzero(line, keyword, normal)?;
                self.scene.shapes.push(Shape::Plane {
                    point,
                    normal,
                    material: self.material,
                });
            }
            Directive::Background(color) => self.scene.background = color,
            Directive::AmbientLight(color) => self.scene.ambient = color,
            Directive::Material(material) => {
                if material.phong_exponent < 0.0 {
                    return Err(invalid(line, keyword, "phong exponent must not be negative".into()));
                }
                if material.ior <= 0.0 {
                    return Err(invalid(line, keyword, format!("index of refraction must be positive, got {}", material.ior)));
                }
                self.material = material;
            }
            Directive::PointLight { color, position } => {
                self.scene.lights.push(Light::point(position, color));
            }
            Directive::DirectionalLight { color, direction } => {
                let direction = nonzero(line, keyword, direction)?;
                self.scene.lights.push(Light::directional(direction, color));
            }
            Directive::SpotLight {
                color,
                position,
                direction,
                inner_angle,
                outer_angle,
            } => {
                let direction = nonzero(line, keyword, direction)?;
                if inner_angle <= 0.0 || outer_angle <= inner_angle || outer_angle >= 360.0 {
                    return Err(invalid(
                        line,
                        keyword,
                        format!("cone angles must satisfy 0 < inner < outer < 360, got {inner_angle} and {outer_angle}"),
                    ));
                }
                self.scene.lights.push(Light::spot(
                    position,
                    direction,
                    inner_angle,
                    outer_angle,
                    color,
                ));
            }
            Directive::MaxDepth(depth) => {
                let depth = u32::try_from(depth)
                    .map_err(|_| invalid(line, keyword, format!("depth must not be negative, got {depth}")))?;
                self.scene.max_depth = Some(depth);
            }
        }

        Ok(())
    }

    fn finish(self) -> SceneDescription {
        log::info!(
            "Loaded scene: {}x{}, {} shapes, {} lights, {} vertices, {} normals",
            self.scene.width,
            self.scene.height,
            self.scene.shapes.len(),
            self.scene.lights.len(),
            self.vertices.items.len(),
            self.normals.items.len()
        );
        if self.scene.lights.is_empty() {
            log::warn!("Scene has no lights; only ambient and background will contribute");
        }
        self.scene
    }
}

fn invalid(line: usize, directive: &'static str, message: String) -> LoadError {
    LoadError::InvalidValue {
        line,
        directive,
        message,
    }
}

fn nonzero(line: usize, directive: &'static str, v: Vec3) -> LoadResult<Vec3> {
    if v.length_squared() == 0.0 {
        return Err(invalid(line, directive, "direction vector has zero length".into()));
    }
    Ok(v)
}

fn degenerate_check(line: usize, directive: &'static str, v: &[Vec3; 3]) -> LoadResult<()> {
    let area2 = (v[1] - v[0]).cross(v[2] - v[0]).length_squared();
    if area2 == 0.0 {
        return Err(invalid(line, directive, "triangle has zero area".into()));
    }
    Ok(())
}
