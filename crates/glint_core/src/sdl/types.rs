//! SDL record types for intermediate representation.
//!
//! These types represent parsed directives before validation and conversion
//! to the scene description. Integer fields are kept signed so that range
//! checks happen in the loader, with a proper error.

use glint_math::Vec3;

use crate::{Color, Material};

/// A parsed directive together with its 1-based source line.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub line: usize,
    pub directive: Directive,
}

/// A single scene directive.
#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    /// `camera px py pz dx dy dz ux uy uz half_angle`
    Camera {
        position: Vec3,
        direction: Vec3,
        up: Vec3,
        half_angle: f32,
    },

    /// `film_resolution width height`
    FilmResolution { width: i64, height: i64 },

    /// `max_vertices n`
    MaxVertices(i64),

    /// `max_normals n`
    MaxNormals(i64),

    /// `vertex x y z`
    Vertex(Vec3),

    /// `normal x y z`
    Normal(Vec3),

    /// `triangle v0 v1 v2`
    Triangle([i64; 3]),

    /// `normal_triangle v0 v1 v2 n0 n1 n2`
    NormalTriangle { vertices: [i64; 3], normals: [i64; 3] },

    /// `sphere x y z radius`
    Sphere { center: Vec3, radius: f32 },

    /// `plane px py pz nx ny nz`
    Plane { point: Vec3, normal: Vec3 },

    /// `background r g b`
    Background(Color),

    /// `ambient_light r g b`
    AmbientLight(Color),

    /// `material ar ag ab dr dg db sr sg sb exponent tr tg tb ior`
    Material(Material),

    /// `point_light r g b x y z`
    PointLight { color: Color, position: Vec3 },

    /// `directional_light r g b dx dy dz`
    DirectionalLight { color: Color, direction: Vec3 },

    /// `spot_light r g b x y z dx dy dz inner outer`
    SpotLight {
        color: Color,
        position: Vec3,
        direction: Vec3,
        inner_angle: f32,
        outer_angle: f32,
    },

    /// `max_depth n`
    MaxDepth(i64),
}

impl Directive {
    /// Keyword introducing this directive in a scene file.
    pub fn keyword(&self) -> &'static str {
        match self {
            Directive::Camera { .. } => "camera",
            Directive::FilmResolution { .. } => "film_resolution",
            Directive::MaxVertices(_) => "max_vertices",
            Directive::MaxNormals(_) => "max_normals",
            Directive::Vertex(_) => "vertex",
            Directive::Normal(_) => "normal",
            Directive::Triangle(_) => "triangle",
            Directive::NormalTriangle { .. } => "normal_triangle",
            Directive::Sphere { .. } => "sphere",
            Directive::Plane { .. } => "plane",
            Directive::Background(_) => "background",
            Directive::AmbientLight(_) => "ambient_light",
            Directive::Material(_) => "material",
            Directive::PointLight { .. } => "point_light",
            Directive::DirectionalLight { .. } => "directional_light",
            Directive::SpotLight { .. } => "spot_light",
            Directive::MaxDepth(_) => "max_depth",
        }
    }
}

/// Number of numeric fields each directive takes, or `None` for unknown
/// keywords.
pub fn field_count(keyword: &str) -> Option<usize> {
    let count = match keyword {
        "camera" => 10,
        "film_resolution" => 2,
        "max_vertices" | "max_normals" | "max_depth" => 1,
        "vertex" | "normal" | "triangle" => 3,
        "normal_triangle" => 6,
        "sphere" => 4,
        "plane" => 6,
        "background" | "ambient_light" => 3,
        "material" => 14,
        "point_light" | "directional_light" => 6,
        "spot_light" => 11,
        _ => return None,
    };
    Some(count)
}
