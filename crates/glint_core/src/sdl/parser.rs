//! SDL text parser.
//!
//! Line-by-line: blank lines and `#` comments are skipped, every other line
//! must be a known keyword followed by exactly the right number of numeric
//! fields. No semantic checks happen here.

use glint_math::Vec3;
use thiserror::Error;

use super::types::*;
use crate::{Color, Material};

/// Errors that can occur during SDL parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unknown directive `{directive}` at line {line}")]
    UnknownDirective { line: usize, directive: String },

    #[error("`{directive}` at line {line} expects {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        directive: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid number `{value}` at line {line}")]
    InvalidNumber { line: usize, value: String },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// The numeric fields of one directive line.
struct Fields<'a> {
    line: usize,
    values: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn real(&self, i: usize) -> ParseResult<f32> {
        let value = self.values[i];
        value
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParseError::InvalidNumber {
                line: self.line,
                value: value.to_string(),
            })
    }

    fn int(&self, i: usize) -> ParseResult<i64> {
        let value = self.values[i];
        value.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
            line: self.line,
            value: value.to_string(),
        })
    }

    fn vec3(&self, start: usize) -> ParseResult<Vec3> {
        Ok(Vec3::new(
            self.real(start)?,
            self.real(start + 1)?,
            self.real(start + 2)?,
        ))
    }

    fn color(&self, start: usize) -> ParseResult<Color> {
        Ok(Color::rgb(
            self.real(start)?,
            self.real(start + 1)?,
            self.real(start + 2)?,
        ))
    }

    fn ints3(&self, start: usize) -> ParseResult<[i64; 3]> {
        Ok([self.int(start)?, self.int(start + 1)?, self.int(start + 2)?])
    }
}

/// SDL file parser.
pub struct SdlParser<'a> {
    content: &'a str,
}

impl<'a> SdlParser<'a> {
    /// Create a new parser from file contents.
    pub fn new(content: &'a str) -> Self {
        Self { content }
    }

    /// Parse the whole file into records, in source order.
    pub fn parse(&self) -> ParseResult<Vec<Record>> {
        let mut records = Vec::new();

        for (i, raw) in self.content.lines().enumerate() {
            let line = i + 1;

            // Strip trailing comments
            let text = raw.split('#').next().unwrap_or("").trim();
            if text.is_empty() {
                continue;
            }

            let mut tokens = text.split_whitespace();
            let Some(keyword) = tokens.next() else {
                continue;
            };
            let values: Vec<&str> = tokens.collect();

            let expected = field_count(keyword).ok_or_else(|| ParseError::UnknownDirective {
                line,
                directive: keyword.to_string(),
            })?;
            if values.len() != expected {
                return Err(ParseError::FieldCount {
                    line,
                    directive: keyword.to_string(),
                    expected,
                    found: values.len(),
                });
            }

            let fields = Fields { line, values };
            let directive = Self::parse_directive(keyword, &fields)?;
            records.push(Record { line, directive });
        }

        Ok(records)
    }

    fn parse_directive(keyword: &str, f: &Fields) -> ParseResult<Directive> {
        let directive = match keyword {
            "camera" => Directive::Camera {
                position: f.vec3(0)?,
                direction: f.vec3(3)?,
                up: f.vec3(6)?,
                half_angle: f.real(9)?,
            },
            "film_resolution" => Directive::FilmResolution {
                width: f.int(0)?,
                height: f.int(1)?,
            },
            "max_vertices" => Directive::MaxVertices(f.int(0)?),
            "max_normals" => Directive::MaxNormals(f.int(0)?),
            "max_depth" => Directive::MaxDepth(f.int(0)?),
            "vertex" => Directive::Vertex(f.vec3(0)?),
            "normal" => Directive::Normal(f.vec3(0)?),
            "triangle" => Directive::Triangle(f.ints3(0)?),
            "normal_triangle" => Directive::NormalTriangle {
                vertices: f.ints3(0)?,
                normals: f.ints3(3)?,
            },
            "sphere" => Directive::Sphere {
                center: f.vec3(0)?,
                radius: f.real(3)?,
            },
            "plane" => Directive::Plane {
                point: f.vec3(0)?,
                normal: f.vec3(3)?,
            },
            "background" => Directive::Background(f.color(0)?),
            "ambient_light" => Directive::AmbientLight(f.color(0)?),
            "material" => Directive::Material(Material {
                ambient: f.color(0)?,
                diffuse: f.color(3)?,
                specular: f.color(6)?,
                phong_exponent: f.real(9)?,
                transmissive: f.color(10)?,
                ior: f.real(13)?,
            }),
            "point_light" => Directive::PointLight {
                color: f.color(0)?,
                position: f.vec3(3)?,
            },
            "directional_light" => Directive::DirectionalLight {
                color: f.color(0)?,
                direction: f.vec3(3)?,
            },
            "spot_light" => Directive::SpotLight {
                color: f.color(0)?,
                position: f.vec3(3)?,
                direction: f.vec3(6)?,
                inner_angle: f.real(9)?,
                outer_angle: f.real(10)?,
            },
            // field_count() already rejected anything else
            other => {
                return Err(ParseError::UnknownDirective {
                    line: f.line,
                    directive: other.to_string(),
                })
            }
        };
        Ok(directive)
    }
}

/// Parse SDL content into records.
pub fn parse_sdl(content: &str) -> ParseResult<Vec<Record>> {
    SdlParser::new(content).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sphere_and_light() {
        let sdl = r#"
# A lit sphere
sphere 0 0 -1 0.5
point_light 1 1 1  0 5 0   # white, overhead
"#;

        let records = parse_sdl(sdl).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].line, 3);
        assert_eq!(
            records[0].directive,
            Directive::Sphere {
                center: Vec3::new(0.0, 0.0, -1.0),
                radius: 0.5
            }
        );
        assert_eq!(records[1].directive.keyword(), "point_light");
    }

    #[test]
    fn test_parse_material_field_order() {
        let sdl = "material 0.1 0.2 0.3  0.4 0.5 0.6  0.7 0.8 0.9  32  0.25 0.5 0.75  1.5";
        let records = parse_sdl(sdl).unwrap();

        let Directive::Material(m) = records[0].directive else {
            panic!("Expected material");
        };
        assert_eq!(m.ambient, Color::rgb(0.1, 0.2, 0.3));
        assert_eq!(m.diffuse, Color::rgb(0.4, 0.5, 0.6));
        assert_eq!(m.specular, Color::rgb(0.7, 0.8, 0.9));
        assert_eq!(m.phong_exponent, 32.0);
        assert_eq!(m.transmissive, Color::rgb(0.25, 0.5, 0.75));
        assert_eq!(m.ior, 1.5);
    }

    #[test]
    fn test_parse_normal_triangle() {
        let records = parse_sdl("normal_triangle 0 1 2 3 4 5").unwrap();
        assert_eq!(
            records[0].directive,
            Directive::NormalTriangle {
                vertices: [0, 1, 2],
                normals: [3, 4, 5]
            }
        );
    }

    #[test]
    fn test_unknown_directive() {
        let err = parse_sdl("sphere 0 0 0 1\ncube 1 2 3").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnknownDirective { line: 2, ref directive } if directive == "cube"
        ));
    }

    #[test]
    fn test_wrong_field_count() {
        let err = parse_sdl("vertex 1 2").unwrap_err();
        assert!(matches!(
            err,
            ParseError::FieldCount {
                line: 1,
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_number() {
        let err = parse_sdl("sphere 0 zero 0 1").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line: 1, .. }));

        // Integers must really be integers
        let err = parse_sdl("max_vertices 2.5").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line: 1, .. }));

        // Non-finite reals are rejected too
        let err = parse_sdl("background inf 0 0").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line: 1, .. }));
    }

    #[test]
    fn test_empty_and_comment_only() {
        assert!(parse_sdl("").unwrap().is_empty());
        assert!(parse_sdl("# nothing\n\n   \n#more").unwrap().is_empty());
    }
}
