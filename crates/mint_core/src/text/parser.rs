//! Scene text parser.
//!
//! A single pass over the input lines driven by a small state machine. The
//! three header values come first, then each section marker moves the parser
//! to the next entity type. A line starting with the *next* section's marker
//! transitions; any other non-blank line is parsed as an entity of the
//! current section.

use std::str::FromStr;

use mint_math::Vec3;
use thiserror::Error;

use super::Section;
use crate::scene::{Light, Material, Plane, Scene, Sphere};

/// Errors that can occur while parsing a scene file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unexpected end of input, expected {0}")]
    UnexpectedEof(&'static str),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid number at line {line}: {value:?}")]
    InvalidNumber { line: usize, value: String },

    #[error("Unexpected section marker at line {line}: found {found:?}, expected {expected}")]
    UnexpectedSection {
        line: usize,
        found: String,
        expected: &'static str,
    },

    #[error("{kind} {index} uses material {material_index}, but the scene has {count} materials")]
    DanglingMaterial {
        kind: &'static str,
        index: usize,
        material_index: usize,
        count: usize,
    },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Scene text parser.
pub struct SceneParser<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> SceneParser<'a> {
    /// Create a new parser over file contents.
    pub fn new(content: &'a str) -> Self {
        Self {
            lines: content.lines().enumerate(),
        }
    }

    /// Next non-blank line with its 1-based line number.
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        self.lines
            .by_ref()
            .map(|(i, line)| (i + 1, line.trim()))
            .find(|(_, line)| !line.is_empty())
    }

    fn header_value<T: FromStr>(&mut self, what: &'static str) -> ParseResult<T> {
        let (line, text) = self.next_line().ok_or(ParseError::UnexpectedEof(what))?;
        parse_number(line, text)
    }

    /// Parse the whole input into a new scene.
    pub fn parse(mut self) -> ParseResult<Scene> {
        let mut scene = Scene::empty();

        scene.reflection_bounce_count = self.header_value("reflection bounce count")?;
        scene.refraction_bounce_count = self.header_value("refraction bounce count")?;
        scene.fresnel_power = self.header_value("Fresnel power")?;

        let (line, text) = self
            .next_line()
            .ok_or(ParseError::UnexpectedEof(Section::Materials.marker()))?;
        if !text.starts_with(Section::Materials.marker()) {
            return Err(ParseError::UnexpectedSection {
                line,
                found: text.to_string(),
                expected: Section::Materials.marker(),
            });
        }

        let mut section = Section::Materials;
        while let Some((line, text)) = self.next_line() {
            // Trailing content after the end marker is ignored
            let Some(next) = section.next() else {
                break;
            };

            if text.starts_with(next.marker()) {
                section = next;
                continue;
            }

            if text.starts_with('#') {
                return Err(ParseError::UnexpectedSection {
                    line,
                    found: text.to_string(),
                    expected: next.marker(),
                });
            }

            let fields = Fields::new(line, text);
            match section {
                Section::Materials => {
                    scene.add_material(parse_material(fields)?);
                }
                Section::Lights => scene.add_light(parse_light(fields)?),
                Section::Spheres => scene.add_sphere(parse_sphere(fields)?),
                Section::Planes => scene.add_plane(parse_plane(fields)?),
                Section::End => unreachable!("end section has no successor"),
            }
        }

        if section != Section::End {
            return Err(ParseError::UnexpectedEof(Section::End.marker()));
        }

        if let Some((kind, index, material_index)) = scene.dangling_material() {
            return Err(ParseError::DanglingMaterial {
                kind,
                index,
                material_index,
                count: scene.material_count(),
            });
        }

        log::debug!(
            "Parsed scene: {} materials, {} lights, {} spheres, {} planes",
            scene.material_count(),
            scene.light_count(),
            scene.sphere_count(),
            scene.plane_count()
        );

        Ok(scene)
    }
}

/// Whitespace-separated fields of one entity line.
struct Fields<'a> {
    line: usize,
    tokens: Vec<&'a str>,
    cursor: usize,
}

impl<'a> Fields<'a> {
    fn new(line: usize, text: &'a str) -> Self {
        Self {
            line,
            tokens: text.split_whitespace().collect(),
            cursor: 0,
        }
    }

    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn expect_len(&self, what: &str, expected: &[usize]) -> ParseResult<()> {
        if expected.contains(&self.len()) {
            return Ok(());
        }
        Err(ParseError::Parse {
            line: self.line,
            message: format!(
                "{} expects {:?} fields, found {}",
                what,
                expected,
                self.len()
            ),
        })
    }

    fn next_token(&mut self) -> ParseResult<&'a str> {
        let token = self
            .tokens
            .get(self.cursor)
            .copied()
            .ok_or_else(|| ParseError::Parse {
                line: self.line,
                message: "missing field".to_string(),
            })?;
        self.cursor += 1;
        Ok(token)
    }

    fn number<T: FromStr>(&mut self) -> ParseResult<T> {
        let token = self.next_token()?;
        parse_number(self.line, token)
    }

    fn vec3(&mut self) -> ParseResult<Vec3> {
        let token = self.next_token()?;
        let parts: Vec<&str> = token.split(',').collect();
        if parts.len() != 3 {
            return Err(ParseError::Parse {
                line: self.line,
                message: format!("expected an x,y,z triple, found {:?}", token),
            });
        }
        Ok(Vec3::new(
            parse_number(self.line, parts[0])?,
            parse_number(self.line, parts[1])?,
            parse_number(self.line, parts[2])?,
        ))
    }
}

fn parse_number<T: FromStr>(line: usize, text: &str) -> ParseResult<T> {
    text.trim().parse().map_err(|_| ParseError::InvalidNumber {
        line,
        value: text.to_string(),
    })
}

fn parse_material(mut fields: Fields) -> ParseResult<Material> {
    fields.expect_len("material", &[6])?;
    Ok(Material {
        ambient: fields.vec3()?,
        diffuse: fields.vec3()?,
        specular: fields.vec3()?,
        glossiness: fields.number()?,
        reflectivity: fields.number()?,
        refractivity: fields.number()?,
    })
}

/// The field count carries the light type: a point light has a trailing radius.
fn parse_light(mut fields: Fields) -> ParseResult<Light> {
    fields.expect_len("light", &[2, 3])?;
    let position = fields.vec3()?;
    let color = fields.vec3()?;
    if fields.len() == 3 {
        Ok(Light::point(position, color, fields.number()?))
    } else {
        Ok(Light::directional(position, color))
    }
}

fn parse_sphere(mut fields: Fields) -> ParseResult<Sphere> {
    fields.expect_len("sphere", &[3])?;
    Ok(Sphere::new(fields.number()?, fields.vec3()?, fields.number()?))
}

fn parse_plane(mut fields: Fields) -> ParseResult<Plane> {
    fields.expect_len("plane", &[3])?;
    Ok(Plane::new(fields.vec3()?, fields.number()?, fields.number()?))
}

/// Parse scene text into a freshly built scene.
pub fn parse_scene(content: &str) -> ParseResult<Scene> {
    SceneParser::new(content).parse()
}

impl FromStr for Scene {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scene(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::LightKind;

    const MINIMAL: &str = "\
1
0
2.5
#Materials
0,0,0 0,0,0 0,0,0 0 0 0
0.2,0.2,0.2 0.5,0.5,0.5 1,1,1 32 0.5 1.5
#Lights
-6,2,2 0.7,0.7,0.7
0,3,-4 1,1,1 0.5
#Spheres
1 0,0,-5 1
#Planes
0,1,0 2 0
#End
";

    #[test]
    fn test_parse_minimal_scene() {
        let scene = parse_scene(MINIMAL).unwrap();

        assert_eq!(scene.reflection_bounce_count, 1);
        assert_eq!(scene.refraction_bounce_count, 0);
        assert_eq!(scene.fresnel_power, 2.5);
        assert_eq!(scene.material_count(), 2);
        assert_eq!(scene.materials[1].glossiness, 32.0);
        assert_eq!(scene.materials[1].refractivity, 1.5);
        assert_eq!(scene.lights[0].kind, LightKind::Directional);
        assert_eq!(scene.lights[1].kind, LightKind::Point { radius: 0.5 });
        assert_eq!(scene.spheres[0].center, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(scene.spheres[0].material_index, 1);
        assert_eq!(scene.planes[0].normal, Vec3::Y);
        assert_eq!(scene.planes[0].d, 2.0);
    }

    #[test]
    fn test_parse_via_from_str() {
        let scene: Scene = MINIMAL.parse().unwrap();
        assert_eq!(scene.sphere_count(), 1);
    }

    #[test]
    fn test_parse_tolerates_blank_lines_and_trailing_text() {
        let text = MINIMAL.replace("#Lights\n", "\n#Lights\n\n") + "anything after the end\n";
        let scene = parse_scene(&text).unwrap();
        assert_eq!(scene.light_count(), 2);
    }

    #[test]
    fn test_parse_empty_sections() {
        let scene = parse_scene("0\n0\n1\n#Materials\n#Lights\n#Spheres\n#Planes\n#End\n").unwrap();
        assert_eq!(scene, Scene::empty());
    }

    #[test]
    fn test_parse_truncated_input() {
        let truncated = &MINIMAL[..MINIMAL.find("#Planes").unwrap()];
        assert!(matches!(
            parse_scene(truncated),
            Err(ParseError::UnexpectedEof("#End"))
        ));

        assert!(matches!(
            parse_scene("2\n"),
            Err(ParseError::UnexpectedEof(_))
        ));
    }

    #[test]
    fn test_parse_invalid_number_reports_line() {
        let text = MINIMAL.replace("1 0,0,-5 1", "1 0,zero,-5 1");
        match parse_scene(&text) {
            Err(ParseError::InvalidNumber { line, value }) => {
                assert_eq!(line, 11);
                assert_eq!(value, "zero");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        let text = MINIMAL.replace("0,1,0 2 0", "0,1,0 2");
        assert!(matches!(
            parse_scene(&text),
            Err(ParseError::Parse { line: 13, .. })
        ));

        let text = MINIMAL.replace("-6,2,2 0.7,0.7,0.7", "-6,2,2 0.7,0.7,0.7 1 2");
        assert!(matches!(parse_scene(&text), Err(ParseError::Parse { line: 8, .. })));
    }

    #[test]
    fn test_parse_rejects_bad_triple() {
        let text = MINIMAL.replace("1 0,0,-5 1", "1 0,0 1");
        assert!(matches!(parse_scene(&text), Err(ParseError::Parse { .. })));
    }

    #[test]
    fn test_parse_rejects_out_of_order_sections() {
        let text = MINIMAL.replace("#Spheres", "#Planes");
        assert!(matches!(
            parse_scene(&text),
            Err(ParseError::UnexpectedSection { expected: "#Spheres", .. })
        ));

        let text = MINIMAL.replace("#Materials", "#Lights");
        assert!(matches!(
            parse_scene(&text),
            Err(ParseError::UnexpectedSection { line: 4, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_dangling_material_index() {
        let text = MINIMAL.replace("1 0,0,-5 1", "1 0,0,-5 4");
        assert!(matches!(
            parse_scene(&text),
            Err(ParseError::DanglingMaterial {
                kind: "sphere",
                index: 0,
                material_index: 4,
                count: 2
            })
        ));
    }
}
