//! Scene text writer.

use std::fmt::{self, Write};

use mint_math::Vec3;

use super::Section;
use crate::scene::{LightKind, Scene};

struct Triple(Vec3);

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0.x, self.0.y, self.0.z)
    }
}

/// Serialize a scene to its text form.
///
/// Floats use Rust's shortest round-trip formatting, so a written scene
/// parses back to identical values.
pub fn write_scene(scene: &Scene) -> String {
    scene.to_string()
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.reflection_bounce_count)?;
        writeln!(f, "{}", self.refraction_bounce_count)?;
        writeln!(f, "{}", self.fresnel_power)?;

        writeln!(f, "{}", Section::Materials.marker())?;
        for m in &self.materials {
            writeln!(
                f,
                "{} {} {} {} {} {}",
                Triple(m.ambient),
                Triple(m.diffuse),
                Triple(m.specular),
                m.glossiness,
                m.reflectivity,
                m.refractivity
            )?;
        }

        writeln!(f, "{}", Section::Lights.marker())?;
        for light in &self.lights {
            write!(f, "{} {}", Triple(light.position), Triple(light.color))?;
            if let LightKind::Point { radius } = light.kind {
                write!(f, " {}", radius)?;
            }
            f.write_char('\n')?;
        }

        writeln!(f, "{}", Section::Spheres.marker())?;
        for s in &self.spheres {
            writeln!(f, "{} {} {}", s.radius, Triple(s.center), s.material_index)?;
        }

        writeln!(f, "{}", Section::Planes.marker())?;
        for p in &self.planes {
            writeln!(f, "{} {} {}", Triple(p.normal), p.d, p.material_index)?;
        }

        writeln!(f, "{}", Section::End.marker())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Light, Material, Plane, Sphere};
    use mint_math::Color;

    #[test]
    fn test_write_exact_layout() {
        let mut scene = Scene::empty();
        scene.reflection_bounce_count = 2;
        scene.refraction_bounce_count = 1;
        scene.fresnel_power = 3.0;
        scene.add_material(Material::new(
            Color::new(0.1, 0.2, 0.3),
            Color::ONE,
            Color::ZERO,
            64.0,
            0.5,
        ));
        scene.add_light(Light::directional(Vec3::new(-6.0, 2.0, 2.0), Color::splat(0.5)));
        scene.add_light(Light::point(Vec3::ZERO, Color::ONE, 0.25));
        scene.add_sphere(Sphere::new(2.0, Vec3::new(-3.0, 1.0, -9.0), 0));
        scene.add_plane(Plane::new(Vec3::Y, 2.0, 0));

        let expected = "2\n1\n3\n\
            #Materials\n0.1,0.2,0.3 1,1,1 0,0,0 64 0.5 0\n\
            #Lights\n-6,2,2 0.5,0.5,0.5\n0,0,0 1,1,1 0.25\n\
            #Spheres\n2 -3,1,-9 0\n\
            #Planes\n0,1,0 2 0\n\
            #End\n";
        assert_eq!(write_scene(&scene), expected);
    }

    #[test]
    fn test_write_empty_scene_keeps_all_markers() {
        let text = write_scene(&Scene::empty());
        let markers: Vec<&str> = text.lines().filter(|l| l.starts_with('#')).collect();
        assert_eq!(markers, ["#Materials", "#Lights", "#Spheres", "#Planes", "#End"]);
    }
}
