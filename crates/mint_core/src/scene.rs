//! Scene model for mintrace.
//!
//! A scene is a flat set of analytic primitives (spheres and planes), a list
//! of lights and a material table. Geometry refers to materials by index
//! into that table.

use std::f32::consts::PI;

use mint_math::{Color, Vec3};

/// Phong-style surface description.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Ambient color, added once per hit regardless of lighting
    pub ambient: Color,

    /// Diffuse color
    pub diffuse: Color,

    /// Specular color
    pub specular: Color,

    /// Phong exponent (>= 0)
    pub glossiness: f32,

    /// 0 disables the reflection bounce, anything above enables it
    pub reflectivity: f32,

    /// Index of refraction. Values <= 1 mean the surface is opaque.
    pub refractivity: f32,
}

impl Material {
    /// Black, non-reflective, opaque material.
    pub const BLACK: Material = Material {
        ambient: Color::ZERO,
        diffuse: Color::ZERO,
        specular: Color::ZERO,
        glossiness: 0.0,
        reflectivity: 0.0,
        refractivity: 0.0,
    };

    /// Create an opaque material.
    pub fn new(
        ambient: Color,
        diffuse: Color,
        specular: Color,
        glossiness: f32,
        reflectivity: f32,
    ) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            glossiness,
            reflectivity,
            refractivity: 0.0,
        }
    }

    /// Set the index of refraction.
    pub fn with_refractivity(mut self, refractivity: f32) -> Self {
        self.refractivity = refractivity;
        self
    }

    /// Whether a reflection bounce is traced off this surface.
    pub fn is_reflective(&self) -> bool {
        self.reflectivity > 0.0
    }

    /// Whether a refraction bounce is traced through this surface.
    pub fn is_refractive(&self) -> bool {
        self.refractivity > 1.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A sphere primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub radius: f32,
    pub center: Vec3,
    pub material_index: usize,
}

impl Sphere {
    pub fn new(radius: f32, center: Vec3, material_index: usize) -> Self {
        Self {
            radius,
            center,
            material_index,
        }
    }
}

/// An infinite plane: points `p` with `dot(normal, p) + d == 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Unit normal
    pub normal: Vec3,
    pub d: f32,
    pub material_index: usize,
}

impl Plane {
    pub fn new(normal: Vec3, d: f32, material_index: usize) -> Self {
        Self {
            normal,
            d,
            material_index,
        }
    }
}

/// Light variants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    /// Unattenuated light. Shading still aims at `Light::position`.
    Directional,

    /// Light whose diffuse contribution is divided by `4π·radius`.
    Point { radius: f32 },
}

/// A light source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Color,
    pub kind: LightKind,
}

impl Light {
    /// Create a directional light.
    pub fn directional(position: Vec3, color: Color) -> Self {
        Self {
            position,
            color,
            kind: LightKind::Directional,
        }
    }

    /// Create a point light.
    pub fn point(position: Vec3, color: Color, radius: f32) -> Self {
        Self {
            position,
            color,
            kind: LightKind::Point { radius },
        }
    }

    /// Divisor applied to the diffuse term, if this light attenuates.
    pub fn attenuation(&self) -> Option<f32> {
        match self.kind {
            LightKind::Directional => None,
            LightKind::Point { radius } => Some(4.0 * PI * radius),
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(self.kind, LightKind::Point { .. })
    }
}

/// A complete scene with its global render parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub planes: Vec<Plane>,
    pub lights: Vec<Light>,
    pub materials: Vec<Material>,

    /// Maximum number of reflection bounces per camera ray
    pub reflection_bounce_count: u32,

    /// Maximum number of refraction bounces per camera ray
    pub refraction_bounce_count: u32,

    /// Exponent of the Fresnel weighting term
    pub fresnel_power: f32,
}

impl Scene {
    /// Create a scene with no entities.
    pub fn empty() -> Self {
        Self {
            spheres: Vec::new(),
            planes: Vec::new(),
            lights: Vec::new(),
            materials: Vec::new(),
            reflection_bounce_count: 0,
            refraction_bounce_count: 0,
            fresnel_power: 1.0,
        }
    }

    /// Add a material to the scene and return its index.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_sphere(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    pub fn add_plane(&mut self, plane: Plane) {
        self.planes.push(plane);
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Get a material by index.
    ///
    /// Live edits can leave a dangling index behind; those resolve to
    /// [`Material::BLACK`] rather than panicking inside a render worker.
    pub fn material(&self, index: usize) -> &Material {
        self.materials.get(index).unwrap_or(&Material::BLACK)
    }

    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// First geometry entry whose material index is out of range, as
    /// `(kind, position, material_index)`.
    pub fn dangling_material(&self) -> Option<(&'static str, usize, usize)> {
        let count = self.materials.len();
        let sphere = self
            .spheres
            .iter()
            .enumerate()
            .find(|(_, s)| s.material_index >= count)
            .map(|(i, s)| ("sphere", i, s.material_index));

        sphere.or_else(|| {
            self.planes
                .iter()
                .enumerate()
                .find(|(_, p)| p.material_index >= count)
                .map(|(i, p)| ("plane", i, p.material_index))
        })
    }
}

impl Default for Scene {
    /// The stock scene: three spheres inside a six-plane box, lit by one
    /// point light near the camera.
    fn default() -> Self {
        let mut scene = Scene::empty();

        scene.add_light(Light::point(
            Vec3::new(0.0, 1.5, -2.0),
            Color::new(6.0, 6.0, 6.0),
            0.5,
        ));

        scene.add_material(Material::BLACK);
        let red = scene.add_material(Material::new(
            Color::new(0.3, 0.1, 0.1),
            Color::new(0.9, 0.3, 0.3),
            Color::new(0.9, 0.3, 0.3),
            128.0,
            0.5,
        ));
        let blue = scene.add_material(Material::new(
            Color::new(0.1, 0.2, 0.4),
            Color::new(0.3, 0.5, 0.9),
            Color::new(0.3, 0.5, 0.9),
            64.0,
            0.5,
        ));
        let grey = scene.add_material(Material::new(
            Color::new(0.2, 0.2, 0.2),
            Color::new(0.5, 0.5, 0.5),
            Color::new(0.5, 0.5, 0.5),
            1.0,
            0.5,
        ));
        let glass = scene.add_material(
            Material::new(
                Color::new(0.1, 0.1, 0.4),
                Color::new(0.3, 0.3, 0.9),
                Color::new(0.3, 0.3, 0.9),
                24.0,
                0.5,
            )
            .with_refractivity(1.5),
        );

        scene.add_sphere(Sphere::new(2.0, Vec3::new(-3.0, 1.0, -9.0), red));
        scene.add_sphere(Sphere::new(1.7, Vec3::new(2.3, 0.0, -9.0), blue));
        scene.add_sphere(Sphere::new(0.5, Vec3::new(0.0, 0.0, -5.0), glass));

        scene.add_plane(Plane::new(Vec3::Z, 10.0, grey));
        scene.add_plane(Plane::new(Vec3::NEG_Z, 2.0, grey));
        scene.add_plane(Plane::new(Vec3::Y, 2.0, grey));
        scene.add_plane(Plane::new(Vec3::NEG_Y, 4.0, grey));
        scene.add_plane(Plane::new(Vec3::NEG_X, 4.0, grey));
        scene.add_plane(Plane::new(Vec3::X, 4.0, grey));

        scene.reflection_bounce_count = 2;
        scene.refraction_bounce_count = 2;
        scene.fresnel_power = 3.0;

        scene
    }
}
