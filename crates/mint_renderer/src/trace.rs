//! Bounce compositor.
//!
//! A camera ray gets its local shading plus two independent bounded chains:
//! mirror reflections and Snell refractions. Each chain keeps a running
//! weight that halves on every qualifying surface, so contributions fade
//! quickly. The chains add to the primary color without any energy
//! normalisation.

use mint_core::Scene;
use mint_math::{reflect, refract, Color, Ray, Vec3};

use crate::hit::HitInfo;
use crate::intersect::intersect_scene;
use crate::shading::trace_for_each_light;

/// Distance a bounce ray starts along its own direction.
pub const BOUNCE_OFFSET: f32 = 1e-3;

/// Weight factor applied per bounce on a qualifying surface.
const BOUNCE_ATTENUATION: f32 = 0.5;

/// Which incident direction a bounce reflects or refracts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BounceBasis {
    /// Every bounce uses the camera ray's direction, whatever the previous
    /// bounce did. This is the classic mintrace look.
    #[default]
    PrimaryRay,

    /// Each bounce continues from the ray traced by the previous one.
    PreviousBounce,
}

impl BounceBasis {
    #[inline]
    fn incident(self, primary: &Ray, previous: &Ray) -> Vec3 {
        match self {
            BounceBasis::PrimaryRay => primary.direction,
            BounceBasis::PreviousBounce => previous.direction,
        }
    }
}

/// Fresnel-style reflectance, `(1 - cos θ)^power`.
pub fn fresnel_reflectance(incident: Vec3, normal: Vec3, power: f32) -> f32 {
    (1.0 - (-incident).dot(normal)).max(0.0).powf(power)
}

/// Full color seen along a camera ray.
///
/// `ray` should have a unit-length direction.
pub fn trace(scene: &Scene, ray: &Ray, basis: BounceBasis) -> Color {
    let hit = intersect_scene(scene, ray);
    let local = trace_for_each_light(scene, ray, &hit);
    if !hit.hit {
        return local;
    }

    local + reflection_chain(scene, ray, &hit, basis) + refraction_chain(scene, ray, &hit, basis)
}

/// Accumulated color of up to `reflection_bounce_count` mirror bounces.
pub fn reflection_chain(scene: &Scene, ray: &Ray, primary: &HitInfo, basis: BounceBasis) -> Color {
    let mut color = Color::ZERO;
    let mut weight = 1.0;
    let mut current_ray = *ray;
    let mut current_hit = *primary;

    for _ in 0..scene.reflection_bounce_count {
        if !current_hit.hit {
            break;
        }

        let material = scene.material(current_hit.material_index);
        if !material.is_reflective() {
            break;
        }
        weight *= BOUNCE_ATTENUATION;

        let incident = basis.incident(ray, &current_ray);
        let direction = reflect(incident, current_hit.normal).normalize();
        let fresnel = if material.is_refractive() {
            fresnel_reflectance(incident, current_hit.normal, scene.fresnel_power)
        } else {
            1.0
        };

        current_ray = Ray::offset(current_hit.position, direction, BOUNCE_OFFSET);
        current_hit = intersect_scene(scene, &current_ray);
        color += weight * fresnel * trace_for_each_light(scene, &current_ray, &current_hit);
    }

    color
}

/// Accumulated color of up to `refraction_bounce_count` transmissions.
///
/// Total internal reflection ends the chain.
pub fn refraction_chain(scene: &Scene, ray: &Ray, primary: &HitInfo, basis: BounceBasis) -> Color {
    let mut color = Color::ZERO;
    let mut weight = 1.0;
    let mut current_ray = *ray;
    let mut current_hit = *primary;

    for _ in 0..scene.refraction_bounce_count {
        if !current_hit.hit {
            break;
        }

        let material = scene.material(current_hit.material_index);
        if !material.is_refractive() {
            break;
        }
        weight *= BOUNCE_ATTENUATION;

        let incident = basis.incident(ray, &current_ray);
        let Some(direction) = refract(incident, current_hit.normal, material.refractivity) else {
            break;
        };
        let transmittance = if material.is_reflective() {
            1.0 - fresnel_reflectance(incident, current_hit.normal, scene.fresnel_power)
        } else {
            1.0
        };

        current_ray = Ray::offset(current_hit.position, direction.normalize(), BOUNCE_OFFSET);
        current_hit = intersect_scene(scene, &current_ray);
        color += weight * transmittance * trace_for_each_light(scene, &current_ray, &current_hit);
    }

    color
}
