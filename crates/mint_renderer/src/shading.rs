//! Local Phong shading with hard shadows.

use mint_core::{Light, Scene};
use mint_math::{reflect, Color, Ray, Vec3};

use crate::hit::HitInfo;
use crate::intersect::intersect_scene;

/// Distance the shading point is pushed along its normal before casting
/// shadow rays.
pub const SURFACE_EPSILON: f32 = 1e-5;

/// A blocker must sit at least this much closer to the light than the
/// shading point does.
pub const SHADOW_MARGIN: f32 = 1e-6;

/// Minimum alignment between blocker-to-light and point-to-light for the
/// blocker to count as in front of the light.
pub const SHADOW_ALIGNMENT: f32 = 0.999;

/// Diffuse and specular contribution of one light at a hit.
///
/// Ambient is not included; see [`trace_for_each_light`]. Returns black if
/// `hit` is a miss or the light is occluded.
pub fn shade(scene: &Scene, ray: &Ray, light: &Light, hit: &HitInfo) -> Color {
    if !hit.hit {
        return Color::ZERO;
    }

    let material = scene.material(hit.material_index);
    let point = hit.position + hit.normal * SURFACE_EPSILON;

    let to_light = (light.position - point).normalize();
    let view = (hit.position - ray.origin).normalize();
    let mirrored = reflect(view, hit.normal).normalize();

    let diffuse_term = hit.normal.dot(to_light).max(0.0);
    let specular_term = mirrored.dot(to_light).max(0.0).powf(material.glossiness);

    let mut diffuse = material.diffuse * light.color * diffuse_term;
    if let Some(attenuation) = light.attenuation() {
        diffuse /= attenuation;
    }
    let specular = material.specular * light.color * specular_term;

    if is_occluded(scene, point, to_light, light) {
        return Color::ZERO;
    }

    diffuse + specular
}

/// Whether something sits between `point` and the light.
fn is_occluded(scene: &Scene, point: Vec3, to_light: Vec3, light: &Light) -> bool {
    let blocker = intersect_scene(scene, &Ray::new(point, to_light));
    if !blocker.hit {
        return false;
    }

    let point_distance = (light.position - point).length();
    let blocker_distance = (light.position - blocker.position).length();
    let in_front = point_distance - blocker_distance >= SHADOW_MARGIN;

    // A hit past the light sees the light in the opposite direction
    let aligned = (light.position - blocker.position)
        .normalize()
        .dot(to_light)
        > SHADOW_ALIGNMENT;

    in_front && aligned
}

/// Ambient of the hit material plus [`shade`] summed over every light.
///
/// A miss is black.
pub fn trace_for_each_light(scene: &Scene, ray: &Ray, hit: &HitInfo) -> Color {
    if !hit.hit {
        return Color::ZERO;
    }

    scene
        .lights
        .iter()
        .fold(scene.material(hit.material_index).ambient, |color, light| {
            color + shade(scene, ray, light, hit)
        })
}
