//! Ray intersection against spheres, planes and whole scenes.
//!
//! Scenes hold tens of primitives, so the nearest-hit search is a plain
//! linear scan with no acceleration structure.

use mint_core::{Plane, Scene, Sphere};
use mint_math::Ray;

use crate::hit::HitInfo;

/// Rays closer than this to parallel with a plane never hit it.
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Intersect a ray with a sphere.
///
/// Solves `|o - c + t·d|² = r²` and takes the nearest positive root. When
/// the ray starts inside the sphere the normal is flipped to face the
/// incoming ray.
pub fn intersect_sphere(ray: &Ray, sphere: &Sphere) -> HitInfo {
    let to_origin = ray.origin - sphere.center;

    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * ray.direction.dot(to_origin);
    let c = to_origin.dot(to_origin) - sphere.radius * sphere.radius;
    let det = b * b - 4.0 * a * c;

    if det <= 0.0 {
        return HitInfo::MISS;
    }

    let sqrt_det = det.sqrt();
    let near = (-b - sqrt_det) / (2.0 * a);
    let far = (-b + sqrt_det) / (2.0 * a);

    let t = if near > 0.0 {
        near
    } else if far > 0.0 {
        far
    } else {
        return HitInfo::MISS;
    };

    let position = ray.at(t);
    let mut normal = (position - sphere.center).normalize();
    if to_origin.length() < sphere.radius {
        normal = -normal;
    }

    HitInfo::new(position, normal, sphere.material_index, t)
}

/// Intersect a ray with a plane.
pub fn intersect_plane(ray: &Ray, plane: &Plane) -> HitInfo {
    let denom = plane.normal.dot(ray.direction);
    if denom.abs() <= PARALLEL_EPSILON {
        return HitInfo::MISS;
    }

    let t = -(plane.d + plane.normal.dot(ray.origin)) / denom;
    if t <= 0.0 {
        return HitInfo::MISS;
    }

    HitInfo::new(ray.at(t), plane.normal, plane.material_index, t)
}

/// Find the nearest hit among every sphere, then every plane.
pub fn intersect_scene(scene: &Scene, ray: &Ray) -> HitInfo {
    let spheres = scene.spheres.iter().map(|s| intersect_sphere(ray, s));
    let planes = scene.planes.iter().map(|p| intersect_plane(ray, p));

    spheres.chain(planes).fold(HitInfo::MISS, |closest, hit| {
        if hit.is_closer_than(&closest) {
            hit
        } else {
            closest
        }
    })
}
