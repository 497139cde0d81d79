//! Mirror reflection and Snell refraction.

use crate::Vec3;

/// Reflect `incident` about `normal`.
#[inline]
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - normal * incident.dot(normal) * 2.0
}

/// Refract `incident` through a surface with index of refraction `ior`.
///
/// The outside medium has index 1. A negative cosine between the incident
/// direction and the normal means the ray enters the medium; otherwise it
/// exits, so the index ratio is swapped and the normal flipped.
///
/// Returns `None` on total internal reflection.
pub fn refract(incident: Vec3, normal: Vec3, ior: f32) -> Option<Vec3> {
    let mut cos_i = incident.dot(normal).clamp(-1.0, 1.0);
    let (mut eta_from, mut eta_to) = (1.0, ior);
    let mut n = normal;

    if cos_i < 0.0 {
        cos_i = -cos_i;
    } else {
        std::mem::swap(&mut eta_from, &mut eta_to);
        n = -normal;
    }

    let eta = eta_from / eta_to;
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }

    Some(incident * eta + n * (eta * cos_i - k.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_reflect() {
        let incident = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(incident, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_normal_incidence_passes_straight() {
        let dir = refract(Vec3::NEG_Z, Vec3::Z, 1.5);
        assert!(approx_eq(dir.unwrap_or(Vec3::ZERO), Vec3::NEG_Z));
    }

    #[test]
    fn test_refract_bends_towards_normal_on_entry() {
        let incident = Vec3::new(1.0, -1.0, 0.0).normalize();
        let dir = refract(incident, Vec3::Y, 1.5).unwrap();

        let sin_i = incident.x.abs();
        let sin_t = dir.normalize().x.abs();
        assert!((sin_i / sin_t - 1.5).abs() < 1e-4);
        assert!(dir.y < 0.0);
    }

    #[test]
    fn test_refract_total_internal_reflection() {
        // Leaving glass at a grazing angle: normal points the same way as the ray
        let incident = Vec3::new(0.9, 0.1, 0.0).normalize();
        assert!(refract(incident, Vec3::Y, 1.5).is_none());
    }

    #[test]
    fn test_refract_exit_bends_away_from_normal() {
        let incident = Vec3::new(0.3, 1.0, 0.0).normalize();
        let dir = refract(incident, Vec3::Y, 1.5).unwrap().normalize();
        assert!(dir.x > incident.x);
        assert!(dir.y > 0.0);
    }
}
