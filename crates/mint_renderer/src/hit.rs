//! Ray-surface hit record.

use mint_math::Vec3;

/// Ray parameter reported by a miss.
pub const T_MISS: f32 = f32::MAX;

/// Record of a ray-object intersection.
///
/// A miss is a value like any other (`hit == false`, `t == T_MISS`) rather
/// than an error; callers branch on `hit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    /// Whether anything was hit
    pub hit: bool,
    /// Point of intersection
    pub position: Vec3,
    /// Surface normal at the intersection
    pub normal: Vec3,
    /// Index into the scene's material table
    pub material_index: usize,
    /// Ray parameter of the intersection
    pub t: f32,
}

impl HitInfo {
    /// The miss sentinel.
    pub const MISS: HitInfo = HitInfo {
        hit: false,
        position: Vec3::ZERO,
        normal: Vec3::ZERO,
        material_index: 0,
        t: T_MISS,
    };

    /// Create a hit record.
    pub fn new(position: Vec3, normal: Vec3, material_index: usize, t: f32) -> Self {
        Self {
            hit: true,
            position,
            normal,
            material_index,
            t,
        }
    }

    /// Whether this record is a hit in front of `other`.
    #[inline]
    pub fn is_closer_than(&self, other: &HitInfo) -> bool {
        self.hit && (!other.hit || self.t < other.t)
    }
}

impl Default for HitInfo {
    fn default() -> Self {
        Self::MISS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_sentinel() {
        let miss = HitInfo::default();
        assert!(!miss.hit);
        assert_eq!(miss.t, T_MISS);
    }

    #[test]
    fn test_is_closer_than() {
        let near = HitInfo::new(Vec3::ZERO, Vec3::Y, 0, 1.0);
        let far = HitInfo::new(Vec3::ZERO, Vec3::Y, 0, 5.0);

        assert!(near.is_closer_than(&far));
        assert!(!far.is_closer_than(&near));
        assert!(far.is_closer_than(&HitInfo::MISS));
        assert!(!HitInfo::MISS.is_closer_than(&far));
    }
}
