//! Pinhole camera for primary ray generation.

use std::f32::consts::PI;

use mint_math::{Ray, Vec3};

/// Pinhole camera at the origin looking down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinholeCamera {
    /// Vertical field of view in radians
    fov: f32,
}

impl PinholeCamera {
    /// Create a camera with the default 60 degree field of view.
    pub fn new() -> Self {
        Self { fov: PI / 3.0 }
    }

    /// Set the vertical field of view in radians.
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Unit direction through the center of pixel (x, y).
    ///
    /// Row 0 is the top of the image.
    pub fn ray_direction(&self, x: u32, y: u32, width: u32, height: u32) -> Vec3 {
        let half_extent = (self.fov * 0.5).tan();
        let aspect = width as f32 / height as f32;

        let xx = (2.0 * ((x as f32 + 0.5) / width as f32) - 1.0) * half_extent * aspect;
        let yy = (1.0 - 2.0 * ((y as f32 + 0.5) / height as f32)) * half_extent;

        Vec3::new(xx, yy, -1.0).normalize()
    }

    /// Primary ray for pixel (x, y).
    pub fn get_ray(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        Ray::new(Vec3::ZERO, self.ray_direction(x, y, width, height))
    }

    /// Directions for every pixel of a `width`×`height` image in row-major
    /// order.
    pub fn ray_directions(&self, width: u32, height: u32) -> Vec<Vec3> {
        (0..height)
            .flat_map(|y| (0..width).map(move |x| self.ray_direction(x, y, width, height)))
            .collect()
    }
}

impl Default for PinholeCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_pixel_looks_forward() {
        let camera = PinholeCamera::default();
        // Odd dimensions put a pixel center exactly on the axis
        let dir = camera.ray_direction(2, 2, 5, 5);
        assert!((dir - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_image_orientation() {
        let camera = PinholeCamera::default();
        let top_left = camera.ray_direction(0, 0, 8, 6);
        let bottom_right = camera.ray_direction(7, 5, 8, 6);

        assert!(top_left.x < 0.0 && top_left.y > 0.0);
        assert!(bottom_right.x > 0.0 && bottom_right.y < 0.0);
        assert!((top_left.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_default_fov() {
        assert_eq!(PinholeCamera::default().fov(), PI / 3.0);
        assert_eq!(PinholeCamera::new().with_fov(1.25).fov(), 1.25);
    }

    #[test]
    fn test_fov_spans_vertical_extent() {
        // With a 90 degree fov the edge of the image sits at 45 degrees
        let camera = PinholeCamera::new().with_fov(PI / 2.0);
        let height = 1000;
        let top = camera.ray_direction(0, 0, 1, height);
        let angle = top.y.atan2(-top.z);
        assert!((angle - PI / 4.0).abs() < 1e-2);
    }

    #[test]
    fn test_ray_directions_row_major() {
        let camera = PinholeCamera::default();
        let dirs = camera.ray_directions(4, 3);
        assert_eq!(dirs.len(), 12);
        assert_eq!(dirs[5], camera.ray_direction(1, 1, 4, 3));
        assert_eq!(camera.get_ray(3, 2, 4, 3).direction, dirs[11]);
        assert_eq!(camera.get_ray(3, 2, 4, 3).origin, Vec3::ZERO);
    }
}
