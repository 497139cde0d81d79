//! Render output buffer and resolution resampling.

use mint_math::{color_to_argb, color_to_rgba, Color};

/// Row-major buffer of linear colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::ZERO)
    }

    /// Create a new image buffer filled with one color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Pack every pixel as an opaque `0xAARRGGBB` word.
    pub fn to_argb(&self) -> Vec<u32> {
        self.pixels.iter().copied().map(color_to_argb).collect()
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| color_to_rgba(*color))
            .collect()
    }

    /// Convert to an `image` crate buffer for encoders it supports.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(color_to_rgba(self.get(x, y)))
        })
    }

    /// Resample by `factor`, returning the new image and the factor actually
    /// applied.
    ///
    /// The factor is first snapped with [`round_scale_factor`]. Shrinking
    /// averages non-overlapping square blocks; enlarging replicates the
    /// nearest source pixel. Partial blocks at the right and bottom edges of a
    /// shrink are dropped.
    pub fn scale(&self, factor: f32) -> (ImageBuffer, f32) {
        let factor = round_scale_factor(factor);
        let width = (self.width as f32 * factor) as u32;
        let height = (self.height as f32 * factor) as u32;

        let scaled = if factor == 1.0 {
            self.clone()
        } else if 1.0 / factor > 1.0 {
            self.box_downscale((1.0 / factor).round() as u32, width, height)
        } else {
            self.nearest_upscale(factor as u32, width, height)
        };

        (scaled, factor)
    }

    fn box_downscale(&self, step: u32, width: u32, height: u32) -> ImageBuffer {
        let weight = 1.0 / (step * step) as f32;
        let mut out = ImageBuffer::new(width, height);

        for y in 0..height {
            for x in 0..width {
                let mut sum = Color::ZERO;
                for sy in y * step..(y + 1) * step {
                    for sx in x * step..(x + 1) * step {
                        sum += self.get(sx, sy);
                    }
                }
                out.set(x, y, sum * weight);
            }
        }

        out
    }

    fn nearest_upscale(&self, step: u32, width: u32, height: u32) -> ImageBuffer {
        let mut out = ImageBuffer::new(width, height);

        for y in 0..height {
            let sy = (y / step).min(self.height - 1);
            for x in 0..width {
                let sx = (x / step).min(self.width - 1);
                out.set(x, y, self.get(sx, sy));
            }
        }

        out
    }
}

/// Snap a requested scale factor to one the resampler supports.
///
/// Factors above 1 round to the nearest integer, factors in (0.4, 1] become
/// 0.5 and anything smaller becomes 0.25.
pub fn round_scale_factor(factor: f32) -> f32 {
    if factor > 1.0 {
        factor.round()
    } else if factor > 0.4 {
        0.5
    } else {
        0.25
    }
}
