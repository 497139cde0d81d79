//! Color helpers and 32-bit pixel packing.

use crate::Vec3;

/// Color type alias. Channels are unbounded until packed.
pub type Color = Vec3;

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

#[inline]
fn channel_to_u8(x: f32) -> u8 {
    (255.0 * clamp_01(x)) as u8
}

/// Pack a color into an opaque `0xAARRGGBB` word.
pub fn color_to_argb(color: Color) -> u32 {
    0xFF00_0000
        | (channel_to_u8(color.x) as u32) << 16
        | (channel_to_u8(color.y) as u32) << 8
        | channel_to_u8(color.z) as u32
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    [
        channel_to_u8(color.x),
        channel_to_u8(color.y),
        channel_to_u8(color.z),
        255,
    ]
}
