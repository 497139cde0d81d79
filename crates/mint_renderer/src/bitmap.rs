//! 32-bit uncompressed bitmap encoding.
//!
//! Layout: a 14-byte file header and a 40-byte info header, all fields
//! little-endian, followed by one `0xAARRGGBB` word per pixel. The height
//! field is negative so rows are stored top to bottom, matching
//! [`ImageBuffer`] order.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::buffer::ImageBuffer;

/// Size of the combined file and info headers.
pub const BITMAP_HEADER_SIZE: u32 = 54;

const FILE_TYPE: u16 = 0x4D42; // "BM"
const INFO_HEADER_SIZE: u32 = 40;
const BITS_PER_PIXEL: u16 = 32;

/// Total encoded size of a `width`×`height` bitmap, or `None` if it does
/// not fit the 32-bit size fields.
pub fn bitmap_file_size(width: u32, height: u32) -> Option<u32> {
    pixel_data_size(width, height)?.checked_add(BITMAP_HEADER_SIZE)
}

fn pixel_data_size(width: u32, height: u32) -> Option<u32> {
    width.checked_mul(height)?.checked_mul(4)
}

fn too_large(what: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("image {} too large for a bitmap", what),
    )
}

/// Encode `image` as a bitmap into `writer`.
///
/// Fails with [`io::ErrorKind::InvalidInput`] before writing anything if the
/// dimensions overflow the header fields.
pub fn encode_bitmap<W: Write>(image: &ImageBuffer, mut writer: W) -> io::Result<()> {
    let width = i32::try_from(image.width).map_err(|_| too_large("width"))?;
    let height = i32::try_from(image.height).map_err(|_| too_large("height"))?;
    let pixel_bytes =
        pixel_data_size(image.width, image.height).ok_or_else(|| too_large("data"))?;
    let file_size =
        bitmap_file_size(image.width, image.height).ok_or_else(|| too_large("data"))?;

    // File header
    writer.write_all(&FILE_TYPE.to_le_bytes())?;
    writer.write_all(&file_size.to_le_bytes())?;
    writer.write_all(&[0u8; 4])?; // reserved
    writer.write_all(&BITMAP_HEADER_SIZE.to_le_bytes())?;

    // Info header
    writer.write_all(&INFO_HEADER_SIZE.to_le_bytes())?;
    writer.write_all(&width.to_le_bytes())?;
    writer.write_all(&(-height).to_le_bytes())?;
    writer.write_all(&1u16.to_le_bytes())?; // planes
    writer.write_all(&BITS_PER_PIXEL.to_le_bytes())?;
    writer.write_all(&0u32.to_le_bytes())?; // uncompressed
    writer.write_all(&pixel_bytes.to_le_bytes())?;
    writer.write_all(&[0u8; 16])?; // resolution and palette fields

    for argb in image.to_argb() {
        writer.write_all(&argb.to_le_bytes())?;
    }

    writer.flush()
}

/// Encode `image` as a bitmap file at `path`.
pub fn write_bitmap(image: &ImageBuffer, path: impl AsRef<Path>) -> io::Result<()> {
    let file = File::create(path.as_ref())?;
    encode_bitmap(image, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mint_math::Color;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
    }

    fn i32_at(bytes: &[u8], offset: usize) -> i32 {
        u32_at(bytes, offset) as i32
    }

    #[test]
    fn test_two_by_two_header() {
        let mut image = ImageBuffer::new(2, 2);
        image.set(1, 0, Color::new(1.0, 0.0, 0.0));

        let mut bytes = Vec::new();
        encode_bitmap(&image, &mut bytes).unwrap();

        assert_eq!(bytes.len(), 54 + 16);
        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(u32_at(&bytes, 2), 54 + 16);
        assert_eq!(u32_at(&bytes, 10), 54);
        assert_eq!(u32_at(&bytes, 14), 40);
        assert_eq!(i32_at(&bytes, 18), 2);
        assert_eq!(i32_at(&bytes, 22), -2);
        assert_eq!(u16::from_le_bytes([bytes[26], bytes[27]]), 1);
        assert_eq!(u16::from_le_bytes([bytes[28], bytes[29]]), 32);
        assert_eq!(u32_at(&bytes, 30), 0);
        assert_eq!(u32_at(&bytes, 34), 16);
        assert!(bytes[38..54].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_pixels_are_top_down_argb() {
        let mut image = ImageBuffer::new(2, 2);
        image.set(1, 0, Color::new(1.0, 0.0, 0.0));
        image.set(0, 1, Color::new(0.0, 0.0, 1.0));

        let mut bytes = Vec::new();
        encode_bitmap(&image, &mut bytes).unwrap();

        assert_eq!(u32_at(&bytes, 54), 0xFF00_0000);
        assert_eq!(u32_at(&bytes, 58), 0xFFFF_0000);
        assert_eq!(u32_at(&bytes, 62), 0xFF00_00FF);
        assert_eq!(&bytes[58..62], &[0x00, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn test_write_bitmap_file() {
        let path = std::env::temp_dir().join(format!("mint_bitmap_{}.bmp", std::process::id()));
        let image = ImageBuffer::filled(3, 5, Color::splat(0.5));

        write_bitmap(&image, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(Some(bytes.len() as u32), bitmap_file_size(3, 5));
        assert_eq!(i32_at(&bytes, 22), -5);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_oversized_image_is_rejected() {
        assert_eq!(bitmap_file_size(2, 2), Some(54 + 16));
        assert_eq!(bitmap_file_size(33_000, 33_000), None);
        assert_eq!(bitmap_file_size(u32::MAX, 1), None);
        // Pixel data fits in u32 but the header pushes the total over
        assert_eq!(bitmap_file_size(1, (u32::MAX - 3) / 4), None);

        // Dimensions are checked before any pixel is read
        let huge = ImageBuffer {
            width: 33_000,
            height: 33_000,
            pixels: Vec::new(),
        };
        let mut bytes = Vec::new();
        let err = encode_bitmap(&huge, &mut bytes).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(bytes.is_empty());

        let wide = ImageBuffer {
            width: i32::MAX as u32 + 1,
            height: 0,
            pixels: Vec::new(),
        };
        let err = encode_bitmap(&wide, &mut bytes).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
