//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file extension is not on the allow-list.
    #[error("Unsupported file type: {0:?} (expected jpg, jpeg, png, webp or bmp)")]
    UnsupportedExtension(String),

    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Flip horizontal + rotate 270 CW.
    Transpose = 5,
    Rotate90CW = 6,
    /// Flip horizontal + rotate 90 CW.
    Transverse = 7,
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// A decoded image with RGB pixel data.
///
/// This is the single image representation used throughout the editor:
/// originals, previews, rotated intermediates, crops, viewport frames and
/// the final print sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new DecodedImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create an image of the given size filled with a single color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 3);
        for _ in 0..count {
            pixels.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbImage for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Longest edge in pixels.
    pub fn longest_edge(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Read one pixel. Returns `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    /// Write one pixel. Writes outside the image are ignored.
    pub fn put_pixel(&mut self, x: i64, y: i64, rgb: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[idx..idx + 3].copy_from_slice(&rgb);
    }

    /// Composite `src` onto this image with its top-left corner at `(x, y)`.
    ///
    /// Parts of `src` that fall outside this image are clipped.
    pub fn paste(&mut self, src: &DecodedImage, x: i64, y: i64) {
        let dst_w = self.width as i64;
        let dst_h = self.height as i64;

        let x0 = x.max(0);
        let x1 = (x + src.width as i64).min(dst_w);
        if x0 >= x1 {
            return;
        }
        let row_bytes = ((x1 - x0) * 3) as usize;

        for dy in y.max(0)..(y + src.height as i64).min(dst_h) {
            let sy = (dy - y) as usize;
            let sx = (x0 - x) as usize;
            let src_start = (sy * src.width as usize + sx) * 3;
            let dst_start = (dy as usize * self.width as usize + x0 as usize) * 3;
            self.pixels[dst_start..dst_start + row_bytes]
                .copy_from_slice(&src.pixels[src_start..src_start + row_bytes]);
        }
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_filled_image() {
        let img = DecodedImage::filled(4, 3, [255, 255, 255]);
        assert_eq!(img.pixels.len(), 4 * 3 * 3);
        assert!(img.pixels.iter().all(|&v| v == 255));
        assert_eq!(img.longest_edge(), 4);
    }

    #[test]
    fn test_pixel_access() {
        let mut img = DecodedImage::filled(2, 2, [0, 0, 0]);
        img.put_pixel(1, 0, [10, 20, 30]);
        img.put_pixel(-1, 0, [99, 99, 99]);
        img.put_pixel(2, 2, [99, 99, 99]);

        assert_eq!(img.pixel(1, 0), Some([10, 20, 30]));
        assert_eq!(img.pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(img.pixel(2, 0), None);
    }

    #[test]
    fn test_paste_inside() {
        let mut canvas = DecodedImage::filled(5, 5, [255, 255, 255]);
        let stamp = DecodedImage::filled(2, 2, [1, 2, 3]);
        canvas.paste(&stamp, 1, 2);

        assert_eq!(canvas.pixel(1, 2), Some([1, 2, 3]));
        assert_eq!(canvas.pixel(2, 3), Some([1, 2, 3]));
        assert_eq!(canvas.pixel(0, 2), Some([255, 255, 255]));
        assert_eq!(canvas.pixel(3, 2), Some([255, 255, 255]));
        assert_eq!(canvas.pixel(1, 4), Some([255, 255, 255]));
    }

    #[test]
    fn test_paste_clips_at_edges() {
        let mut canvas = DecodedImage::filled(4, 4, [0, 0, 0]);
        let stamp = DecodedImage::filled(3, 3, [7, 7, 7]);

        canvas.paste(&stamp, -2, 3);
        assert_eq!(canvas.pixel(0, 3), Some([7, 7, 7]));
        assert_eq!(canvas.pixel(1, 3), Some([0, 0, 0]));
        assert_eq!(canvas.pixel(0, 2), Some([0, 0, 0]));

        // Entirely outside: nothing changes
        let before = canvas.clone();
        canvas.paste(&stamp, 10, 10);
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_decoded_image_empty() {
        let img = DecodedImage::new(0, 0, vec![]);
        assert!(img.is_empty());
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::InvalidFormat;
        assert_eq!(err.to_string(), "Invalid or unsupported image format");

        let err = DecodeError::UnsupportedExtension("gif".to_string());
        assert!(err.to_string().contains("gif"));
    }
}
