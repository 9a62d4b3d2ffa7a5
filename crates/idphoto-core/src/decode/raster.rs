//! Raster decoding with EXIF orientation handling.
//!
//! Any format enabled on the `image` crate is accepted by content sniffing;
//! the extension allow-list only gates what a file picker may hand us.

use std::io::Cursor;
use std::path::Path;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, DecodedImage, Orientation};

/// File extensions accepted by the loader (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];

/// Check whether a path carries one of the supported image extensions.
pub fn is_supported_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Reject paths whose extension is not on the allow-list.
pub fn ensure_supported_path(path: &Path) -> Result<(), DecodeError> {
    if is_supported_path(path) {
        return Ok(());
    }
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();
    Err(DecodeError::UnsupportedExtension(ext))
}

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// Palette, grayscale, 16-bit and alpha images are all normalised to 8-bit
/// RGB. Alpha is dropped.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for empty input and
/// `DecodeError::CorruptedFile` if the bytes cannot be decoded.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let oriented = apply_orientation(img, orientation);
    Ok(DecodedImage::from_rgb_image(oriented.into_rgb8()))
}

/// Returns `Orientation::Normal` if no EXIF data is found.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_path(Path::new("face.jpg")));
        assert!(is_supported_path(Path::new("face.JPEG")));
        assert!(is_supported_path(Path::new("/tmp/x/face.Png")));
        assert!(is_supported_path(Path::new("face.webp")));
        assert!(is_supported_path(Path::new("face.BMP")));

        assert!(!is_supported_path(Path::new("face.gif")));
        assert!(!is_supported_path(Path::new("face")));
        assert!(!is_supported_path(Path::new("jpg")));
    }

    #[test]
    fn test_ensure_supported_path_reports_extension() {
        match ensure_supported_path(Path::new("scan.tiff")) {
            Err(DecodeError::UnsupportedExtension(ext)) => assert_eq!(ext, "tiff"),
            other => panic!("Expected UnsupportedExtension, got {:?}", other),
        }
        assert!(ensure_supported_path(Path::new("scan.jpg")).is_ok());
    }

    #[test]
    fn test_decode_png() {
        let mut src = RgbImage::new(3, 2);
        src.put_pixel(2, 1, Rgb([200, 10, 20]));
        let bytes = encode(DynamicImage::ImageRgb8(src), ImageFormat::Png);

        let img = decode_image(&bytes).unwrap();
        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(img.pixel(2, 1), Some([200, 10, 20]));
    }

    #[test]
    fn test_decode_jpeg() {
        let src = RgbImage::from_pixel(16, 8, Rgb([128, 128, 128]));
        let bytes = encode(DynamicImage::ImageRgb8(src), ImageFormat::Jpeg);

        let img = decode_image(&bytes).unwrap();
        assert_eq!((img.width, img.height), (16, 8));
        assert_eq!(img.pixels.len(), 16 * 8 * 3);
    }

    #[test]
    fn test_decode_bmp() {
        let src = RgbImage::from_pixel(5, 7, Rgb([1, 2, 3]));
        let bytes = encode(DynamicImage::ImageRgb8(src), ImageFormat::Bmp);

        let img = decode_image(&bytes).unwrap();
        assert_eq!((img.width, img.height), (5, 7));
        assert_eq!(img.pixel(4, 6), Some([1, 2, 3]));
    }

    #[test]
    fn test_rgba_is_normalised_to_rgb() {
        let src = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 40]));
        let bytes = encode(DynamicImage::ImageRgba8(src), ImageFormat::Png);

        let img = decode_image(&bytes).unwrap();
        assert_eq!(img.pixels.len(), 2 * 2 * 3);
        assert_eq!(img.pixel(0, 0), Some([10, 20, 30]));
    }

    #[test]
    fn test_grayscale_is_normalised_to_rgb() {
        let src = image::GrayImage::from_pixel(3, 3, image::Luma([90]));
        let bytes = encode(DynamicImage::ImageLuma8(src), ImageFormat::Png);

        let img = decode_image(&bytes).unwrap();
        assert_eq!(img.pixel(1, 1), Some([90, 90, 90]));
    }

    #[test]
    fn test_decode_invalid_bytes() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(matches!(decode_image(&[]), Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_truncated_png() {
        let src = RgbImage::from_pixel(32, 32, Rgb([9, 9, 9]));
        let bytes = encode(DynamicImage::ImageRgb8(src), ImageFormat::Png);

        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_orientation_without_exif() {
        let src = RgbImage::new(2, 2);
        let bytes = encode(DynamicImage::ImageRgb8(src), ImageFormat::Png);
        assert_eq!(extract_orientation(&bytes), Orientation::Normal);
        assert_eq!(extract_orientation(&[0x00, 0x01]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90() {
        let rgb_img = RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        let result = apply_orientation(DynamicImage::ImageRgb8(rgb_img), Orientation::Rotate90CW);
        assert_eq!(result.into_rgb8().dimensions(), (1, 2));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let rgb_img = RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        let result =
            apply_orientation(DynamicImage::ImageRgb8(rgb_img), Orientation::FlipHorizontal)
                .into_rgb8();

        assert_eq!(result.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(result.get_pixel(1, 0).0, [255, 0, 0]);
    }
}
