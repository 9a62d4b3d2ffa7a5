//! Pixel-space cropping with padding.
//!
//! The crop box comes from inverting the viewport transform, so it may lie
//! partly or wholly outside the source image when the user has panned or
//! zoomed out past the edges. The output always has the requested size;
//! uncovered pixels take the rotation fill color.
//!
//! `crop_to_size` never materializes the padding: only the overlap with the
//! source is resampled, so a box many times larger than the image costs no
//! more than the output.

use serde::{Deserialize, Serialize};

use super::rotation::FILL_COLOR;
use crate::decode::{resize, DecodeError, DecodedImage, FilterType};

/// A crop rectangle in source pixel coordinates (edges, not sizes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl CropBox {
    pub fn from_origin_size(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Edges rounded to whole pixels: `(left, top, width, height)`.
    ///
    /// Width and height are at least 1.
    pub fn to_pixels(&self) -> (i64, i64, u32, u32) {
        let left = self.left.round() as i64;
        let top = self.top.round() as i64;
        let right = self.right.round() as i64;
        let bottom = self.bottom.round() as i64;
        let width = (right - left).max(1) as u32;
        let height = (bottom - top).max(1) as u32;
        (left, top, width, height)
    }
}

/// Crop `image` to `crop`, padding anything outside the source.
pub fn apply_crop(image: &DecodedImage, crop: &CropBox) -> DecodedImage {
    let (left, top, width, height) = crop.to_pixels();

    if left == 0 && top == 0 && width == image.width && height == image.height {
        return image.clone();
    }

    let mut output = DecodedImage::filled(width, height, FILL_COLOR);
    // Pasting the source at the negated origin copies exactly the overlap.
    output.paste(image, -left, -top);
    output
}

/// Crop `image` to `crop` and resample the result to `width x height`.
///
/// Equivalent to `apply_crop` followed by `resize`, except that only the
/// overlapping part of the box is resampled. It lands in the proportional
/// sub-rectangle of a fill-colored output.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for a zero output size.
pub fn crop_to_size(
    image: &DecodedImage,
    crop: &CropBox,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }
    let (left, top, box_w, box_h) = crop.to_pixels();
    let mut output = DecodedImage::filled(width, height, FILL_COLOR);

    let (x0, x1) = (left.max(0), (left + box_w as i64).min(image.width as i64));
    let (y0, y1) = (top.max(0), (top + box_h as i64).min(image.height as i64));
    if x0 >= x1 || y0 >= y1 {
        return Ok(output);
    }

    // Overlap edges in output pixels
    let sx = width as f64 / box_w as f64;
    let sy = height as f64 / box_h as f64;
    let tx0 = ((x0 - left) as f64 * sx).round() as i64;
    let tx1 = ((x1 - left) as f64 * sx).round() as i64;
    let ty0 = ((y0 - top) as f64 * sy).round() as i64;
    let ty1 = ((y1 - top) as f64 * sy).round() as i64;
    if tx0 >= tx1 || ty0 >= ty1 {
        return Ok(output);
    }

    let overlap = apply_crop(
        image,
        &CropBox {
            left: x0 as f64,
            top: y0 as f64,
            right: x1 as f64,
            bottom: y1 as f64,
        },
    );
    let scaled = resize(&overlap, (tx1 - tx0) as u32, (ty1 - ty0) as u32, filter)?;
    output.paste(&scaled, tx0, ty0);
    Ok(output)
}
