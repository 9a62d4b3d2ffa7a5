//! Image rotation with expand-to-fit semantics.
//!
//! Three interpolation methods are available:
//! - **Nearest**: used for the interactive preview, where speed matters more
//!   than smoothness
//! - **Bilinear**: general purpose
//! - **Lanczos3**: used on the full-resolution original when the sheet is saved
//!
//! # Algorithm
//!
//! The rotation uses inverse mapping in pixel-center coordinates: for each
//! output pixel center we compute the source position and sample it.
//!
//! ```text
//! src_x = (dst_x - dst_cx) * cos(θ) - (dst_y - dst_cy) * sin(θ) + src_cx
//! src_y = (dst_x - dst_cx) * sin(θ) + (dst_y - dst_cy) * cos(θ) + src_cy
//! ```
//!
//! Output pixels that map outside the source are filled with black.

use crate::decode::DecodedImage;

/// Interpolation filter for rotation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationFilter {
    /// Nearest-neighbour sampling - interactive preview.
    Nearest,
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation - export.
    Lanczos3,
}

/// Fill used for output pixels not covered by the rotated source.
pub const FILL_COLOR: [u8; 3] = [0, 0, 0];

/// Compute the dimensions of the bounding box for a rotated image.
///
/// `new_w = |w*cos| + |h*sin|`, `new_h = |w*sin| + |h*cos|`, rounded, never
/// smaller than 1x1. Multiples of 90° are handled exactly.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    let abs_angle = (angle_degrees % 360.0).abs();

    if abs_angle < 0.001 || (360.0 - abs_angle) < 0.001 || (abs_angle - 180.0).abs() < 0.001 {
        return (width, height);
    }
    if (abs_angle - 90.0).abs() < 0.001 || (abs_angle - 270.0).abs() < 0.001 {
        return (height, width);
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate an image around its center, expanding the canvas to fit.
///
/// Positive angles rotate counter-clockwise. Angles within 0.001° of zero
/// return a copy of the input.
pub fn apply_rotation(
    image: &DecodedImage,
    angle_degrees: f64,
    filter: InterpolationFilter,
) -> DecodedImage {
    if angle_degrees.abs() < 0.001 || image.is_empty() {
        return image.clone();
    }

    let (dst_w, dst_h) = compute_rotated_bounds(image.width, image.height, angle_degrees);

    // With y pointing down this inverse map turns content counter-clockwise
    // for positive angles.
    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = image.width as f64 / 2.0;
    let src_cy = image.height as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = Vec::with_capacity(dst_w as usize * dst_h as usize * 3);

    for dst_y in 0..dst_h {
        let dy = dst_y as f64 + 0.5 - dst_cy;
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 + 0.5 - dst_cx;

            // Continuous source position, shifted back to pixel-index space
            let src_x = dx * cos - dy * sin + src_cx - 0.5;
            let src_y = dx * sin + dy * cos + src_cy - 0.5;

            let pixel = sample(image, src_x, src_y, filter).unwrap_or(FILL_COLOR);
            output.extend_from_slice(&pixel);
        }
    }

    DecodedImage::new(dst_w, dst_h, output)
}

/// Rotate an image a quarter turn clockwise. Width and height swap exactly.
pub fn rotate_quarter_clockwise(image: &DecodedImage) -> DecodedImage {
    let (w, h) = (image.width as usize, image.height as usize);
    let mut output = vec![0u8; w * h * 3];

    // Source (x, y) lands at (h - 1 - y, x) in a canvas h pixels wide.
    for y in 0..h {
        for x in 0..w {
            let src_idx = (y * w + x) * 3;
            let dst_idx = (x * h + (h - 1 - y)) * 3;
            output[dst_idx..dst_idx + 3].copy_from_slice(&image.pixels[src_idx..src_idx + 3]);
        }
    }

    DecodedImage::new(image.height, image.width, output)
}

/// Sample `image` at a continuous pixel-index position, or `None` when the
/// position falls outside the image.
pub(crate) fn sample(
    image: &DecodedImage,
    x: f64,
    y: f64,
    filter: InterpolationFilter,
) -> Option<[u8; 3]> {
    if image.is_empty() || !inside(image, x, y) {
        return None;
    }
    Some(match filter {
        InterpolationFilter::Nearest => sample_nearest(image, x, y),
        InterpolationFilter::Bilinear => sample_bilinear(image, x, y),
        InterpolationFilter::Lanczos3 => sample_lanczos3(image, x, y),
    })
}

#[inline]
fn inside(image: &DecodedImage, x: f64, y: f64) -> bool {
    x >= -0.5 && y >= -0.5 && x < image.width as f64 - 0.5 && y < image.height as f64 - 0.5
}

#[inline]
fn get_pixel_f64(image: &DecodedImage, px: usize, py: usize) -> [f64; 3] {
    let idx = (py * image.width as usize + px) * 3;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
    ]
}

fn sample_nearest(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    if !inside(image, x, y) {
        return FILL_COLOR;
    }
    let px = (x.round().max(0.0) as u32).min(image.width - 1);
    let py = (y.round().max(0.0) as u32).min(image.height - 1);
    image.pixel(px, py).unwrap_or(FILL_COLOR)
}

/// Bilinear sampling over the 4 nearest pixels, clamping the neighbourhood
/// at the image border.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    if !inside(image, x, y) {
        return FILL_COLOR;
    }

    let max_x = image.width as f64 - 1.0;
    let max_y = image.height as f64 - 1.0;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(image.width as usize - 1);
    let y1 = (y0 + 1).min(image.height as usize - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Lanczos3 sampling over a 6x6 neighbourhood. Falls back to bilinear where
/// the kernel would leave the image.
fn sample_lanczos3(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let (w, h) = (image.width as i64, image.height as i64);

    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;

            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);
            let pixel = get_pixel_f64(image, px as usize, py as usize);
            for i in 0..3 {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 3];
    if weight_sum > 0.0 {
        for i in 0..3 {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    result
}

/// `L(x) = sinc(x) * sinc(x/a)` for `|x| < a`, zero outside.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
