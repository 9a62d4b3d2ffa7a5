//! Compliance guides drawn over the viewport.
//!
//! The guides are fixed in screen space: the crop frame, shading outside it,
//! and two face-height ellipses (outer = maximum, inner = minimum) that the
//! subject's chin-to-crown should fall between.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;
use crate::viewport::{ScreenRect, Stage};

pub const FRAME_COLOR: [u8; 3] = [255, 255, 255];
pub const FACE_MAX_COLOR: [u8; 3] = [255, 0, 0];
pub const FACE_MIN_COLOR: [u8; 3] = [0, 255, 255];
pub const FACE_LABEL: &str = "Face Limit (Red=Max, Cyan=Min)";
pub const INSTRUCTIONS: &str =
    "Scroll or use Slider to ZOOM. Drag to MOVE.\nFit face between red lines (Chin to Top of Head).";

const LINE_WIDTH: i32 = 2;
/// Dash pattern for the face guides: pixels on, pixels off.
const DASH: (f64, f64) = (4.0, 4.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayGuides {
    pub frame: ScreenRect,
    /// Top, bottom, left and right regions outside the frame.
    pub shade: [ScreenRect; 4],
    pub face_max: Ellipse,
    pub face_min: Ellipse,
    pub label: String,
    pub label_x: f64,
    pub label_y: f64,
}

impl OverlayGuides {
    pub fn new(stage: &Stage) -> Self {
        let frame = stage.frame;
        let vw = stage.viewport_width as f64;
        let vh = stage.viewport_height as f64;

        let shade = [
            ScreenRect::new(0.0, 0.0, vw, frame.y.max(0.0)),
            ScreenRect::new(0.0, frame.bottom(), vw, (vh - frame.bottom()).max(0.0)),
            ScreenRect::new(0.0, frame.y, frame.x.max(0.0), frame.height),
            ScreenRect::new(frame.right(), frame.y, (vw - frame.right()).max(0.0), frame.height),
        ];

        // Whole-pixel center and radii, matching the frame's own rounding.
        let cx = frame.x + (stage.layout.photo_width / 2) as f64;
        let cy = frame.y + (stage.layout.photo_height / 2) as f64;
        let rx = (stage.face_width / 2) as f64;

        Self {
            frame,
            shade,
            face_max: Ellipse {
                cx,
                cy,
                rx,
                ry: (stage.face_max_height / 2) as f64,
            },
            face_min: Ellipse {
                cx,
                cy,
                rx,
                ry: (stage.face_min_height / 2) as f64,
            },
            label: FACE_LABEL.to_string(),
            label_x: cx,
            label_y: cy,
        }
    }

    /// Paint the guides onto a viewport-sized frame.
    ///
    /// The label is left to the UI, which owns font rendering.
    pub fn draw(&self, canvas: &mut DecodedImage) {
        for rect in &self.shade {
            darken(canvas, rect);
        }

        let Some(mut img) = canvas.to_rgb_image() else {
            return;
        };
        outline_rect(&mut img, &self.frame, Rgb(FRAME_COLOR));
        dashed_ellipse(&mut img, &self.face_max, Rgb(FACE_MAX_COLOR));
        dashed_ellipse(&mut img, &self.face_min, Rgb(FACE_MIN_COLOR));
        *canvas = DecodedImage::from_rgb_image(img);
    }
}

fn pixel_span(start: f64, len: f64, limit: u32) -> std::ops::Range<u32> {
    let lo = start.round().max(0.0) as u32;
    let hi = (start + len).round().clamp(0.0, limit as f64) as u32;
    lo.min(hi)..hi
}

/// Halve every channel inside `rect`.
fn darken(canvas: &mut DecodedImage, rect: &ScreenRect) {
    let width = canvas.width as usize;
    for y in pixel_span(rect.y, rect.height, canvas.height) {
        for x in pixel_span(rect.x, rect.width, canvas.width) {
            let idx = (y as usize * width + x as usize) * 3;
            for v in &mut canvas.pixels[idx..idx + 3] {
                *v /= 2;
            }
        }
    }
}

/// A `LINE_WIDTH` outline straddling the rectangle's edges.
fn outline_rect(img: &mut RgbImage, rect: &ScreenRect, color: Rgb<u8>) {
    let x = rect.x.round() as i32;
    let y = rect.y.round() as i32;
    let width = rect.width.round() as i32;
    let height = rect.height.round() as i32;

    for inset in 0..LINE_WIDTH {
        let grow = LINE_WIDTH / 2 - inset;
        let ring = Rect::at(x - grow, y - grow).of_size(
            (width + 2 * grow).max(1) as u32,
            (height + 2 * grow).max(1) as u32,
        );
        draw_hollow_rect_mut(img, ring, color);
    }
}

/// Walk the ellipse in roughly one-pixel steps, drawing the "on" parts of
/// the dash pattern as short segments.
fn dashed_ellipse(img: &mut RgbImage, e: &Ellipse, color: Rgb<u8>) {
    if e.rx <= 0.0 || e.ry <= 0.0 {
        return;
    }
    // Ramanujan's approximation of the perimeter
    let h = ((e.rx - e.ry) / (e.rx + e.ry)).powi(2);
    let perimeter =
        std::f64::consts::PI * (e.rx + e.ry) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()));
    let steps = perimeter.ceil().max(8.0) as usize;
    let period = DASH.0 + DASH.1;

    // Point `i` of the path, on a ring shrunk by `inset` pixels
    let point = |i: usize, inset: f64| {
        let t = i as f64 / steps as f64 * std::f64::consts::TAU;
        (
            (e.cx + (e.rx - inset) * t.cos()) as f32,
            (e.cy + (e.ry - inset) * t.sin()) as f32,
        )
    };

    let mut travelled = 0.0;
    for i in 0..steps {
        let (start, end) = (point(i, 0.0), point(i + 1, 0.0));
        if travelled % period < DASH.0 {
            draw_line_segment_mut(img, start, end, color);
            for inset in 1..LINE_WIDTH {
                let inset = inset as f64;
                draw_line_segment_mut(img, point(i, inset), point(i + 1, inset), color);
            }
        }
        travelled += ((end.0 - start.0) as f64).hypot((end.1 - start.1) as f64);
    }
}
