//! Viewport geometry: where the preview sits on screen and how screen
//! coordinates map back into image coordinates.
//!
//! # Coordinate spaces
//!
//! - **screen**: viewport pixels, origin top-left of the viewport
//! - **preview**: pixels of the rotated preview image
//! - **source**: pixels of the rotated full-resolution original
//!
//! `screen = preview * scale + offset` and `source = preview * preview_ratio`.
//! The crop frame is fixed in screen space; inverting both maps gives the
//! crop box in source space.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{mm_to_px, EditorConfig, PrintLayout};
use crate::transform::CropBox;

pub const ZOOM_MIN: f64 = 10.0;
pub const ZOOM_MAX: f64 = 400.0;
/// Slider position that corresponds to `base_scale`.
pub const ZOOM_DEFAULT: f64 = 100.0;
/// Multiplier applied to the zoom slider per wheel notch.
pub const WHEEL_ZOOM_FACTOR: f64 = 1.1;
pub const ANGLE_MIN: f64 = -45.0;
pub const ANGLE_MAX: f64 = 45.0;

/// An axis-aligned rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// The fixed on-screen setting every slot is edited against: viewport size,
/// crop frame and print geometry. Built once from the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub layout: PrintLayout,
    /// Crop frame, centered in the viewport, sized in print pixels.
    pub frame: ScreenRect,
    pub preview_max_edge: u32,
    pub fit_headroom: f64,
    /// Face guide sizes in pixels.
    pub face_width: u32,
    pub face_min_height: u32,
    pub face_max_height: u32,
}

impl Stage {
    pub fn from_config(config: &EditorConfig) -> Self {
        let layout = PrintLayout::from_config(config);

        // Integer halving keeps the frame on whole pixels; the frame may
        // extend past the viewport when it is larger than the screen area.
        let x1 = (config.viewport_width / 2) as i64 - (layout.photo_width / 2) as i64;
        let y1 = (config.viewport_height / 2) as i64 - (layout.photo_height / 2) as i64;

        Self {
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            layout,
            frame: ScreenRect::new(
                x1 as f64,
                y1 as f64,
                layout.photo_width as f64,
                layout.photo_height as f64,
            ),
            preview_max_edge: config.preview_max_edge,
            fit_headroom: config.fit_headroom,
            face_width: mm_to_px(config.face_width_mm, config.dpi),
            face_min_height: mm_to_px(config.face_min_mm, config.dpi),
            face_max_height: mm_to_px(config.face_max_mm, config.dpi),
        }
    }

    pub fn viewport_center(&self) -> (f64, f64) {
        (
            self.viewport_width as f64 / 2.0,
            self.viewport_height as f64 / 2.0,
        )
    }
}

/// Per-slot view parameters: how the rotated preview is placed on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Preview-to-screen scale.
    pub scale: f64,
    /// Scale at zoom slider position 100.
    pub base_scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Continuous rotation in degrees, counter-clockwise positive.
    pub angle: f64,
    /// Zoom slider position in `ZOOM_MIN..=ZOOM_MAX`.
    pub zoom: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            base_scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            angle: 0.0,
            zoom: ZOOM_DEFAULT,
        }
    }
}

impl ViewTransform {
    /// Fit a `preview_width x preview_height` preview so the crop frame is
    /// covered with headroom, and center it in the viewport.
    ///
    /// `scale = max(crop_w / pw, crop_h / ph) * headroom`
    pub fn fit(preview_width: u32, preview_height: u32, stage: &Stage) -> Self {
        let pw = preview_width.max(1) as f64;
        let ph = preview_height.max(1) as f64;

        let scale_w = stage.layout.photo_width as f64 / pw;
        let scale_h = stage.layout.photo_height as f64 / ph;
        let scale = scale_w.max(scale_h) * stage.fit_headroom;

        Self {
            scale,
            base_scale: scale,
            offset_x: (stage.viewport_width as f64 - pw * scale) / 2.0,
            offset_y: (stage.viewport_height as f64 - ph * scale) / 2.0,
            angle: 0.0,
            zoom: ZOOM_DEFAULT,
        }
    }

    /// Move the zoom slider to `value` (clamped), keeping the image point at
    /// the viewport center fixed.
    pub fn set_zoom(&mut self, value: f64, stage: &Stage) {
        if !value.is_finite() {
            return;
        }
        let value = value.clamp(ZOOM_MIN, ZOOM_MAX);
        let (cx, cy) = stage.viewport_center();

        let (img_cx, img_cy) = self.screen_to_preview(cx, cy);

        self.zoom = value;
        self.scale = value / 100.0 * self.base_scale;
        self.offset_x = cx - img_cx * self.scale;
        self.offset_y = cy - img_cy * self.scale;

        debug!(zoom = value, scale = self.scale, "Zoom changed");
    }

    /// Apply one wheel gesture: positive zooms in, negative zooms out, zero
    /// is ignored. Goes through `set_zoom` so the slider stays the single
    /// source of truth.
    pub fn wheel(&mut self, delta: f64, stage: &Stage) {
        if delta > 0.0 {
            self.set_zoom(self.zoom * WHEEL_ZOOM_FACTOR, stage);
        } else if delta < 0.0 {
            self.set_zoom(self.zoom / WHEEL_ZOOM_FACTOR, stage);
        }
    }

    /// Translate the image by a pointer delta. Unbounded.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Set the continuous rotation (clamped to the slider range).
    pub fn set_angle(&mut self, degrees: f64) {
        if !degrees.is_finite() {
            return;
        }
        self.angle = degrees.clamp(ANGLE_MIN, ANGLE_MAX);
        debug!(angle = self.angle, "Rotation changed");
    }

    pub fn screen_to_preview(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.offset_x) / self.scale, (y - self.offset_y) / self.scale)
    }

    /// The crop frame expressed in rotated-preview coordinates.
    pub fn frame_in_preview(&self, frame: &ScreenRect) -> CropBox {
        let (x, y) = self.screen_to_preview(frame.x, frame.y);
        CropBox::from_origin_size(x, y, frame.width / self.scale, frame.height / self.scale)
    }

    /// The crop frame expressed in rotated full-resolution coordinates.
    pub fn frame_in_source(&self, frame: &ScreenRect, preview_ratio: f64) -> CropBox {
        let b = self.frame_in_preview(frame);
        CropBox {
            left: b.left * preview_ratio,
            top: b.top * preview_ratio,
            right: b.right * preview_ratio,
            bottom: b.bottom * preview_ratio,
        }
    }
}

/// Turns press/move/release pointer positions into pan deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    last: Option<(f64, f64)>,
}

impl DragState {
    pub fn press(&mut self, x: f64, y: f64) {
        self.last = Some((x, y));
    }

    /// Returns the delta since the previous position while the pointer is held.
    pub fn motion(&mut self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (lx, ly) = self.last?;
        self.last = Some((x, y));
        Some((x - lx, y - ly))
    }

    pub fn release(&mut self) {
        self.last = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stage() -> Stage {
        Stage::from_config(&EditorConfig::default())
    }

    #[test]
    fn test_stage_frame_is_centered() {
        let s = stage();
        // 600/2 - 413/2 = 94, 500/2 - 531/2 = -15
        assert_eq!(s.frame, ScreenRect::new(94.0, -15.0, 413.0, 531.0));
        assert_eq!(s.viewport_center(), (300.0, 250.0));
        assert_eq!((s.face_width, s.face_min_height, s.face_max_height), (283, 378, 425));
    }

    #[test]
    fn test_fit_covers_frame_with_headroom() {
        let s = stage();
        let t = ViewTransform::fit(1000, 750, &s);

        let expected = (531.0 / 750.0) * 1.5;
        assert_relative_eq!(t.scale, expected);
        assert_relative_eq!(t.base_scale, expected);
        assert_relative_eq!(t.offset_x, (600.0 - 1000.0 * expected) / 2.0);
        assert_relative_eq!(t.offset_y, (500.0 - 750.0 * expected) / 2.0);
        assert_eq!(t.zoom, 100.0);
        assert_eq!(t.angle, 0.0);

        // The scaled preview covers the frame on both axes
        assert!(1000.0 * t.scale >= 413.0);
        assert!(750.0 * t.scale >= 531.0);
    }

    #[test]
    fn test_zoom_scales_from_base() {
        let s = stage();
        let mut t = ViewTransform::fit(400, 600, &s);
        t.set_zoom(200.0, &s);
        assert_relative_eq!(t.scale, 2.0 * t.base_scale);
        t.set_zoom(10.0, &s);
        assert_relative_eq!(t.scale, 0.1 * t.base_scale);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let s = stage();
        let mut t = ViewTransform::fit(400, 600, &s);
        t.set_zoom(1000.0, &s);
        assert_eq!(t.zoom, ZOOM_MAX);
        t.set_zoom(1.0, &s);
        assert_eq!(t.zoom, ZOOM_MIN);
        t.set_zoom(f64::NAN, &s);
        assert_eq!(t.zoom, ZOOM_MIN);
    }

    #[test]
    fn test_zoom_round_trip_restores_fit() {
        let s = stage();
        let fitted = ViewTransform::fit(800, 533, &s);
        let mut t = fitted;

        t.set_zoom(250.0, &s);
        t.set_zoom(37.0, &s);
        t.set_zoom(100.0, &s);

        assert_relative_eq!(t.scale, fitted.base_scale, epsilon = 1e-12);
        assert_relative_eq!(t.offset_x, fitted.offset_x, epsilon = 1e-9);
        assert_relative_eq!(t.offset_y, fitted.offset_y, epsilon = 1e-9);
    }

    #[test]
    fn test_wheel_steps_through_slider() {
        let s = stage();
        let mut t = ViewTransform::fit(400, 600, &s);

        t.wheel(1.0, &s);
        assert_relative_eq!(t.zoom, 110.0, epsilon = 1e-9);
        t.wheel(-3.0, &s);
        assert_relative_eq!(t.zoom, 100.0, epsilon = 1e-9);
        t.wheel(0.0, &s);
        assert_relative_eq!(t.zoom, 100.0, epsilon = 1e-9);
        assert_relative_eq!(t.scale, t.base_scale * t.zoom / 100.0);

        for _ in 0..100 {
            t.wheel(1.0, &s);
        }
        assert_eq!(t.zoom, ZOOM_MAX);
        for _ in 0..100 {
            t.wheel(-1.0, &s);
        }
        assert_eq!(t.zoom, ZOOM_MIN);
    }

    #[test]
    fn test_pan_is_unbounded() {
        let mut t = ViewTransform::default();
        t.pan(-5000.0, 12.5);
        t.pan(1.0, 1.0);
        assert_eq!((t.offset_x, t.offset_y), (-4999.0, 13.5));
    }

    #[test]
    fn test_angle_is_clamped() {
        let mut t = ViewTransform::default();
        t.set_angle(12.5);
        assert_eq!(t.angle, 12.5);
        t.set_angle(90.0);
        assert_eq!(t.angle, ANGLE_MAX);
        t.set_angle(-90.0);
        assert_eq!(t.angle, ANGLE_MIN);
    }

    #[test]
    fn test_frame_in_source_scales_by_ratio() {
        let t = ViewTransform {
            scale: 2.0,
            base_scale: 2.0,
            offset_x: -100.0,
            offset_y: 50.0,
            angle: 0.0,
            zoom: 100.0,
        };
        let frame = ScreenRect::new(94.0, -15.0, 413.0, 531.0);

        let b = t.frame_in_preview(&frame);
        assert_relative_eq!(b.left, 97.0);
        assert_relative_eq!(b.top, -32.5);
        assert_relative_eq!(b.width(), 206.5);
        assert_relative_eq!(b.height(), 265.5);

        let src = t.frame_in_source(&frame, 3.0);
        assert_relative_eq!(src.left, 291.0);
        assert_relative_eq!(src.top, -97.5);
        assert_relative_eq!(src.width(), 619.5);
        assert_relative_eq!(src.height(), 796.5);
    }

    #[test]
    fn test_drag_state() {
        let mut drag = DragState::default();
        assert_eq!(drag.motion(5.0, 5.0), None);

        drag.press(10.0, 10.0);
        assert!(drag.is_dragging());
        assert_eq!(drag.motion(15.0, 7.0), Some((5.0, -3.0)));
        assert_eq!(drag.motion(15.0, 9.0), Some((0.0, 2.0)));

        drag.release();
        assert!(!drag.is_dragging());
        assert_eq!(drag.motion(20.0, 20.0), None);
    }
}
