//! Per-slot editing state.
//!
//! A `PhotoState` owns one loaded photograph (full resolution plus a
//! downscaled preview) and the `ViewTransform` that places the preview in the
//! viewport. All interaction handlers live here; the editor only decides
//! which slot receives them.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::decode::{decode_image, resize_to_fit, DecodeError, DecodedImage, FilterType};
use crate::overlay::OverlayGuides;
use crate::transform::{
    apply_rotation, crop_to_size, rotate_quarter_clockwise, sample, InterpolationFilter,
};
use crate::viewport::{Stage, ViewTransform};

/// Viewport background (#333333).
pub const BACKGROUND_COLOR: [u8; 3] = [0x33, 0x33, 0x33];

/// A decoded photograph and its interactive preview.
#[derive(Debug, Clone)]
pub struct LoadedPhoto {
    original: DecodedImage,
    preview: DecodedImage,
    /// `original` longest edge over `preview` longest edge, at least 1.0.
    preview_ratio: f64,
}

impl LoadedPhoto {
    fn new(original: DecodedImage, preview_max_edge: u32) -> Result<Self, DecodeError> {
        if original.is_empty() {
            return Err(DecodeError::InvalidFormat);
        }
        let preview = resize_to_fit(&original, preview_max_edge, FilterType::Bilinear)?;
        let preview_ratio = original.longest_edge() as f64 / preview.longest_edge().max(1) as f64;

        Ok(Self {
            original,
            preview,
            preview_ratio,
        })
    }

    pub fn original(&self) -> &DecodedImage {
        &self.original
    }

    pub fn preview(&self) -> &DecodedImage {
        &self.preview
    }

    pub fn preview_ratio(&self) -> f64 {
        self.preview_ratio
    }
}

/// One slot of the editor. Empty until a photo is loaded; every handler is a
/// no-op on an empty slot.
#[derive(Debug, Clone, Default)]
pub struct PhotoState {
    photo: Option<LoadedPhoto>,
    transform: ViewTransform,
}

impl PhotoState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_image(&self) -> bool {
        self.photo.is_some()
    }

    pub fn photo(&self) -> Option<&LoadedPhoto> {
        self.photo.as_ref()
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    /// Replace this slot's photo and fit it to the stage.
    ///
    /// The slot is only modified once the preview has been generated, so a
    /// failure leaves the previous photo and transform in place.
    pub fn load(&mut self, original: DecodedImage, stage: &Stage) -> Result<(), DecodeError> {
        let (width, height) = (original.width, original.height);
        self.install(original, stage)?;
        info!(width, height, "Photo loaded");
        Ok(())
    }

    /// Decode `bytes` and load the result.
    pub fn load_bytes(&mut self, bytes: &[u8], stage: &Stage) -> Result<(), DecodeError> {
        let original = decode_image(bytes)?;
        self.load(original, stage)
    }

    fn install(&mut self, original: DecodedImage, stage: &Stage) -> Result<(), DecodeError> {
        let photo = LoadedPhoto::new(original, stage.preview_max_edge)?;
        let transform = ViewTransform::fit(photo.preview.width, photo.preview.height, stage);

        debug!(
            preview_width = photo.preview.width,
            preview_height = photo.preview.height,
            preview_ratio = photo.preview_ratio,
            scale = transform.scale,
            "Preview fitted"
        );

        self.photo = Some(photo);
        self.transform = transform;
        Ok(())
    }

    /// Bake a clockwise quarter turn into the original, then re-fit.
    ///
    /// Resets the continuous angle to 0 and the zoom slider to 100.
    pub fn rotate_90(&mut self, stage: &Stage) -> Result<(), DecodeError> {
        let Some(photo) = &self.photo else {
            return Ok(());
        };
        let rotated = rotate_quarter_clockwise(&photo.original);
        let (width, height) = (rotated.width, rotated.height);
        self.install(rotated, stage)?;
        info!(width, height, "Photo rotated 90 degrees clockwise");
        Ok(())
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        if self.has_image() {
            self.transform.pan(dx, dy);
        }
    }

    pub fn set_zoom(&mut self, value: f64, stage: &Stage) {
        if self.has_image() {
            self.transform.set_zoom(value, stage);
        }
    }

    pub fn wheel(&mut self, delta: f64, stage: &Stage) {
        if self.has_image() {
            self.transform.wheel(delta, stage);
        }
    }

    pub fn set_angle(&mut self, degrees: f64) {
        if self.has_image() {
            self.transform.set_angle(degrees);
        }
    }

    /// Render one viewport frame: background, the rotated and scaled
    /// preview, then the guides.
    pub fn render_viewport(&self, stage: &Stage, guides: &OverlayGuides) -> DecodedImage {
        let mut canvas =
            DecodedImage::filled(stage.viewport_width, stage.viewport_height, BACKGROUND_COLOR);

        if let Some(photo) = &self.photo {
            let rotated = apply_rotation(
                &photo.preview,
                self.transform.angle,
                InterpolationFilter::Nearest,
            );
            self.paint_preview(&mut canvas, &rotated);
        }

        guides.draw(&mut canvas);
        canvas
    }

    /// Inverse-map every viewport pixel into the rotated preview.
    fn paint_preview(&self, canvas: &mut DecodedImage, rotated: &DecodedImage) {
        let t = &self.transform;
        let width = canvas.width as usize;

        for vy in 0..canvas.height {
            for vx in 0..canvas.width {
                let (px, py) = t.screen_to_preview(vx as f64 + 0.5, vy as f64 + 0.5);
                if let Some(rgb) = sample(rotated, px - 0.5, py - 0.5, InterpolationFilter::Bilinear)
                {
                    let idx = (vy as usize * width + vx as usize) * 3;
                    canvas.pixels[idx..idx + 3].copy_from_slice(&rgb);
                }
            }
        }
    }

    /// Produce the final photo at print size from the full-resolution
    /// original. Returns `Ok(None)` for an empty slot.
    pub fn render_crop(&self, stage: &Stage) -> Result<Option<DecodedImage>, DecodeError> {
        let Some(photo) = &self.photo else {
            return Ok(None);
        };

        let rotated = apply_rotation(
            &photo.original,
            self.transform.angle,
            InterpolationFilter::Lanczos3,
        );
        let crop_box = self
            .transform
            .frame_in_source(&stage.frame, photo.preview_ratio);

        debug!(
            left = crop_box.left,
            top = crop_box.top,
            width = crop_box.width(),
            height = crop_box.height(),
            "Crop box in source"
        );

        let photo_size = crop_to_size(
            &rotated,
            &crop_box,
            stage.layout.photo_width,
            stage.layout.photo_height,
            FilterType::Lanczos3,
        )?;
        Ok(Some(photo_size))
    }

    pub fn snapshot(&self) -> SlotSnapshot {
        let t = &self.transform;
        let (width, height) = self
            .photo
            .as_ref()
            .map_or((0, 0), |p| (p.original.width, p.original.height));

        SlotSnapshot {
            has_image: self.has_image(),
            width,
            height,
            zoom: t.zoom,
            angle: t.angle,
            scale: t.scale,
            offset_x: t.offset_x,
            offset_y: t.offset_y,
        }
    }
}

/// Serializable summary of one slot, used by UIs to resync their controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub has_image: bool,
    /// Original dimensions, zero when empty.
    pub width: u32,
    pub height: u32,
    pub zoom: f64,
    pub angle: f64,
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}
