//! Editor bindings.
//!
//! `JsPhotoEditor` wraps the core two-slot editor. A browser UI forwards
//! pointer, wheel and slider events here, draws the returned viewport frames,
//! and asks for the sheet bytes when the user saves.
//!
//! # Example
//!
//! ```typescript
//! import { JsPhotoEditor } from '@idphoto/wasm';
//!
//! const editor = new JsPhotoEditor();
//! editor.load(new Uint8Array(await file.arrayBuffer()));
//! editor.set_zoom(150);
//! const frame = editor.render_viewport();
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(frame.rgba()), frame.width), 0, 0);
//!
//! if (editor.can_save()) {
//!   const jpeg = editor.export_sheet();
//! }
//! ```

use std::fmt::Display;

use idphoto_core::{EditorConfig, PhotoSlotEditor, SlotId};
use wasm_bindgen::prelude::*;

use crate::types::JsDecodedImage;

/// Convert an error to a `JsValue`, reporting it on the browser console.
pub(crate) fn to_js_error(err: impl Display) -> JsValue {
    let message = err.to_string();
    let value = JsValue::from_str(&message);
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&value);
    value
}

/// Slot numbers as a UI labels them: 1 and 2.
fn slot_from_number(number: u8) -> Option<SlotId> {
    number
        .checked_sub(1)
        .and_then(|index| SlotId::from_index(index as usize))
}

fn slot_number(slot: SlotId) -> u8 {
    slot.index() as u8 + 1
}

#[wasm_bindgen]
pub struct JsPhotoEditor {
    inner: PhotoSlotEditor,
}

impl Default for JsPhotoEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsPhotoEditor {
    /// Create an editor with the default 35x45 mm, 300 DPI configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsPhotoEditor {
        JsPhotoEditor {
            inner: PhotoSlotEditor::default(),
        }
    }

    /// Create an editor from a configuration object. Missing fields take
    /// their defaults.
    pub fn with_config(config: JsValue) -> Result<JsPhotoEditor, JsValue> {
        let config: EditorConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| to_js_error(format!("Invalid config: {}", e)))?;
        let inner = PhotoSlotEditor::new(config).map_err(to_js_error)?;
        Ok(JsPhotoEditor { inner })
    }

    /// Select slot 1 or 2.
    pub fn select_slot(&mut self, number: u8) -> Result<(), JsValue> {
        let slot = slot_from_number(number)
            .ok_or_else(|| to_js_error(format!("No slot {}", number)))?;
        self.inner.select_slot(slot);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn active_slot(&self) -> u8 {
        slot_number(self.inner.active_slot())
    }

    /// Decode file bytes into the active slot.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.inner.load_bytes(bytes).map_err(to_js_error)
    }

    pub fn rotate_90(&mut self) -> Result<(), JsValue> {
        self.inner.rotate_90().map_err(to_js_error)
    }

    pub fn set_angle(&mut self, degrees: f64) {
        self.inner.set_angle(degrees);
    }

    pub fn set_zoom(&mut self, value: f64) {
        self.inner.set_zoom(value);
    }

    pub fn wheel(&mut self, delta: f64) {
        self.inner.wheel(delta);
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.inner.pointer_down(x, y);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.inner.pointer_move(x, y);
    }

    pub fn pointer_up(&mut self) {
        self.inner.pointer_up();
    }

    pub fn render_viewport(&self) -> JsDecodedImage {
        JsDecodedImage::from_decoded(self.inner.render_viewport())
    }

    /// Overlay geometry (frame, shading, face ellipses, label) as a plain
    /// object, for UIs that draw the guides themselves.
    pub fn overlay(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.guides()).map_err(to_js_error)
    }

    /// Per-slot state for resyncing sliders after a slot switch.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.snapshot()).map_err(to_js_error)
    }

    pub fn can_save(&self) -> bool {
        self.inner.can_save()
    }

    /// Encode the print sheet as JPEG bytes.
    pub fn export_sheet(&self) -> Result<Vec<u8>, JsValue> {
        self.inner.encode_sheet().map_err(to_js_error)
    }
}
