//! ID Photo WASM - WebAssembly bindings for the ID photo editor
//!
//! This crate exposes the idphoto-core editor to JavaScript/TypeScript
//! front ends.
//!
//! # Module Structure
//!
//! - `editor` - The two-slot editor (`JsPhotoEditor`)
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsPhotoEditor, is_supported_file } from '@idphoto/wasm';
//!
//! await init();
//!
//! if (is_supported_file(file.name)) {
//!   editor.load(new Uint8Array(await file.arrayBuffer()));
//! }
//! ```

use std::path::Path;

use wasm_bindgen::prelude::*;

mod editor;
mod types;

pub use editor::JsPhotoEditor;
pub use types::JsDecodedImage;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Whether a file name carries one of the accepted image extensions
/// (jpg, jpeg, png, webp, bmp; case-insensitive).
#[wasm_bindgen]
pub fn is_supported_file(name: &str) -> bool {
    idphoto_core::is_supported_path(Path::new(name))
}

/// Instructions text to show next to the viewport.
#[wasm_bindgen]
pub fn instructions() -> String {
    idphoto_core::INSTRUCTIONS.to_string()
}
