//! ID Photo Core - ID photo editing library
//!
//! This crate provides the core functionality for cropping photographs into
//! the 35x45 mm ID format: decoding, the pan/zoom/rotate viewport, overlay
//! guides, the two-slot editor, and composition of the printable sheet.

pub mod config;
pub mod decode;
pub mod editor;
pub mod encode;
pub mod error;
pub mod overlay;
pub mod photo;
pub mod sheet;
pub mod transform;
pub mod viewport;

pub use config::{mm_to_px, ConfigError, EditorConfig, PrintLayout};
pub use decode::{decode_image, is_supported_path, DecodeError, DecodedImage};
pub use editor::{EditorSnapshot, PhotoSlotEditor, SlotId};
pub use encode::{encode_jpeg, EncodeError};
pub use error::{EditorError, Result};
pub use overlay::{OverlayGuides, INSTRUCTIONS};
pub use photo::{PhotoState, SlotSnapshot};
pub use transform::{
    apply_crop, apply_rotation, compute_rotated_bounds, crop_to_size, CropBox, InterpolationFilter,
};
pub use viewport::{Stage, ViewTransform};
