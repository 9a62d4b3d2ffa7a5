//! Image decoding and preview generation.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG, WebP and BMP files to RGB with EXIF orientation applied
//! - Checking file names against the loader's extension allow-list
//! - Resizing for previews and for the final photo resample
//!
//! All operations are synchronous. A failed decode never yields a partial
//! image, so callers can commit state only after `decode_image` returns `Ok`.

mod raster;
mod resize;
mod types;

pub use raster::{decode_image, ensure_supported_path, is_supported_path, SUPPORTED_EXTENSIONS};
pub use resize::{calculate_fit_dimensions, resize, resize_to_fit};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
