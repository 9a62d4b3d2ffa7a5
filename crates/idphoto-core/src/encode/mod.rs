//! Image encoding for the printable sheet.
//!
//! The sheet is written as a baseline JPEG whose JFIF header carries the
//! print resolution, so printing software sizes it at the intended
//! physical dimensions.
//!
//! ```ignore
//! use idphoto_core::encode::encode_jpeg;
//!
//! let pixels = vec![255u8; 1772 * 1181 * 3]; // blank sheet
//! let jpeg_bytes = encode_jpeg(&pixels, 1772, 1181, 95, 300).unwrap();
//! ```

mod jpeg;

pub use jpeg::{encode_jpeg, encode_jpeg_image, EncodeError};
