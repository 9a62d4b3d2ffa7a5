//! Geometric image operations: rotation and cropping.
//!
//! # Transform Order
//!
//! Both the interactive preview and the save path apply operations in the
//! same order, which is what lets preview coordinates scale up to the
//! full-resolution image by a single ratio:
//! 1. Rotation by the slider angle (expand-to-fit)
//! 2. Scale (viewport zoom, or preview ratio on save)
//! 3. Crop to the frame
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = counter-clockwise
//! - Crop boxes are in pixel coordinates of the rotated image
//! - Origin is top-left corner

mod crop;
mod rotation;

pub use crop::{apply_crop, crop_to_size, CropBox};
pub(crate) use rotation::sample;
pub use rotation::{
    apply_rotation, compute_rotated_bounds, rotate_quarter_clockwise, InterpolationFilter,
    FILL_COLOR,
};
