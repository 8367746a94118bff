//! Core type definitions for ultrasound de-identification
//!
//! This module provides the fundamental types used throughout the sonoscrub library:
//! - [`MediaKind`]: Media kind from the SOP class UID (single image, multi-frame, other)
//! - [`SubKind`]: Sub-kind from the SOP class description (video, secondary, image)
//! - [`Classification`]: Both signals together, with the eligibility rule
//! - [`PixelBuffer`]: Decoded raster mutated by redaction
//! - [`DeidConfig`]: Configuration for a de-identification batch

mod config;
mod enums;
mod pixel_buffer;

pub use config::{DeidConfig, DEFAULT_FALLBACK_Y0, DEFAULT_PREVIEW_DIR};
pub use enums::{Classification, MediaKind, SubKind};
pub use pixel_buffer::PixelBuffer;
