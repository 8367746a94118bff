//! Pixel region redaction
//!
//! Decodes the pixel data of a record, zeroes the rows above the
//! ultrasound region in every frame and stores the result back as
//! native pixel data.

mod apply;
mod decode;
mod encode;

pub use apply::redact_rows;
pub use decode::{decode_pixels, PixelStorage};
pub use encode::store_pixels;

use crate::error::Result;
use crate::extraction::redaction_offset;
use crate::types::{PixelBuffer, SubKind};
use dicom_object::{FileDicomObject, InMemDicomObject};
use log::debug;

/// Outcome of redacting one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redaction {
    /// Requested redaction boundary
    pub y0: u32,
    /// Rows actually zeroed in each frame
    pub rows_zeroed: u32,
    /// Redacted raster, as stored back into the record
    pub buffer: PixelBuffer,
}

/// Redacts the pixel data of a record in place
///
/// # Errors
///
/// Fails with `UnsupportedEncoding` or `DecodeFailure` when the pixel
/// data cannot be decoded. The record is left untouched in that case.
pub fn redact(
    obj: &mut FileDicomObject<InMemDicomObject>,
    sub_kind: SubKind,
    fallback_y0: u32,
) -> Result<Redaction> {
    let y0 = redaction_offset(obj, sub_kind, fallback_y0);
    let (mut buffer, storage) = decode_pixels(obj)?;

    let rows_zeroed = redact_rows(&mut buffer, y0);
    debug!(
        "Zeroed {} rows in each of {} frames of {}",
        rows_zeroed,
        buffer.frames(),
        buffer
    );

    store_pixels(obj, &buffer, storage)?;
    Ok(Redaction {
        y0,
        rows_zeroed,
        buffer,
    })
}
