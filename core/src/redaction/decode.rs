use crate::error::{DeidError, Result};
use crate::extraction::tags::{
    get_int_value, get_u16_value, get_u32_value, BITS_ALLOCATED, COLUMNS, NUMBER_OF_FRAMES,
    PIXEL_DATA, PLANAR_CONFIGURATION, ROWS, SAMPLES_PER_PIXEL,
};
use crate::types::PixelBuffer;
use dicom_core::value::Value;
use dicom_encoding::transfer_syntax::TransferSyntaxIndex;
use dicom_object::{FileDicomObject, InMemDicomObject};
use dicom_pixeldata::PixelDecoder;
use dicom_transfer_syntax_registry::TransferSyntaxRegistry;
use log::debug;

/// Where the pixel data of a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelStorage {
    /// Uncompressed samples stored in the element value
    Native,
    /// Compressed fragments that had to be decoded
    Encapsulated,
}

/// Decodes the pixel data of a record into an editable buffer
///
/// Native pixel data is read as raw bytes. Encapsulated pixel data is
/// decompressed with `dicom-pixeldata`.
///
/// # Errors
///
/// - `UnsupportedEncoding` if the transfer syntax is unknown, has no
///   pixel data decoder, or the samples are not whole bytes
/// - `DecodeFailure` if the pixel data is missing, malformed, or the
///   decompression fails
pub fn decode_pixels(obj: &FileDicomObject<InMemDicomObject>) -> Result<(PixelBuffer, PixelStorage)> {
    let ts_uid = obj
        .meta()
        .transfer_syntax
        .trim_end_matches(|c: char| c == '\0' || c == ' ');
    let ts = TransferSyntaxRegistry.get(ts_uid).ok_or_else(|| {
        DeidError::UnsupportedEncoding(format!("unknown transfer syntax {}", ts_uid))
    })?;
    if ts.is_unsupported_pixel_encapsulation() {
        return Err(DeidError::UnsupportedEncoding(format!(
            "no pixel data decoder for {} ({})",
            ts.name(),
            ts_uid
        )));
    }

    let elem = obj
        .element(PIXEL_DATA)
        .map_err(|_| DeidError::DecodeFailure("missing Pixel Data".to_string()))?;

    match elem.value() {
        Value::PixelSequence(_) => {
            debug!("Decompressing pixel data ({})", ts_uid);
            decode_encapsulated(obj).map(|buffer| (buffer, PixelStorage::Encapsulated))
        }
        Value::Primitive(value) => decode_native(obj, value.to_bytes().into_owned())
            .map(|buffer| (buffer, PixelStorage::Native)),
        Value::Sequence(_) => Err(DeidError::DecodeFailure(
            "Pixel Data holds a data set sequence".to_string(),
        )),
    }
}

fn decode_native(dcm: &InMemDicomObject, data: Vec<u8>) -> Result<PixelBuffer> {
    let rows = get_u16_value(dcm, ROWS)
        .ok_or_else(|| DeidError::DecodeFailure("missing Rows".to_string()))?;
    let columns = get_u16_value(dcm, COLUMNS)
        .ok_or_else(|| DeidError::DecodeFailure("missing Columns".to_string()))?;
    let bits_allocated = get_u16_value(dcm, BITS_ALLOCATED)
        .ok_or_else(|| DeidError::DecodeFailure("missing BitsAllocated".to_string()))?;
    let samples_per_pixel = get_u16_value(dcm, SAMPLES_PER_PIXEL).unwrap_or(1);
    let frames = get_int_value(dcm, NUMBER_OF_FRAMES)
        .filter(|&n| n > 0)
        .unwrap_or(1) as u32;
    let planar = get_u32_value(dcm, PLANAR_CONFIGURATION) == Some(1);

    check_sample_depth(bits_allocated)?;

    PixelBuffer::new(
        rows as u32,
        columns as u32,
        frames,
        samples_per_pixel,
        bits_allocated,
        data,
    )
    .map(|buffer| buffer.with_planar(planar))
    .map_err(DeidError::DecodeFailure)
}

fn decode_encapsulated(obj: &FileDicomObject<InMemDicomObject>) -> Result<PixelBuffer> {
    let decoded = obj
        .decode_pixel_data()
        .map_err(|e| DeidError::DecodeFailure(format!("{}", e)))?;

    check_sample_depth(decoded.bits_allocated())?;

    // decoders emit interleaved samples
    PixelBuffer::new(
        decoded.rows(),
        decoded.columns(),
        decoded.number_of_frames(),
        decoded.samples_per_pixel(),
        decoded.bits_allocated(),
        decoded.data().to_vec(),
    )
    .map_err(DeidError::DecodeFailure)
}

fn check_sample_depth(bits_allocated: u16) -> Result<()> {
    if bits_allocated == 0 || bits_allocated % 8 != 0 {
        return Err(DeidError::UnsupportedEncoding(format!(
            "BitsAllocated {} is not a whole number of bytes",
            bits_allocated
        )));
    }
    Ok(())
}
