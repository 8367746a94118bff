use crate::error::{DeidError, Result};
use crate::extraction::tags::{
    get_string_value, PHOTOMETRIC_INTERPRETATION, PIXEL_DATA, PLANAR_CONFIGURATION,
};
use crate::redaction::decode::PixelStorage;
use crate::rewrite::meta_builder;
use crate::types::PixelBuffer;
use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_dictionary_std::uids;
use dicom_object::{FileDicomObject, InMemDicomObject};
use log::debug;

/// Transfer syntaxes kept as they are when pixel data is written back
const NATIVE_LITTLE_ENDIAN: &[&str] = &[
    uids::IMPLICIT_VR_LITTLE_ENDIAN,
    uids::EXPLICIT_VR_LITTLE_ENDIAN,
];

/// Writes the buffer back as native Pixel Data
///
/// Compressed or big-endian records are switched to Explicit VR Little
/// Endian, since the samples are no longer compressed. Decoded color
/// data is interleaved RGB, so the photometric attributes follow.
pub fn store_pixels(
    obj: &mut FileDicomObject<InMemDicomObject>,
    buffer: &PixelBuffer,
    storage: PixelStorage,
) -> Result<()> {
    let mut data = buffer.data().to_vec();
    if data.len() % 2 == 1 {
        data.push(0);
    }
    let vr = if buffer.bits_allocated() > 8 {
        VR::OW
    } else {
        VR::OB
    };
    obj.put(DataElement::new(PIXEL_DATA, vr, PrimitiveValue::U8(data.into())));

    let ts_uid = obj
        .meta()
        .transfer_syntax
        .trim_end_matches(|c: char| c == '\0' || c == ' ')
        .to_string();
    let must_switch =
        storage == PixelStorage::Encapsulated || !NATIVE_LITTLE_ENDIAN.contains(&ts_uid.as_str());
    if !must_switch {
        return Ok(());
    }

    debug!(
        "Switching transfer syntax {} -> {}",
        ts_uid,
        uids::EXPLICIT_VR_LITTLE_ENDIAN
    );
    let meta = meta_builder(obj.meta())
        .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
        .build()
        .map_err(|e| DeidError::DicomError(format!("{}", e)))?;
    *obj.meta_mut() = meta;

    if storage == PixelStorage::Encapsulated && buffer.samples_per_pixel() == 3 {
        let is_ybr = get_string_value(obj, PHOTOMETRIC_INTERPRETATION)
            .map(|pi| pi.starts_with("YBR"))
            .unwrap_or(false);
        if is_ybr {
            obj.put(DataElement::new(
                PHOTOMETRIC_INTERPRETATION,
                VR::CS,
                PrimitiveValue::from("RGB"),
            ));
        }
        obj.put(DataElement::new(
            PLANAR_CONFIGURATION,
            VR::US,
            PrimitiveValue::from(0_u16),
        ));
    }
    Ok(())
}
