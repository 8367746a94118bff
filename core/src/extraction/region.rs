use crate::extraction::tags::{
    first_sequence_item, get_u32_value, REGION_LOCATION_MIN_Y0, SEQUENCE_OF_ULTRASOUND_REGIONS,
};
use crate::types::SubKind;
use dicom_object::InMemDicomObject;
use log::debug;

/// Reads `RegionLocationMinY0` from the first ultrasound region
///
/// Returns `None` if the region sequence is absent, empty, or its first
/// item carries no readable value.
pub fn region_min_y0(dcm: &InMemDicomObject) -> Option<u32> {
    first_sequence_item(dcm, SEQUENCE_OF_ULTRASOUND_REGIONS)
        .and_then(|region| get_u32_value(region, REGION_LOCATION_MIN_Y0))
}

/// Number of rows to zero from the top of every frame
///
/// # Algorithm
///
/// 1. Secondary captures carry no reliable region metadata → `fallback`
/// 2. First ultrasound region has `RegionLocationMinY0` → that value
/// 3. Otherwise → `fallback`
pub fn redaction_offset(dcm: &InMemDicomObject, sub_kind: SubKind, fallback: u32) -> u32 {
    if sub_kind == SubKind::Secondary {
        debug!("Secondary capture, redacting {} rows", fallback);
        return fallback;
    }

    match region_min_y0(dcm) {
        Some(y0) => y0,
        None => {
            debug!("No ultrasound region found, redacting {} rows", fallback);
            fallback
        }
    }
}
