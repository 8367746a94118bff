use dicom_core::Tag;
use dicom_object::InMemDicomObject;

// File Meta Tags
pub const MEDIA_STORAGE_SOP_CLASS_UID: Tag = Tag(0x0002, 0x0002);
pub const MEDIA_STORAGE_SOP_INSTANCE_UID: Tag = Tag(0x0002, 0x0003);
pub const TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);
pub const IMPLEMENTATION_CLASS_UID: Tag = Tag(0x0002, 0x0012);
pub const IMPLEMENTATION_VERSION_NAME: Tag = Tag(0x0002, 0x0013);

// Instance Identification Tags
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);

// Date/Time Tags
pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
pub const STUDY_TIME: Tag = Tag(0x0008, 0x0030);
pub const SERIES_TIME: Tag = Tag(0x0008, 0x0031);
pub const ACQUISITION_TIME: Tag = Tag(0x0008, 0x0032);
pub const CONTENT_TIME: Tag = Tag(0x0008, 0x0033);

// Patient/Study Tags
pub const ACCESSION_NUMBER: Tag = Tag(0x0008, 0x0050);
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
pub const PATIENT_BIRTH_DATE: Tag = Tag(0x0010, 0x0030);

// Ultrasound Region Tags
pub const SEQUENCE_OF_ULTRASOUND_REGIONS: Tag = Tag(0x0018, 0x6011);
pub const REGION_LOCATION_MIN_Y0: Tag = Tag(0x0018, 0x601A);

// Image Pixel Tags
pub const SAMPLES_PER_PIXEL: Tag = Tag(0x0028, 0x0002);
pub const PHOTOMETRIC_INTERPRETATION: Tag = Tag(0x0028, 0x0004);
pub const PLANAR_CONFIGURATION: Tag = Tag(0x0028, 0x0006);
pub const NUMBER_OF_FRAMES: Tag = Tag(0x0028, 0x0008);
pub const ROWS: Tag = Tag(0x0028, 0x0010);
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
pub const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

// Provenance Tags
pub const ORIGINAL_ATTRIBUTES_SEQUENCE: Tag = Tag(0x0400, 0x0561);

/// Returns true for tags in an odd (private) group
pub fn is_private(tag: Tag) -> bool {
    tag.group() % 2 == 1
}

/// Returns true for Private Creator tags `(gggg,0010)` to `(gggg,00FF)`
pub fn is_private_creator(tag: Tag) -> bool {
    is_private(tag) && (0x0010..=0x00FF).contains(&tag.element())
}

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim_end_matches('\0').trim().to_string())
}

/// Helper to get integer value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to i32
pub fn get_int_value(dcm: &InMemDicomObject, tag: Tag) -> Option<i32> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<i32>().ok())
}

/// Helper to get u16 value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to u16
pub fn get_u16_value(dcm: &InMemDicomObject, tag: Tag) -> Option<u16> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<u16>().ok())
}

/// Helper to get u32 value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to u32
pub fn get_u32_value(dcm: &InMemDicomObject, tag: Tag) -> Option<u32> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<u32>().ok())
}

/// Returns the first item of a sequence attribute, if any
pub fn first_sequence_item(dcm: &InMemDicomObject, tag: Tag) -> Option<&InMemDicomObject> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.value().items())
        .and_then(|items| items.first())
}
