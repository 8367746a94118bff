use crate::extraction::tags::SEQUENCE_OF_ULTRASOUND_REGIONS;
use crate::types::{Classification, MediaKind, SubKind};
use dicom_dictionary_std::uids;
use dicom_object::{FileMetaTable, InMemDicomObject};

/// Human-readable names of the storage SOP classes seen in ultrasound exports
const SOP_CLASS_NAMES: &[(&str, &str)] = &[
    (uids::ULTRASOUND_IMAGE_STORAGE, "Ultrasound Image Storage"),
    (
        uids::ULTRASOUND_IMAGE_STORAGE_RETIRED,
        "Ultrasound Image Storage (Retired)",
    ),
    (
        uids::ULTRASOUND_MULTI_FRAME_IMAGE_STORAGE,
        "Ultrasound Multi-frame Image Storage",
    ),
    (
        uids::ULTRASOUND_MULTI_FRAME_IMAGE_STORAGE_RETIRED,
        "Ultrasound Multi-frame Image Storage (Retired)",
    ),
    (
        uids::SECONDARY_CAPTURE_IMAGE_STORAGE,
        "Secondary Capture Image Storage",
    ),
    (
        uids::MULTI_FRAME_SINGLE_BIT_SECONDARY_CAPTURE_IMAGE_STORAGE,
        "Multi-frame Single Bit Secondary Capture Image Storage",
    ),
    (
        uids::MULTI_FRAME_GRAYSCALE_BYTE_SECONDARY_CAPTURE_IMAGE_STORAGE,
        "Multi-frame Grayscale Byte Secondary Capture Image Storage",
    ),
    (
        uids::MULTI_FRAME_GRAYSCALE_WORD_SECONDARY_CAPTURE_IMAGE_STORAGE,
        "Multi-frame Grayscale Word Secondary Capture Image Storage",
    ),
    (
        uids::MULTI_FRAME_TRUE_COLOR_SECONDARY_CAPTURE_IMAGE_STORAGE,
        "Multi-frame True Color Secondary Capture Image Storage",
    ),
    (
        uids::ENHANCED_US_VOLUME_STORAGE,
        "Enhanced US Volume Storage",
    ),
];

/// Classifies a record from its file meta group
///
/// # Example
///
/// ```
/// use sonoscrub_core::extraction::classify_sop_class;
/// use sonoscrub_core::{MediaKind, SubKind};
///
/// let class = classify_sop_class("1.2.840.10008.5.1.4.1.1.3.1");
/// assert_eq!(class.media_kind, MediaKind::MultiFrame);
/// assert_eq!(class.sub_kind, SubKind::Video);
/// ```
pub fn classify(meta: &FileMetaTable) -> Classification {
    classify_sop_class(trim_uid(&meta.media_storage_sop_class_uid))
}

/// Classifies a Media Storage SOP Class UID
///
/// The media kind comes from the UID itself, the sub-kind from its
/// description, so the two may disagree for unusual classes.
pub fn classify_sop_class(sop_class_uid: &str) -> Classification {
    let sop_class_uid = trim_uid(sop_class_uid);
    Classification::new(
        media_kind(sop_class_uid),
        sub_kind(&sop_class_description(sop_class_uid)),
    )
}

/// Maps the SOP class UID to a media kind
pub fn media_kind(sop_class_uid: &str) -> MediaKind {
    match sop_class_uid {
        uids::ULTRASOUND_IMAGE_STORAGE => MediaKind::SingleImage,
        uids::ULTRASOUND_MULTI_FRAME_IMAGE_STORAGE => MediaKind::MultiFrame,
        _ => MediaKind::Other,
    }
}

/// Maps a SOP class description to a sub-kind
pub fn sub_kind(description: &str) -> SubKind {
    if description.contains("Multi-frame") {
        SubKind::Video
    } else if description.contains("Secondary") {
        SubKind::Secondary
    } else {
        SubKind::Image
    }
}

/// Dictionary name of a storage SOP class, or the UID itself when unknown
pub fn sop_class_description(sop_class_uid: &str) -> String {
    SOP_CLASS_NAMES
        .iter()
        .find(|(uid, _)| *uid == sop_class_uid)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| sop_class_uid.to_string())
}

/// Checks for the ultrasound region sequence on the main dataset
pub fn has_region_sequence(dcm: &InMemDicomObject) -> bool {
    dcm.element(SEQUENCE_OF_ULTRASOUND_REGIONS).is_ok()
}

fn trim_uid(uid: &str) -> &str {
    uid.trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
}
