use crate::extraction::tags::{
    is_private_creator, CONTENT_TIME, IMPLEMENTATION_CLASS_UID, MEDIA_STORAGE_SOP_INSTANCE_UID,
    SERIES_INSTANCE_UID, SERIES_TIME, SOP_INSTANCE_UID, STUDY_INSTANCE_UID, STUDY_TIME,
};
use crate::rewrite::uid::generate_uid;
use dicom_core::value::PrimitiveValue;
use dicom_core::{Tag, VR};

/// Replacement for times
pub const ZERO_TIME: &str = "000000";

/// Replacement for removed non-UID, non-time attributes
pub const ANON: &str = "anon";

/// Month and day appended to the year of every date
pub const DATE_SUFFIX: &str = "0101";

/// Identifying attributes replaced outright
pub const REMOVAL_SET: &[Tag] = &[
    SOP_INSTANCE_UID,
    STUDY_TIME,
    SERIES_TIME,
    CONTENT_TIME,
    STUDY_INSTANCE_UID,
    SERIES_INSTANCE_UID,
    MEDIA_STORAGE_SOP_INSTANCE_UID,
    IMPLEMENTATION_CLASS_UID,
];

/// Times that belong to the removal set
pub const ANONYMIZED_TIMES: &[Tag] = &[STUDY_TIME, SERIES_TIME, CONTENT_TIME];

/// What happens to one attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Replace with a freshly generated UID
    NewUid,
    /// Replace with `000000`
    ZeroTime,
    /// Replace with `anon`
    Anonymize,
    /// Keep the year, set month and day to `0101`
    TruncateDate,
    Keep,
}

/// Checks removal set membership, including Private Creator tags
pub fn in_removal_set(tag: Tag) -> bool {
    REMOVAL_SET.contains(&tag) || is_private_creator(tag)
}

/// Decides the action for an attribute from its original tag and VR
///
/// # Algorithm
///
/// 1. Removal set: UI → new UID, anonymized time with TM → zero time,
///    anything else → `anon`
/// 2. DA → truncate to year
/// 3. TM outside the anonymized times → zero time
pub fn action_for(tag: Tag, vr: VR) -> Action {
    if in_removal_set(tag) {
        return match vr {
            VR::UI => Action::NewUid,
            VR::TM if ANONYMIZED_TIMES.contains(&tag) => Action::ZeroTime,
            _ => Action::Anonymize,
        };
    }

    match vr {
        VR::DA => Action::TruncateDate,
        VR::TM => Action::ZeroTime,
        _ => Action::Keep,
    }
}

/// Keeps the 4-character year prefix and appends `0101`
///
/// Empty values stay empty.
pub fn truncate_date(date: &str) -> String {
    let date = date.trim();
    if date.is_empty() {
        return String::new();
    }
    let year: String = date.chars().take(4).collect();
    format!("{}{}", year, DATE_SUFFIX)
}

/// Computes the new value of an attribute
///
/// Returns `None` when the value stays as it is.
pub fn rewrite_value(tag: Tag, vr: VR, value: &PrimitiveValue) -> Option<PrimitiveValue> {
    match action_for(tag, vr) {
        Action::NewUid => Some(PrimitiveValue::from(generate_uid())),
        Action::ZeroTime => Some(PrimitiveValue::from(ZERO_TIME)),
        Action::Anonymize => Some(PrimitiveValue::from(ANON)),
        Action::TruncateDate => {
            let dates: Vec<String> = value
                .to_multi_str()
                .iter()
                .map(|d| truncate_date(d))
                .collect();
            match dates.len() {
                0 => None,
                1 => Some(PrimitiveValue::from(dates[0].clone())),
                _ => Some(PrimitiveValue::Strs(dates.into())),
            }
        }
        Action::Keep => None,
    }
}
