use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

/// Root for UUID-derived UIDs (ISO/IEC 9834-8, DICOM PS3.5 B.2)
pub const UUID_UID_ROOT: &str = "2.25";

/// Maximum length of a UI value
pub const MAX_UID_LENGTH: usize = 64;

/// Generates a fresh UID under the `2.25` root
///
/// The suffix is the decimal form of a random version 4 UUID, so the
/// result never falls under an organization's registered root.
///
/// # Example
///
/// ```
/// use sonoscrub_core::rewrite::{generate_uid, is_valid_uid};
///
/// let uid = generate_uid();
/// assert!(uid.starts_with("2.25."));
/// assert!(is_valid_uid(&uid));
/// assert_ne!(uid, generate_uid());
/// ```
pub fn generate_uid() -> String {
    format!("{}.{}", UUID_UID_ROOT, Uuid::new_v4().as_u128())
}

/// Checks UID syntax: dot-separated numeric components without
/// leading zeros, at most 64 characters
pub fn is_valid_uid(uid: &str) -> bool {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"^(0|[1-9][0-9]*)(\.(0|[1-9][0-9]*))+$").expect("Failed to compile regex")
    });

    uid.len() <= MAX_UID_LENGTH && re.is_match(uid)
}
