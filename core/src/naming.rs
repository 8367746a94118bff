use crate::extraction::tags::{get_string_value, ACCESSION_NUMBER, PATIENT_ID};
use crate::types::{PixelBuffer, SubKind};
use dicom_object::InMemDicomObject;
use sha2::{Digest, Sha256};
use std::fmt;

/// Width identifiers are zero-padded to
pub const IDENTIFIER_WIDTH: usize = 8;

/// Extension of de-identified DICOM files
pub const DICOM_EXTENSION: &str = "dcm";

/// Extension of preview images
pub const PREVIEW_EXTENSION: &str = "png";

/// Everything the output file name is derived from
///
/// Two records with the same identity share a file name, which
/// deduplicates identical content naturally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct OutputIdentity {
    pub patient_id: String,
    pub accession_number: String,
    pub sub_kind: SubKind,
    /// SHA-256 of the redacted pixel bytes, hex encoded
    pub content_digest: String,
}

impl OutputIdentity {
    /// Derives the identity of a record from its dataset and redacted pixels
    ///
    /// Missing identifiers count as empty and pad to all zeros.
    pub fn from_dicom(dcm: &InMemDicomObject, buffer: &PixelBuffer, sub_kind: SubKind) -> Self {
        Self {
            patient_id: pad_identifier(&get_string_value(dcm, PATIENT_ID).unwrap_or_default()),
            accession_number: pad_identifier(
                &get_string_value(dcm, ACCESSION_NUMBER).unwrap_or_default(),
            ),
            sub_kind,
            content_digest: content_digest(buffer.data()),
        }
    }

    /// File name stem shared by the DICOM output and its preview
    pub fn stem(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.sub_kind.label(),
            self.patient_id,
            self.accession_number,
            self.content_digest
        )
    }

    /// Output DICOM file name
    ///
    /// # Example
    ///
    /// ```
    /// use sonoscrub_core::naming::{content_digest, OutputIdentity};
    /// use sonoscrub_core::SubKind;
    ///
    /// let identity = OutputIdentity {
    ///     patient_id: "00000123".to_string(),
    ///     accession_number: "00000456".to_string(),
    ///     sub_kind: SubKind::Image,
    ///     content_digest: content_digest(b"pixels"),
    /// };
    /// let name = identity.file_name();
    /// assert!(name.starts_with("image_00000123_00000456_"));
    /// assert!(name.ends_with(".dcm"));
    /// ```
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.stem(), DICOM_EXTENSION)
    }

    /// Preview image file name
    pub fn preview_file_name(&self) -> String {
        format!("{}.{}", self.stem(), PREVIEW_EXTENSION)
    }
}

impl fmt::Display for OutputIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// Left-pads an identifier with zeros to eight characters
///
/// Longer identifiers are kept whole.
pub fn pad_identifier(value: &str) -> String {
    format!("{:0>width$}", value.trim(), width = IDENTIFIER_WIDTH)
}

/// SHA-256 of `bytes`, hex encoded
pub fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Output file name of a record
pub fn output_file_name(dcm: &InMemDicomObject, buffer: &PixelBuffer, sub_kind: SubKind) -> String {
    OutputIdentity::from_dicom(dcm, buffer, sub_kind).file_name()
}
