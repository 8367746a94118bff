use std::path::PathBuf;
use thiserror::Error;

/// Result type for sonoscrub operations
pub type Result<T> = std::result::Result<T, DeidError>;

/// Error types for de-identification operations
///
/// Every variant is scoped to a single record or archive. The batch driver
/// logs it and moves on to the next item.
#[derive(Error, Debug)]
pub enum DeidError {
    /// Archive could not be opened or extracted
    #[error("Corrupt archive {}: {reason}", path.display())]
    ArchiveCorrupt { path: PathBuf, reason: String },

    /// Pixel data is stored in an encoding that cannot be decoded
    #[error("Unsupported pixel encoding: {0}")]
    UnsupportedEncoding(String),

    /// Pixel data decoding failed
    #[error("Failed to decode pixel data: {0}")]
    DecodeFailure(String),

    /// Output or preview file could not be written
    #[error("Failed to write {}: {reason}", path.display())]
    PersistFailure { path: PathBuf, reason: String },

    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// Tag not found in DICOM file
    #[error("Tag not found: {0}")]
    TagNotFound(String),

    /// Generic de-identification error
    #[error("De-identification error: {0}")]
    Other(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DeidError {
    /// Short machine-readable label used in batch summaries
    pub fn kind(&self) -> &'static str {
        match self {
            DeidError::ArchiveCorrupt { .. } => "archive-corrupt",
            DeidError::UnsupportedEncoding(_) => "unsupported-encoding",
            DeidError::DecodeFailure(_) => "decode-failure",
            DeidError::PersistFailure { .. } => "persist-failure",
            DeidError::DicomError(_) => "dicom",
            DeidError::TagNotFound(_) => "tag-not-found",
            DeidError::Other(_) => "other",
            DeidError::IoError(_) => "io",
        }
    }
}

// Helper conversions
impl From<String> for DeidError {
    fn from(s: String) -> Self {
        DeidError::Other(s)
    }
}

impl From<&str> for DeidError {
    fn from(s: &str) -> Self {
        DeidError::Other(s.to_string())
    }
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for DeidError {
    fn from(e: dicom_object::ReadError) -> Self {
        DeidError::DicomError(format!("{}", e))
    }
}
