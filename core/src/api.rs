use crate::error::Result;
use crate::extraction::{classify, has_region_sequence};
use crate::naming::OutputIdentity;
use crate::redaction::redact;
use crate::rewrite::{deidentify_tree, WalkStats};
use crate::types::{Classification, PixelBuffer, DEFAULT_FALLBACK_Y0};
use dicom_object::{FileDicomObject, InMemDicomObject};
use log::debug;

/// Main entry point for de-identifying one ultrasound record
///
/// Classifies the record, rewrites its tags, redacts its pixels and
/// derives its output name. The object is modified in place.
///
/// # Example
///
/// ```
/// use sonoscrub_core::{Deidentifier, RecordOutcome};
/// use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
/// use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
///
/// let meta = FileMetaTableBuilder::new()
///     .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.3.1") // US multi-frame
///     .media_storage_sop_instance_uid("1.2.3.4.5")
///     .transfer_syntax("1.2.840.10008.1.2.1")
///     .implementation_class_uid("1.2.3.4")
///     .build()
///     .unwrap();
///
/// let mut dcm = InMemDicomObject::new_empty();
/// dcm.put(DataElement::new(Tag(0x0010, 0x0020), VR::LO, PrimitiveValue::from("77")));
/// dcm.put(DataElement::new(Tag(0x0008, 0x0020), VR::DA, PrimitiveValue::from("20240612")));
/// dcm.put(DataElement::new(Tag(0x0028, 0x0010), VR::US, PrimitiveValue::from(4_u16)));
/// dcm.put(DataElement::new(Tag(0x0028, 0x0011), VR::US, PrimitiveValue::from(4_u16)));
/// dcm.put(DataElement::new(Tag(0x0028, 0x0100), VR::US, PrimitiveValue::from(8_u16)));
/// dcm.put(DataElement::new(
///     Tag(0x7FE0, 0x0010),
///     VR::OB,
///     PrimitiveValue::U8(vec![1_u8; 16].into()),
/// ));
/// let mut obj = dcm.with_exact_meta(meta);
///
/// let outcome = Deidentifier::new().fallback_y0(2).process(&mut obj).unwrap();
/// let record = match outcome {
///     RecordOutcome::Processed(record) => record,
///     RecordOutcome::Skipped(_) => unreachable!(),
/// };
///
/// assert!(record.file_name().starts_with("video_00000077_00000000_"));
/// assert_eq!(record.rows_zeroed, 2);
/// assert_eq!(obj.element(Tag(0x0008, 0x0020)).unwrap().to_str().unwrap(), "20240101");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deidentifier {
    fallback_y0: u32,
}

impl Default for Deidentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Deidentifier {
    /// Creates a de-identifier with the default fallback redaction height
    pub fn new() -> Self {
        Self {
            fallback_y0: DEFAULT_FALLBACK_Y0,
        }
    }

    /// Builder: Rows redacted when no region metadata applies
    pub fn fallback_y0(mut self, rows: u32) -> Self {
        self.fallback_y0 = rows;
        self
    }

    /// De-identifies a record in place
    ///
    /// Ineligible records are returned as [`RecordOutcome::Skipped`]
    /// without being modified.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file meta group cannot be rebuilt
    /// - The pixel data uses an unsupported encoding or fails to decode
    pub fn process(&self, obj: &mut FileDicomObject<InMemDicomObject>) -> Result<RecordOutcome> {
        let classification = classify(obj.meta());
        if !classification.is_eligible(has_region_sequence(obj)) {
            debug!("Skipping ineligible record ({})", classification);
            return Ok(RecordOutcome::Skipped(classification));
        }

        let walk = deidentify_tree(obj)?;
        let redaction = redact(obj, classification.sub_kind, self.fallback_y0)?;
        let identity = OutputIdentity::from_dicom(obj, &redaction.buffer, classification.sub_kind);

        Ok(RecordOutcome::Processed(ProcessedRecord {
            classification,
            identity,
            y0: redaction.y0,
            rows_zeroed: redaction.rows_zeroed,
            walk,
            buffer: redaction.buffer,
        }))
    }
}

/// Result of running the de-identifier on one record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// The record was de-identified
    Processed(ProcessedRecord),
    /// The record is not an eligible ultrasound record
    Skipped(Classification),
}

/// Summary of a de-identified record
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedRecord {
    pub classification: Classification,

    /// Inputs of the output file name
    pub identity: OutputIdentity,

    /// Requested redaction boundary
    pub y0: u32,

    /// Rows zeroed in each frame
    pub rows_zeroed: u32,

    /// Tag rewriting counters
    pub walk: WalkStats,

    /// Redacted raster
    pub buffer: PixelBuffer,
}

impl ProcessedRecord {
    /// Output DICOM file name
    pub fn file_name(&self) -> String {
        self.identity.file_name()
    }

    /// Preview image file name
    pub fn preview_file_name(&self) -> String {
        self.identity.preview_file_name()
    }
}
