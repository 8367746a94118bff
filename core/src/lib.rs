//! De-identification engine for ultrasound DICOM files.
//!
//! Each record is classified, its identifying attributes are rewritten, the
//! burned-in annotation band at the top of its raster is zeroed, and it is
//! renamed after a digest of the redacted pixels.

pub mod api;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod naming;
pub mod pipeline;
pub mod redaction;
pub mod rewrite;
pub mod types;

pub use api::{Deidentifier, ProcessedRecord, RecordOutcome};
pub use cli::report::TextReport;
pub use error::{DeidError, Result};
pub use naming::OutputIdentity;
pub use pipeline::{run_batch, BatchSummary, RecordFailure};
pub use types::*;
