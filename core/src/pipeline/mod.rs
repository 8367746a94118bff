//! Batch stages: archive extraction, discovery, per-record processing and
//! previews.

pub mod archive;
pub mod batch;
pub mod discover;
pub mod preview;

pub use archive::{extract_archives, ExtractionSummary};
pub use batch::{run_batch, BatchSummary, RecordFailure};
pub use discover::{collect_dicom_files, is_dicom_file};
pub use preview::write_preview;

use crate::error::{DeidError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::{ThreadPool, ThreadPoolBuilder};

const PROGRESS_TEMPLATE: &str = "[{elapsed_precise}] {bar:40} {pos}/{len} {wide_msg}";

/// Builds the worker pool. `None` lets rayon pick the thread count.
pub fn build_pool(threads: Option<usize>) -> Result<ThreadPool> {
    let mut builder = ThreadPoolBuilder::new();
    if let Some(threads) = threads {
        builder = builder.num_threads(threads);
    }
    builder
        .build()
        .map_err(|e| DeidError::Other(format!("Failed to build worker pool: {}", e)))
}

/// Progress bar for `len` items, hidden when `show` is false
pub(crate) fn progress_bar(len: usize, show: bool, message: &'static str) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb
}
