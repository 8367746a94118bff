use super::{build_pool, collect_dicom_files, extract_archives, progress_bar, write_preview};
use crate::api::{Deidentifier, RecordOutcome};
use crate::error::{DeidError, Result};
use crate::types::DeidConfig;
use dicom_object::open_file;
use indicatif::ParallelProgressIterator;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// A record that could not be de-identified
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RecordFailure {
    pub path: PathBuf,
    /// Error label, see [`DeidError::kind`]
    pub kind: &'static str,
    pub message: String,
}

/// Totals of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct BatchSummary {
    /// Archives extracted before discovery
    pub archives_extracted: usize,

    /// Archives that were corrupt
    pub archives_failed: usize,

    /// DICOM files found in the source tree
    pub discovered: usize,

    /// Records written to the output directory
    pub processed: usize,

    /// Records that are not eligible ultrasound records
    pub skipped: usize,

    /// Records that failed
    pub failed: usize,

    /// Previews that could not be written
    pub preview_failures: usize,

    pub failures: Vec<RecordFailure>,
}

/// Per-file result
enum FileStatus {
    Processed { preview_failed: bool },
    Skipped,
}

/// Runs a full batch: optional archive extraction, discovery, then
/// de-identification of every discovered record in parallel.
///
/// Per-record and per-archive failures are logged and counted; they never
/// abort the batch.
///
/// # Errors
///
/// Returns an error if the source directory cannot be read, or the output or
/// preview directory cannot be created.
pub fn run_batch(config: &DeidConfig) -> Result<BatchSummary> {
    let pool = build_pool(config.threads)?;
    let mut summary = BatchSummary::default();

    if let Some(archive_dir) = &config.archive_directory {
        let extraction =
            extract_archives(archive_dir, config.source(), &pool, config.show_progress)?;
        summary.archives_extracted = extraction.extracted;
        summary.archives_failed = extraction.failures.len();
    }

    let files = collect_dicom_files(config.source())?;
    summary.discovered = files.len();

    create_dir(config.output())?;
    let preview_dir = config.preview_dir();
    if config.emit_preview_images {
        create_dir(&preview_dir)?;
    }

    let deidentifier = Deidentifier::new().fallback_y0(config.fallback_y0);
    let preview_dir = config.emit_preview_images.then_some(preview_dir.as_path());

    info!("De-identifying {} files", files.len());
    let pb = progress_bar(files.len(), config.show_progress, "Processing DICOM files");
    let results: Vec<(&PathBuf, Result<FileStatus>)> = pool.install(|| {
        files
            .par_iter()
            .progress_with(pb)
            .map(|path| {
                (
                    path,
                    process_file(path, &deidentifier, config.output(), preview_dir),
                )
            })
            .collect()
    });

    for (path, result) in results {
        match result {
            Ok(FileStatus::Processed { preview_failed }) => {
                summary.processed += 1;
                if preview_failed {
                    summary.preview_failures += 1;
                }
            }
            Ok(FileStatus::Skipped) => summary.skipped += 1,
            Err(e) => {
                warn!("Failed {}: {}", path.display(), e);
                summary.failed += 1;
                summary.failures.push(RecordFailure {
                    path: path.clone(),
                    kind: e.kind(),
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        "Batch complete: {} processed, {} skipped, {} failed",
        summary.processed, summary.skipped, summary.failed
    );
    Ok(summary)
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| DeidError::PersistFailure {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })
}

fn process_file(
    path: &Path,
    deidentifier: &Deidentifier,
    output_dir: &Path,
    preview_dir: Option<&Path>,
) -> Result<FileStatus> {
    let mut obj = open_file(path)?;

    let record = match deidentifier.process(&mut obj)? {
        RecordOutcome::Processed(record) => record,
        RecordOutcome::Skipped(classification) => {
            debug!("Skipped {} ({})", path.display(), classification);
            return Ok(FileStatus::Skipped);
        }
    };

    let target = output_dir.join(record.file_name());
    obj.write_to_file(&target)
        .map_err(|e| DeidError::PersistFailure {
            path: target.clone(),
            reason: e.to_string(),
        })?;
    debug!("{} -> {}", path.display(), target.display());

    let mut preview_failed = false;
    if let Some(dir) = preview_dir {
        if let Err(e) = write_preview(&obj, &dir.join(record.preview_file_name())) {
            warn!("Preview for {} not written: {}", path.display(), e);
            preview_failed = true;
        }
    }

    Ok(FileStatus::Processed { preview_failed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::tags::{
        ACCESSION_NUMBER, BITS_ALLOCATED, COLUMNS, NUMBER_OF_FRAMES, PATIENT_ID,
        PHOTOMETRIC_INTERPRETATION, PIXEL_DATA, ROWS, SAMPLES_PER_PIXEL, STUDY_DATE,
    };
    use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
    use dicom_dictionary_std::uids;
    use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
    use tempfile::TempDir;

    fn write_record(path: &Path, sop_class: &str, patient_id: &str) {
        let meta = FileMetaTableBuilder::new()
            .media_storage_sop_class_uid(sop_class)
            .media_storage_sop_instance_uid("1.2.826.0.1.3680043.2.1")
            .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
            .implementation_class_uid("1.2.826.0.1.3680043.2")
            .build()
            .unwrap();

        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(PATIENT_ID, VR::LO, PrimitiveValue::from(patient_id)));
        dcm.put(DataElement::new(ACCESSION_NUMBER, VR::SH, PrimitiveValue::from("A1")));
        dcm.put(DataElement::new(STUDY_DATE, VR::DA, PrimitiveValue::from("20220315")));
        dcm.put(DataElement::new(SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16)));
        dcm.put(DataElement::new(
            PHOTOMETRIC_INTERPRETATION,
            VR::CS,
            PrimitiveValue::from("MONOCHROME2"),
        ));
        dcm.put(DataElement::new(NUMBER_OF_FRAMES, VR::IS, PrimitiveValue::from("2")));
        dcm.put(DataElement::new(ROWS, VR::US, PrimitiveValue::from(8_u16)));
        dcm.put(DataElement::new(COLUMNS, VR::US, PrimitiveValue::from(8_u16)));
        dcm.put(DataElement::new(BITS_ALLOCATED, VR::US, PrimitiveValue::from(8_u16)));
        dcm.put(DataElement::new(Tag(0x0028, 0x0101), VR::US, PrimitiveValue::from(8_u16)));
        dcm.put(DataElement::new(Tag(0x0028, 0x0102), VR::US, PrimitiveValue::from(7_u16)));
        dcm.put(DataElement::new(Tag(0x0028, 0x0103), VR::US, PrimitiveValue::from(0_u16)));
        dcm.put(DataElement::new(
            PIXEL_DATA,
            VR::OB,
            PrimitiveValue::U8(vec![200_u8; 2 * 8 * 8].into()),
        ));
        dcm.with_exact_meta(meta).write_to_file(path).unwrap();
    }

    fn output_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_batch_counts_outcomes() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let nested = source.path().join("study");
        fs::create_dir(&nested).unwrap();

        write_record(
            &nested.join("clip.dcm"),
            uids::ULTRASOUND_MULTI_FRAME_IMAGE_STORAGE,
            "42",
        );
        write_record(
            &source.path().join("capture.dcm"),
            uids::SECONDARY_CAPTURE_IMAGE_STORAGE,
            "43",
        );
        fs::write(source.path().join("garbage.dcm"), b"not a dicom file").unwrap();

        let config = DeidConfig::new(source.path(), output.path())
            .fallback_y0(3)
            .with_threads(2)
            .show_progress(false);
        let summary = run_batch(&config).unwrap();

        assert_eq!(summary.discovered, 3);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.failures[0].path.ends_with("garbage.dcm"));

        let names = output_names(output.path());
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("video_00000042_000000A1_"));
        assert!(names[0].ends_with(".dcm"));

        let written = open_file(output.path().join(&names[0])).unwrap();
        assert_eq!(
            written.element(STUDY_DATE).unwrap().to_str().unwrap(),
            "20220101"
        );
    }

    #[test]
    fn test_overflowing_geometry_fails_one_record() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let good = source.path().join("good.dcm");
        let bad = source.path().join("bad.dcm");
        write_record(&good, uids::ULTRASOUND_MULTI_FRAME_IMAGE_STORAGE, "1");
        write_record(&bad, uids::ULTRASOUND_MULTI_FRAME_IMAGE_STORAGE, "2");

        let mut obj = open_file(&bad).unwrap();
        obj.put(DataElement::new(ROWS, VR::US, PrimitiveValue::from(65535_u16)));
        obj.put(DataElement::new(COLUMNS, VR::US, PrimitiveValue::from(65535_u16)));
        obj.put(DataElement::new(SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(3_u16)));
        obj.put(DataElement::new(BITS_ALLOCATED, VR::US, PrimitiveValue::from(16_u16)));
        obj.put(DataElement::new(
            NUMBER_OF_FRAMES,
            VR::IS,
            PrimitiveValue::from("2147483647"),
        ));
        obj.write_to_file(&bad).unwrap();

        let config = DeidConfig::new(source.path(), output.path()).show_progress(false);
        let summary = run_batch(&config).unwrap();

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.failures[0].path.ends_with("bad.dcm"));
        assert_eq!(summary.failures[0].kind, "decode-failure");
    }

    #[test]
    fn test_batch_writes_previews() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_record(
            &source.path().join("clip.dcm"),
            uids::ULTRASOUND_MULTI_FRAME_IMAGE_STORAGE,
            "7",
        );

        let config = DeidConfig::new(source.path(), output.path())
            .emit_preview_images(true)
            .show_progress(false);
        let summary = run_batch(&config).unwrap();

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.preview_failures, 0);

        let previews = output_names(&config.preview_dir());
        assert_eq!(previews.len(), 1);
        assert!(previews[0].starts_with("video_00000007_"));
        assert!(previews[0].ends_with(".png"));
    }

    #[test]
    fn test_batch_extracts_archives_first() {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let archives = TempDir::new().unwrap();
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let staged = TempDir::new().unwrap();
        let record = staged.path().join("clip.dcm");
        write_record(&record, uids::ULTRASOUND_MULTI_FRAME_IMAGE_STORAGE, "9");

        let mut zip = zip::ZipWriter::new(fs::File::create(archives.path().join("s1.zip")).unwrap());
        zip.start_file("clip.dcm", SimpleFileOptions::default()).unwrap();
        zip.write_all(&fs::read(&record).unwrap()).unwrap();
        zip.finish().unwrap();

        let config = DeidConfig::new(source.path(), output.path())
            .with_archive_directory(archives.path())
            .show_progress(false);
        let summary = run_batch(&config).unwrap();

        assert_eq!(summary.archives_extracted, 1);
        assert_eq!(summary.processed, 1);
    }

    #[test]
    fn test_unreadable_source_is_error() {
        let output = TempDir::new().unwrap();
        let config = DeidConfig::new(output.path().join("missing"), output.path())
            .show_progress(false);
        assert!(run_batch(&config).is_err());
    }
}
