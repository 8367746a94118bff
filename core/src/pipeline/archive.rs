use super::progress_bar;
use crate::error::{DeidError, Result};
use indicatif::ParallelProgressIterator;
use log::{debug, info, warn};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

const ARCHIVE_EXTENSION: &str = "zip";

/// Outcome of one archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveStatus {
    Extracted,
    AlreadyPresent,
}

/// Counts for an extraction run
#[derive(Debug, Default)]
pub struct ExtractionSummary {
    /// Archives extracted into a new directory
    pub extracted: usize,

    /// Archives whose target directory already existed
    pub already_present: usize,

    /// Archives that could not be opened or extracted
    pub failures: Vec<DeidError>,
}

/// Extracts every `.zip` archive in `archive_dir` into its own directory
/// under `target_dir`, named after the archive stem.
///
/// Archives are extracted in parallel on `pool`. A corrupt archive is logged
/// and skipped; it never stops the others.
///
/// # Errors
///
/// Returns an error only if `archive_dir` cannot be listed or `target_dir`
/// cannot be created.
pub fn extract_archives(
    archive_dir: &Path,
    target_dir: &Path,
    pool: &ThreadPool,
    show_progress: bool,
) -> Result<ExtractionSummary> {
    fs::create_dir_all(target_dir)?;
    let archives = list_archives(archive_dir)?;

    if archives.is_empty() {
        info!("No zip archives found in {}", archive_dir.display());
        return Ok(ExtractionSummary::default());
    }
    info!("Extracting {} archives", archives.len());

    let pb = progress_bar(archives.len(), show_progress, "Extracting archives");
    let results: Vec<Result<ArchiveStatus>> = pool.install(|| {
        archives
            .par_iter()
            .progress_with(pb)
            .map(|archive| extract_single(archive, &target_dir.join(archive_stem(archive))))
            .collect()
    });

    let mut summary = ExtractionSummary::default();
    for result in results {
        match result {
            Ok(ArchiveStatus::Extracted) => summary.extracted += 1,
            Ok(ArchiveStatus::AlreadyPresent) => summary.already_present += 1,
            Err(e) => {
                warn!("Skipping bad archive: {}", e);
                summary.failures.push(e);
            }
        }
    }
    info!(
        "Extracted {} archives ({} already present, {} failed)",
        summary.extracted,
        summary.already_present,
        summary.failures.len()
    );
    Ok(summary)
}

/// `.zip` files directly inside `dir`, sorted
fn list_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_zip = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION));
        if path.is_file() && is_zip {
            archives.push(path);
        }
    }
    archives.sort();
    Ok(archives)
}

fn archive_stem(path: &Path) -> PathBuf {
    path.file_stem().map(PathBuf::from).unwrap_or_default()
}

fn extract_single(archive: &Path, output: &Path) -> Result<ArchiveStatus> {
    if output.exists() {
        debug!("{} already extracted", archive.display());
        return Ok(ArchiveStatus::AlreadyPresent);
    }

    let corrupt = |reason: String| DeidError::ArchiveCorrupt {
        path: archive.to_path_buf(),
        reason,
    };

    let file = File::open(archive).map_err(|e| corrupt(e.to_string()))?;
    let mut zip = ZipArchive::new(file).map_err(|e| corrupt(e.to_string()))?;
    zip.extract(output).map_err(|e| corrupt(e.to_string()))?;

    debug!("Extracted {} into {}", archive.display(), output.display());
    Ok(ArchiveStatus::Extracted)
}
