use crate::error::Result;
use log::{debug, info};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Offset of the `DICM` magic after the preamble
const PREAMBLE_LENGTH: usize = 128;
const DICOM_MAGIC: &[u8; 4] = b"DICM";

/// Recursively collects DICOM files under `directory`, sorted by path
///
/// Accepts `.dcm` and `.dicom` (any case) plus extension-less files that
/// carry the DICOM header. Unreadable entries are skipped.
///
/// # Errors
///
/// Returns an error if `directory` itself cannot be read.
pub fn collect_dicom_files(directory: &Path) -> Result<Vec<PathBuf>> {
    // surface an unreadable root instead of an empty batch
    std::fs::read_dir(directory)?;

    let mut files: Vec<PathBuf> = WalkDir::new(directory)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| match path.extension() {
            Some(ext) => ext.eq_ignore_ascii_case("dcm") || ext.eq_ignore_ascii_case("dicom"),
            None => {
                let found = is_dicom_file(path);
                if found {
                    debug!("Found headerless DICOM file: {}", path.display());
                }
                found
            }
        })
        .collect();

    files.sort();
    info!("Found {} DICOM files in {}", files.len(), directory.display());
    Ok(files)
}

/// Checks if a file has a DICOM header
///
/// DICOM files typically have:
/// - 128-byte preamble
/// - 4-byte "DICM" magic string at offset 128
pub fn is_dicom_file(path: &Path) -> bool {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let mut buffer = [0u8; PREAMBLE_LENGTH + 4];
    match file.read_exact(&mut buffer) {
        Ok(()) => &buffer[PREAMBLE_LENGTH..] == DICOM_MAGIC,
        Err(_) => false,
    }
}
