use std::path::{Path, PathBuf};

/// Rows redacted from the top of the raster when no region metadata applies
pub const DEFAULT_FALLBACK_Y0: u32 = 101;

/// Directory name used for previews when none is configured
pub const DEFAULT_PREVIEW_DIR: &str = "png_debug";

/// Configuration for a de-identification batch
///
/// # Example
///
/// ```
/// use sonoscrub_core::DeidConfig;
///
/// let config = DeidConfig::new("/data/unzipped", "/data/deidentified")
///     .emit_preview_images(true)
///     .fallback_y0(96);
///
/// assert!(config.emit_preview_images);
/// assert_eq!(config.fallback_y0, 96);
/// assert!(config.preview_dir().ends_with("png_debug"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct DeidConfig {
    /// Directory tree scanned for DICOM files
    pub source_directory: PathBuf,

    /// Flat directory receiving de-identified files
    pub output_directory: PathBuf,

    /// Write a PNG preview of every processed record
    pub emit_preview_images: bool,

    /// Where previews go. If None, `<output_directory>/png_debug` is used.
    pub preview_directory: Option<PathBuf>,

    /// Rows redacted when a record has no usable region metadata
    pub fallback_y0: u32,

    /// Worker threads for the batch. If None, rayon picks.
    pub threads: Option<usize>,

    /// Directory of `.zip` archives extracted into the source tree first
    pub archive_directory: Option<PathBuf>,

    /// Render progress bars
    pub show_progress: bool,
}

impl DeidConfig {
    /// Creates a configuration with previews disabled and default redaction
    pub fn new(source_directory: impl Into<PathBuf>, output_directory: impl Into<PathBuf>) -> Self {
        Self {
            source_directory: source_directory.into(),
            output_directory: output_directory.into(),
            emit_preview_images: false,
            preview_directory: None,
            fallback_y0: DEFAULT_FALLBACK_Y0,
            threads: None,
            archive_directory: None,
            show_progress: true,
        }
    }

    /// Builder: Enable or disable preview export
    pub fn emit_preview_images(mut self, emit: bool) -> Self {
        self.emit_preview_images = emit;
        self
    }

    /// Builder: Set the preview directory
    ///
    /// # Example
    ///
    /// ```
    /// use sonoscrub_core::DeidConfig;
    /// use std::path::Path;
    ///
    /// let config = DeidConfig::new("in", "out").with_preview_directory("previews");
    /// assert_eq!(config.preview_dir(), Path::new("previews"));
    /// ```
    pub fn with_preview_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.preview_directory = Some(dir.into());
        self
    }

    /// Builder: Set the fallback redaction height
    pub fn fallback_y0(mut self, rows: u32) -> Self {
        self.fallback_y0 = rows;
        self
    }

    /// Builder: Set the number of worker threads
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Builder: Extract archives from `dir` before the batch runs
    pub fn with_archive_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.archive_directory = Some(dir.into());
        self
    }

    /// Builder: Show or hide progress bars
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Resolved preview directory
    pub fn preview_dir(&self) -> PathBuf {
        self.preview_directory
            .clone()
            .unwrap_or_else(|| self.output_directory.join(DEFAULT_PREVIEW_DIR))
    }

    /// Source directory as a path
    pub fn source(&self) -> &Path {
        &self.source_directory
    }

    /// Output directory as a path
    pub fn output(&self) -> &Path {
        &self.output_directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DeidConfig::new("src", "out");
        assert_eq!(config.source(), Path::new("src"));
        assert_eq!(config.output(), Path::new("out"));
        assert!(!config.emit_preview_images);
        assert_eq!(config.fallback_y0, DEFAULT_FALLBACK_Y0);
        assert!(config.threads.is_none());
        assert!(config.archive_directory.is_none());
        assert!(config.show_progress);
        assert_eq!(config.preview_dir(), Path::new("out").join("png_debug"));
    }

    #[test]
    fn test_builder_chain() {
        let config = DeidConfig::new("src", "out")
            .emit_preview_images(true)
            .with_preview_directory("png")
            .fallback_y0(0)
            .with_threads(4)
            .with_archive_directory("zips")
            .show_progress(false);

        assert!(config.emit_preview_images);
        assert_eq!(config.preview_dir(), PathBuf::from("png"));
        assert_eq!(config.fallback_y0, 0);
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.archive_directory, Some(PathBuf::from("zips")));
        assert!(!config.show_progress);
    }
}
