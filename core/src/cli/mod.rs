pub mod report;

use crate::types::{DeidConfig, DEFAULT_FALLBACK_Y0};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for sonoscrub
#[derive(Parser, Debug)]
#[command(name = "sonoscrub")]
#[command(about = "De-identify ultrasound DICOM files and redact burned-in annotations")]
#[command(version)]
pub struct Cli {
    /// Directory tree containing DICOM files
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Directory receiving de-identified files
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Extract .zip archives from this directory into SOURCE first
    #[arg(long, value_name = "DIR")]
    pub archives: Option<PathBuf>,

    /// Write a PNG preview of every processed record
    #[arg(long)]
    pub preview: bool,

    /// Preview directory (default: <OUTPUT>/png_debug)
    #[arg(long, value_name = "DIR")]
    pub preview_dir: Option<PathBuf>,

    /// Rows redacted when a record has no region metadata
    #[arg(long, value_name = "ROWS", default_value_t = DEFAULT_FALLBACK_Y0)]
    pub fallback_y0: u32,

    /// Worker threads (default: one per core)
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Summary format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Batch configuration for these arguments
    pub fn to_config(&self) -> DeidConfig {
        let mut config = DeidConfig::new(&self.source, &self.output)
            .emit_preview_images(self.preview)
            .fallback_y0(self.fallback_y0)
            .show_progress(!self.verbose);
        if let Some(dir) = &self.preview_dir {
            config = config.with_preview_directory(dir);
        }
        if let Some(threads) = self.threads {
            config = config.with_threads(threads);
        }
        if let Some(dir) = &self.archives {
            config = config.with_archive_directory(dir);
        }
        config
    }
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}
