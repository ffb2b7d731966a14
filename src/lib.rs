pub mod analyze;
pub mod date;
pub mod media;
pub mod naming;
pub mod scan;
pub mod sources;
pub mod writer;

use std::fmt;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use date::DatePriority;

/// Whether source files are copied or moved into the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum Operation {
    Copy,
    Move,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Copy => write!(f, "copy"),
            Operation::Move => write!(f, "move"),
        }
    }
}

/// Batch folder name format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum NamingMode {
    /// `<date>_<code>`
    SingleDate,
    /// `<first date>_do_<last date>_<code>`
    DateRange,
}

impl fmt::Display for NamingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingMode::SingleDate => write!(f, "date and source"),
            NamingMode::DateRange => write!(f, "date range and source"),
        }
    }
}

/// Subfolder layout choice. Advisory: it is recorded in the manifest log,
/// but transferred files are always keyed by day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum SubfolderMode {
    SingleFolder,
    PerDay,
}

impl fmt::Display for SubfolderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubfolderMode::SingleFolder => write!(f, "single folder"),
            SubfolderMode::PerDay => write!(f, "per-day subfolders"),
        }
    }
}

/// Copy buffer preference. Recorded in the manifest log only; transfers
/// stream whole files regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum BufferSize {
    Small,
    Medium,
    Large,
    Dynamic,
}

impl fmt::Display for BufferSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferSize::Small => write!(f, "small (128 KB)"),
            BufferSize::Medium => write!(f, "medium (512 KB)"),
            BufferSize::Large => write!(f, "large (1 MB)"),
            BufferSize::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// Configuration for one import operation. Every decision the pipeline
/// makes reads from this value; nothing lives in globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOptions {
    pub source: PathBuf,
    pub dest: PathBuf,
    /// Source label, optionally carrying an embedded `(short code)`.
    pub label: String,
    pub operation: Operation,
    pub date_priority: DatePriority,
    /// None lets the batch's date range decide.
    pub naming: Option<NamingMode>,
    /// None lets the batch's date range decide.
    pub subfolders: Option<SubfolderMode>,
    /// Append `_P`/`_M`/`_PM` to the batch folder by content.
    pub suffix: bool,
    /// Write a manifest log into the destination folder.
    pub write_log: bool,
    pub buffer: BufferSize,
}

/// Outcome of a completed import.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    /// Destination paths as written, before any suffix rename.
    pub files: Vec<PathBuf>,
    pub total_bytes: u64,
    /// Batch folder after any suffix rename.
    pub dest_folder: PathBuf,
    pub log_path: Option<PathBuf>,
}

/// Run a full import: scan the source, derive the batch folder name,
/// transfer every file, then apply the content suffix and manifest log.
pub fn run_import(options: &ImportOptions) -> Result<ImportReport> {
    if !options.source.is_dir() {
        bail!("source path {} is not a directory", options.source.display());
    }
    if options.dest.as_os_str().is_empty() {
        bail!("destination path is not set");
    }

    let scan = scan::scan_source(&options.source);
    if scan.files.is_empty() {
        bail!("no files found under {}", options.source.display());
    }

    writer::execute(options, &scan.files)
}
