use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use crate::date::{self, DatePriority, DateSource};
use crate::scan;
use crate::{NamingMode, SubfolderMode};

/// Advisory defaults derived from a scan. They pre-populate the import
/// configuration; the user keeps the final say.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub naming: NamingMode,
    pub subfolders: SubfolderMode,
    /// Where most dates would come from
    pub dominant_source: DateSource,
}

/// How dates would resolve across a source tree.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub total_files: usize,
    pub total_bytes: u64,
    pub exif_dates: usize,
    pub filename_dates: usize,
    pub creation_dates: usize,
    pub unresolved: usize,
    pub distinct_dates: BTreeSet<NaiveDate>,
    pub recommendation: Recommendation,
}

/// Run the date resolver over every file under `root` and aggregate counts.
pub fn analyze_source(root: &Path, priority: DatePriority) -> Result<Analysis> {
    if !root.is_dir() {
        bail!("source path {} is not a directory", root.display());
    }

    let scan = scan::scan_source(root);

    let mut exif_dates = 0;
    let mut filename_dates = 0;
    let mut creation_dates = 0;
    let mut unresolved = 0;
    let mut distinct_dates = BTreeSet::new();

    for file in &scan.files {
        match date::resolve(&file.path, priority) {
            Some(r) => {
                match r.source {
                    DateSource::Exif => exif_dates += 1,
                    DateSource::Filename => filename_dates += 1,
                    DateSource::Creation => creation_dates += 1,
                }
                distinct_dates.insert(r.date);
            }
            None => {
                debug!("no date for {}", file.path.display());
                unresolved += 1;
            }
        }
    }

    let recommendation = if distinct_dates.len() > 1 {
        Recommendation {
            naming: NamingMode::DateRange,
            subfolders: SubfolderMode::PerDay,
            dominant_source: dominant_source(exif_dates, filename_dates),
        }
    } else {
        Recommendation {
            naming: NamingMode::SingleDate,
            subfolders: SubfolderMode::SingleFolder,
            dominant_source: dominant_source(exif_dates, filename_dates),
        }
    };

    Ok(Analysis {
        total_files: scan.files.len(),
        total_bytes: scan.total_bytes,
        exif_dates,
        filename_dates,
        creation_dates,
        unresolved,
        distinct_dates,
        recommendation,
    })
}

fn dominant_source(exif_dates: usize, filename_dates: usize) -> DateSource {
    if exif_dates > 0 {
        DateSource::Exif
    } else if filename_dates > 0 {
        DateSource::Filename
    } else {
        DateSource::Creation
    }
}
