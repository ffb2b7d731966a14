pub mod creation;
pub mod exif;
pub mod guess;

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which resolver produced a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateSource {
    Exif,
    Filename,
    Creation,
}

impl fmt::Display for DateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateSource::Exif => write!(f, "EXIF"),
            DateSource::Filename => write!(f, "filename"),
            DateSource::Creation => write!(f, "creation time"),
        }
    }
}

/// A resolved date tagged with where it came from.
#[derive(Debug, Clone, Copy)]
pub struct DateResolution {
    pub date: NaiveDate,
    pub source: DateSource,
}

/// Whether EXIF is consulted before the filename, or skipped entirely.
/// The filesystem creation timestamp is the last resort in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum DatePriority {
    ExifFirst,
    FilenameOnly,
}

type Resolver = fn(&Path) -> Option<NaiveDate>;

fn from_exif(path: &Path) -> Option<NaiveDate> {
    exif::exif_date(path)
}

fn from_filename(path: &Path) -> Option<NaiveDate> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(guess::guess_date_from_filename)
}

fn from_creation(path: &Path) -> Option<NaiveDate> {
    creation::creation_date(path)
}

const EXIF_FIRST: &[(DateSource, Resolver)] = &[
    (DateSource::Exif, from_exif),
    (DateSource::Filename, from_filename),
    (DateSource::Creation, from_creation),
];

const FILENAME_ONLY: &[(DateSource, Resolver)] = &[
    (DateSource::Filename, from_filename),
    (DateSource::Creation, from_creation),
];

/// Try each resolver in priority order; the first one that yields a date
/// wins. Resolver failures are silent, a file with no date at all is `None`.
pub fn resolve(path: &Path, priority: DatePriority) -> Option<DateResolution> {
    let chain = match priority {
        DatePriority::ExifFirst => EXIF_FIRST,
        DatePriority::FilenameOnly => FILENAME_ONLY,
    };

    chain
        .iter()
        .find_map(|&(source, resolver)| resolver(path).map(|date| DateResolution { date, source }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Minimal JPEG carrying only an Exif APP1 segment with a
    /// `DateTimeOriginal` of `2023:01:15 10:00:00`.
    fn exif_jpeg() -> Vec<u8> {
        let mut tiff = Vec::new();
        // TIFF header, little-endian, IFD0 at offset 8
        tiff.extend_from_slice(b"II");
        tiff.extend_from_slice(&42u16.to_le_bytes());
        tiff.extend_from_slice(&8u32.to_le_bytes());
        // IFD0: one entry, the Exif IFD pointer (LONG) -> offset 26
        tiff.extend_from_slice(&1u16.to_le_bytes());
        tiff.extend_from_slice(&0x8769u16.to_le_bytes());
        tiff.extend_from_slice(&4u16.to_le_bytes());
        tiff.extend_from_slice(&1u32.to_le_bytes());
        tiff.extend_from_slice(&26u32.to_le_bytes());
        tiff.extend_from_slice(&0u32.to_le_bytes());
        // Exif IFD: one entry, DateTimeOriginal (ASCII x20) -> offset 44
        tiff.extend_from_slice(&1u16.to_le_bytes());
        tiff.extend_from_slice(&0x9003u16.to_le_bytes());
        tiff.extend_from_slice(&2u16.to_le_bytes());
        tiff.extend_from_slice(&20u32.to_le_bytes());
        tiff.extend_from_slice(&44u32.to_le_bytes());
        tiff.extend_from_slice(&0u32.to_le_bytes());
        tiff.extend_from_slice(b"2023:01:15 10:00:00\0");
        assert_eq!(tiff.len(), 64);

        let mut jpeg = Vec::new();
        jpeg.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE1]);
        jpeg.extend_from_slice(&(2u16 + 6 + 64).to_be_bytes());
        jpeg.extend_from_slice(b"Exif\0\0");
        jpeg.extend_from_slice(&tiff);
        jpeg.extend_from_slice(&[0xFF, 0xD9]);
        jpeg
    }

    #[test]
    fn test_exif_beats_conflicting_filename_when_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2024-05-10_x.jpg");
        fs::write(&path, exif_jpeg()).unwrap();

        let r = resolve(&path, DatePriority::ExifFirst).unwrap();
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
        assert_eq!(r.source, DateSource::Exif);
    }

    #[test]
    fn test_filename_only_mode_skips_exif() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2024-05-10_x.jpg");
        fs::write(&path, exif_jpeg()).unwrap();

        let r = resolve(&path, DatePriority::FilenameOnly).unwrap();
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert_eq!(r.source, DateSource::Filename);
    }

    #[test]
    fn test_dated_filename_resolves_in_both_modes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2024-05-10_hike.bin");
        fs::write(&path, b"not an image").unwrap();

        for priority in [DatePriority::ExifFirst, DatePriority::FilenameOnly] {
            let r = resolve(&path, priority).unwrap();
            assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
            assert_eq!(r.source, DateSource::Filename);
        }
    }

    #[test]
    fn test_undated_file_falls_back_to_creation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"hello").unwrap();

        let r = resolve(&path, DatePriority::ExifFirst).unwrap();
        assert_eq!(r.source, DateSource::Creation);
    }

    #[test]
    fn test_missing_file_has_no_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.jpg");
        assert!(resolve(&path, DatePriority::ExifFirst).is_none());
    }
}
