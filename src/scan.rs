use std::path::Path;

use log::warn;
use walkdir::WalkDir;

use crate::media::MediaFile;

/// Result of walking the source tree.
pub struct ScanResult {
    /// Every regular file found, in walk order
    pub files: Vec<MediaFile>,
    /// Combined size in bytes
    pub total_bytes: u64,
}

/// Walk a source tree and collect every regular file. Unreadable entries
/// are skipped with a warning, not treated as fatal.
pub fn scan_source(root: &Path) -> ScanResult {
    let mut files = Vec::new();
    let mut total_bytes = 0u64;

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        total_bytes += size;
        files.push(MediaFile::new(entry.into_path(), size));
    }

    ScanResult { files, total_bytes }
}
