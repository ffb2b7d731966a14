use std::path::{Path, PathBuf};

/// A file discovered in the source tree.
#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Full path to the source file
    pub path: PathBuf,
    /// Just the filename
    pub filename: String,
    /// File size in bytes
    pub size: u64,
}

impl MediaFile {
    pub fn new(path: PathBuf, size: u64) -> Self {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();
        Self {
            path,
            filename,
            size,
        }
    }
}

/// Broad content classification, used for the batch folder suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

/// Extensions mime_guess has no useful mapping for
const EXTRA_IMAGE_EXTENSIONS: &[&str] = &["raw"];
const EXTRA_VIDEO_EXTENSIONS: &[&str] = &["mts"];

/// Classify a file by its extension.
pub fn kind(path: &Path) -> MediaKind {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        let ext = ext.to_lowercase();
        if EXTRA_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return MediaKind::Image;
        }
        if EXTRA_VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            return MediaKind::Video;
        }
    }

    match mime_guess::from_path(path).first() {
        Some(mime) if mime.type_() == mime_guess::mime::IMAGE => MediaKind::Image,
        Some(mime) if mime.type_() == mime_guess::mime::VIDEO => MediaKind::Video,
        _ => MediaKind::Other,
    }
}
