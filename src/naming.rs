use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use regex::Regex;
use walkdir::WalkDir;

use crate::media::{self, MediaKind};
use crate::NamingMode;

static SHORT_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((.*?)\)").unwrap());

/// Extract the parenthesized short code from a source label.
/// `"Living Room Camera (Cam_LR)"` yields `"Cam_LR"`; a label without
/// parentheses yields the empty string.
pub fn short_code(label: &str) -> &str {
    SHORT_CODE_RE
        .captures(label)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or("")
}

/// Compose the batch folder name from the resolved date range and label.
pub fn main_folder_name(
    earliest: NaiveDate,
    latest: NaiveDate,
    label: &str,
    naming: NamingMode,
) -> String {
    let code = short_code(label);
    match naming {
        NamingMode::SingleDate => format!("{}_{}", earliest.format("%Y-%m-%d"), code),
        NamingMode::DateRange => format!(
            "{}_do_{}_{}",
            earliest.format("%Y-%m-%d"),
            latest.format("%Y-%m-%d"),
            code
        ),
    }
}

/// Decide the content marker for a finished batch folder by scanning the
/// extensions of everything under it: `_P` photos only, `_M` videos only,
/// `_PM` both, empty when neither is present.
pub fn content_suffix(folder: &Path) -> &'static str {
    let mut image_found = false;
    let mut video_found = false;

    for entry in WalkDir::new(folder).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        match media::kind(entry.path()) {
            MediaKind::Image => image_found = true,
            MediaKind::Video => video_found = true,
            MediaKind::Other => {}
        }
        if image_found && video_found {
            break;
        }
    }

    match (image_found, video_found) {
        (true, true) => "_PM",
        (true, false) => "_P",
        (false, true) => "_M",
        (false, false) => "",
    }
}

/// Rename the batch folder with its content suffix; returns the final path.
/// A folder with no recognized content keeps its name.
pub fn apply_suffix(folder: &Path) -> Result<PathBuf> {
    let suffix = content_suffix(folder);
    if suffix.is_empty() {
        return Ok(folder.to_path_buf());
    }

    let mut name = folder
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    name.push_str(suffix);
    let renamed = folder.with_file_name(name);

    fs::rename(folder, &renamed)
        .with_context(|| format!("renaming {} -> {}", folder.display(), renamed.display()))?;
    info!("suffixed batch folder: {}", renamed.display());
    Ok(renamed)
}
