use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDate};

/// Calendar date of the filesystem creation timestamp, falling back to the
/// modification timestamp on platforms that do not report creation time.
/// Any OS-level failure yields `None`.
pub fn creation_date(path: &Path) -> Option<NaiveDate> {
    let meta = std::fs::metadata(path).ok()?;
    let ts: SystemTime = meta.created().or_else(|_| meta.modified()).ok()?;
    let dt: DateTime<Local> = ts.into();
    Some(dt.naive_local().date())
}
