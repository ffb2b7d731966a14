use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use exif::{In, Reader, Tag};

/// Read the capture date from a file's EXIF `DateTimeOriginal` tag.
/// EXIF datetimes carry no timezone; the date portion is taken as-is.
/// Any open/read/parse failure yields `None`.
pub fn exif_date(path: &Path) -> Option<NaiveDate> {
    let file = File::open(path).ok()?;
    let reader = Reader::new()
        .read_from_container(&mut BufReader::new(&file))
        .ok()?;

    let field = reader.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;
    parse_exif_datetime(&field.display_value().to_string()).map(|dt| dt.date())
}

/// Parse an EXIF datetime, normalizing the separator variants cameras emit.
fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let cleaned = s
        .replace('-', ":")
        .replace('/', ":")
        .replace('\\', ":")
        .replace('.', ":");

    NaiveDateTime::parse_from_str(&cleaned, "%Y:%m:%d %H:%M:%S").ok()
}
