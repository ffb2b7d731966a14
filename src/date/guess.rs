use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

struct DatePattern {
    regex: &'static LazyLock<Regex>,
    two_digit_year: bool,
}

static RE_0: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})[-_](\d{2})[-_](\d{2})").unwrap());
static RE_1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{4})(\d{2})(\d{2})").unwrap());
static RE_2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{2})(\d{2})(\d{2})").unwrap());
static RE_3: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2})[-_](\d{2})[-_](\d{2})").unwrap());

static PATTERNS: &[DatePattern] = &[
    DatePattern { regex: &RE_0, two_digit_year: false }, // 2024-05-10, 2024_05_10
    DatePattern { regex: &RE_1, two_digit_year: false }, // 20240510
    DatePattern { regex: &RE_2, two_digit_year: true },  // 240510
    DatePattern { regex: &RE_3, two_digit_year: true },  // 24-05-10, 24_05_10
];

/// Two-digit years: 00-69 map to 2000-2069, 70-99 to 1970-1999.
const CENTURY_PIVOT: i32 = 70;

fn expand_year(yy: i32) -> i32 {
    if yy < CENTURY_PIVOT {
        2000 + yy
    } else {
        1900 + yy
    }
}

/// Guess a date from a bare filename. Each pattern is tried in order; only
/// its leftmost match is considered, and a match whose components are not a
/// valid calendar date rejects that pattern, not the whole filename.
pub fn guess_date_from_filename(filename: &str) -> Option<NaiveDate> {
    for pat in PATTERNS {
        let Some(caps) = pat.regex.captures(filename) else {
            continue;
        };

        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;

        let year = if pat.two_digit_year { expand_year(year) } else { year };

        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    None
}
