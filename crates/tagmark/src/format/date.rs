//! Date parsing and PHP-style formatting.
//!
//! Formats use the single-letter codes CMS themes are written with:
//!
//! | Code | Output | Code | Output |
//! |------|--------|------|--------|
//! | `d` | day, 2 digits | `j` | day |
//! | `D` | `Mon` | `l` | `Monday` |
//! | `N` | ISO weekday 1-7 | `w` | weekday 0-6 |
//! | `z` | day of year from 0 | `t` | days in month |
//! | `F` | `January` | `M` | `Jan` |
//! | `m` | month, 2 digits | `n` | month |
//! | `Y` | `2024` | `y` | `24` |
//! | `L` | leap year 1/0 | `U` | Unix seconds |
//! | `a` / `A` | `am` / `AM` | `g` / `h` | 12-hour / padded |
//! | `G` / `H` | 24-hour / padded | `i` / `s` | minutes / seconds |
//!
//! `\` escapes the next character; anything else is copied as is.

use std::fmt::Write;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::context::Binding;
use crate::error::TagResult;

pub const DEFAULT_DATE_FORMAT: &str = "Y-m-d H:i:s";

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parses a stored date.
///
/// Accepts `Y-m-d H:i:s`, `Y-m-d H:i`, `Y-m-d` and RFC 3339.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.naive_local())
}

/// Formats a date with PHP-style format letters.
pub fn format_php(dt: &NaiveDateTime, format: &str) -> String {
    let mut out = String::new();
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        // Writing to a String cannot fail
        let _ = match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
                Ok(())
            }
            'd' => write!(out, "{:02}", dt.day()),
            'D' => write!(out, "{}", dt.format("%a")),
            'j' => write!(out, "{}", dt.day()),
            'l' => write!(out, "{}", dt.format("%A")),
            'N' => write!(out, "{}", dt.weekday().number_from_monday()),
            'w' => write!(out, "{}", dt.weekday().num_days_from_sunday()),
            'z' => write!(out, "{}", dt.ordinal0()),
            'F' => write!(out, "{}", dt.format("%B")),
            'm' => write!(out, "{:02}", dt.month()),
            'M' => write!(out, "{}", dt.format("%b")),
            'n' => write!(out, "{}", dt.month()),
            't' => write!(out, "{}", days_in_month(dt.year(), dt.month())),
            'L' => write!(out, "{}", u8::from(is_leap_year(dt.year()))),
            'Y' => write!(out, "{}", dt.year()),
            'y' => write!(out, "{:02}", dt.year().rem_euclid(100)),
            'a' => write!(out, "{}", if dt.hour() < 12 { "am" } else { "pm" }),
            'A' => write!(out, "{}", if dt.hour() < 12 { "AM" } else { "PM" }),
            'g' => write!(out, "{}", hour12(dt.hour())),
            'G' => write!(out, "{}", dt.hour()),
            'h' => write!(out, "{:02}", hour12(dt.hour())),
            'H' => write!(out, "{:02}", dt.hour()),
            'i' => write!(out, "{:02}", dt.minute()),
            's' => write!(out, "{:02}", dt.second()),
            'U' => write!(out, "{}", dt.and_utc().timestamp()),
            other => {
                out.push(other);
                Ok(())
            }
        };
    }
    out
}

/// Formats the tag's date value, or renders the tag body when it does not parse.
///
/// The pattern comes from the `format` attribute. A pattern that is a single
/// weekday or month name letter (`D`, `l`, `F`, `M`) is translated through the
/// language table, keyed by the lower-cased name.
pub fn format_date(binding: &mut Binding<'_>, raw: &str) -> TagResult {
    let Some(dt) = parse_date(raw) else {
        return binding.expand();
    };

    let format = binding
        .attr_non_empty("format")
        .unwrap_or(DEFAULT_DATE_FORMAT);
    let formatted = format_php(&dt, format);

    if matches!(format, "D" | "l" | "F" | "M") {
        let translated = binding
            .services()
            .translate(&formatted.to_lowercase())
            .filter(|t| !t.is_empty());
        return Ok(translated.unwrap_or(formatted));
    }
    Ok(formatted)
}

fn hour12(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}
