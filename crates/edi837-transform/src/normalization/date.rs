//! Date parsing and X12/NCPDP date rendering.
//!
//! Accepted inputs:
//! - `YYYY-MM-DD`
//! - ISO 8601 date-times, with or without fraction and offset
//! - `YYYY-MM-DD HH:MM:SS` (space separated)
//! - `YYYYMMDD`
//! - `MM/DD/YYYY`
//!
//! When a date-time carries an offset, the calendar date as written is used;
//! no timezone conversion happens.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use edi837_model::{FormatError, Result};

/// Output shapes used by the 837 and its embedded NCPDP data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `CCYYMMDD`, used by DTP, DMG and GS.
    Ccyymmdd,
    /// `YYMMDD`, used by ISA09.
    Yymmdd,
    /// `MMDDCCYY`, used inside the NCPDP K3 record.
    Mmddccyy,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            Self::Ccyymmdd => "%Y%m%d",
            Self::Yymmdd => "%y%m%d",
            Self::Mmddccyy => "%m%d%Y",
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a date in any accepted shape.
///
/// # Errors
///
/// Returns [`FormatError::InvalidDate`] for blank or unrecognized input and for
/// years outside `1..=9999`.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let date = parse_any(trimmed).ok_or_else(|| FormatError::invalid_date(value))?;
    if !(1..=9999).contains(&date.year()) {
        return Err(FormatError::invalid_date(value));
    }
    Ok(date)
}

fn parse_any(value: &str) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }
    if let Some(date) = parse_compact(value) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// `YYYYMMDD` with exactly eight digits.
fn parse_compact(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = value[0..4].parse().ok()?;
    let month = value[4..6].parse().ok()?;
    let day = value[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn format_date(date: NaiveDate, format: DateFormat) -> String {
    date.format(format.pattern()).to_string()
}

/// Parse and render in one step.
pub fn convert_date(value: &str, format: DateFormat) -> Result<String> {
    parse_date(value).map(|date| format_date(date, format))
}
