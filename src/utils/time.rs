//! Time utilities: parsing HH:MM, the `--at` clock override, formatting minutes.

use crate::errors::{AppError, AppResult};
use crate::models::DB_TIME;
use chrono::{Local, NaiveDateTime, NaiveTime};

pub fn parse_time(t: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), DB_TIME).map_err(|_| AppError::InvalidTime(t.to_string()))
}

pub fn parse_optional_time(input: Option<&str>) -> AppResult<Option<NaiveTime>> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_time(s).map(Some),
    }
}

/// `YYYY-MM-DD HH:MM` (or with seconds).
pub fn parse_datetime(s: &str) -> AppResult<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .map_err(|_| AppError::InvalidTime(s.to_string()))
}

/// The clock used by time-tracking commands, unless overridden with `--at`.
pub fn now_or(at: Option<&str>) -> AppResult<NaiveDateTime> {
    match at {
        Some(s) => parse_datetime(s),
        None => Ok(Local::now().naive_local()),
    }
}

pub fn format_time(t: Option<NaiveTime>) -> String {
    t.map(|t| t.format(DB_TIME).to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
