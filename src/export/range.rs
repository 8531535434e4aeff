use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

fn invalid(what: &str) -> AppError {
    AppError::InvalidDate(what.to_string())
}

/// First and last day covered by `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
fn period_bounds(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match p.len() {
        4 => {
            let y: i32 = p.parse().map_err(|_| invalid(p))?;
            let first = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| invalid(p))?;
            let last = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| invalid(p))?;
            Ok((first, last))
        }
        7 => {
            let first = NaiveDate::parse_from_str(&format!("{p}-01"), "%Y-%m-%d")
                .map_err(|_| invalid(p))?;
            let (ny, nm) = if first.month() == 12 {
                (first.year() + 1, 1)
            } else {
                (first.year(), first.month() + 1)
            };
            let last = NaiveDate::from_ymd_opt(ny, nm, 1)
                .and_then(|d| d.pred_opt())
                .ok_or_else(|| invalid(p))?;
            Ok((first, last))
        }
        10 => {
            let d = NaiveDate::parse_from_str(p, "%Y-%m-%d").map_err(|_| invalid(p))?;
            Ok((d, d))
        }
        _ => Err(invalid(p)),
    }
}

/// Parse `--range`.
///
/// Accepts `YYYY`, `YYYY-MM`, `YYYY-MM-DD` or `start:end` where both sides
/// share one of those shapes. Returns inclusive bounds.
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let r = r.trim();
    match r.split_once(':') {
        None => period_bounds(r),
        Some((start, end)) => {
            let (start, end) = (start.trim(), end.trim());
            if start.len() != end.len() {
                return Err(AppError::InvalidDate(format!(
                    "{r}: start and end must have the same format"
                )));
            }
            let (from, _) = period_bounds(start)?;
            let (_, to) = period_bounds(end)?;
            if from > to {
                return Err(AppError::InvalidDate(format!("{r}: start is after end")));
            }
            Ok((from, to))
        }
    }
}
