use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Excel serial number and number format for date, datetime or time strings.
pub(crate) fn parse_to_excel_date(s: &str) -> Option<(&'static str, f64)> {
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return excel_serial(&dt).map(|serial| ("yyyy-mm-dd hh:mm", serial));
        }
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return excel_serial(&d.and_time(NaiveTime::MIN)).map(|serial| ("yyyy-mm-dd", serial));
    }

    if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M") {
        let seconds = t.num_seconds_from_midnight() as f64;
        return Some(("hh:mm", seconds / 86400.0));
    }

    None
}

fn excel_serial(dt: &NaiveDateTime) -> Option<f64> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let duration = *dt - epoch;

    let days = duration.num_days() as f64;
    let secs = (duration.num_seconds() - duration.num_days() * 86400) as f64;
    Some(days + secs / 86400.0)
}
