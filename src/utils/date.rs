use crate::errors::{AppError, AppResult};
use crate::models::DB_DATE;
use chrono::NaiveDate;

pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DB_DATE).map_err(|_| AppError::InvalidDate(s.to_string()))
}
