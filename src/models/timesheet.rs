use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TimesheetEntry {
    pub id: i64,
    pub event_id: i64,
    pub staff_id: i64,
    pub start: Option<NaiveDateTime>,
    /// `None` while the entry is open.
    pub end: Option<NaiveDateTime>,
    /// Credited minutes, always a multiple of 30 once closed.
    pub minutes: i64,
}

impl TimesheetEntry {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}
