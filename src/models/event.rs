use super::{DB_DATE, DB_TIME};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,                // ⇔ event.date (TEXT "YYYY-MM-DD")
    pub start_time: Option<NaiveTime>,  // ⇔ event.start_time (TEXT "HH:MM" or NULL)
    pub end_time: Option<NaiveTime>,    // ⇔ event.end_time
    pub location: String,
    pub note: String,
    pub created_at: String,
}

impl Event {
    pub fn date_str(&self) -> String {
        self.date.format(DB_DATE).to_string()
    }

    pub fn time_window(&self) -> String {
        let fmt = |t: Option<NaiveTime>| {
            t.map(|t| t.format(DB_TIME).to_string())
                .unwrap_or_else(|| "--:--".to_string())
        };
        format!("{}-{}", fmt(self.start_time), fmt(self.end_time))
    }

    /// Scheduled start as a full timestamp, if the event has a start time.
    pub fn nominal_start(&self) -> Option<NaiveDateTime> {
        self.start_time.map(|t| self.date.and_time(t))
    }
}
