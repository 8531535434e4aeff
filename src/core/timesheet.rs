//! Clock-in / clock-out per (staff, event).
//!
//! An entry is `open` while `ended_at` is NULL and `closed` once clock-out
//! sets the end and the credited minutes. Closed entries are never reopened.
//! Credited time always moves in half-hour steps:
//!
//! - clocking in before (or at) the scheduled start credits from the start;
//! - clocking in late credits from the next half-hour mark after `now`;
//! - clock-out rounds the elapsed minutes up to a multiple of 30.

use crate::db::log::ttlog;
use crate::db::queries::{
    TIMESHEET_COLUMNS, collect_rows, datetime_str, map_timesheet, require_event, require_staff,
};
use crate::errors::{AppError, AppResult};
use crate::models::event::Event;
use crate::models::timesheet::TimesheetEntry;
use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use std::collections::BTreeMap;

pub const SLOT_MINUTES: i64 = 30;

/// Round minutes up to the next multiple of 30 (0 stays 0).
pub fn round_up_half_hour(minutes: i64) -> i64 {
    if minutes <= 0 {
        return 0;
    }
    let (q, r) = (minutes / SLOT_MINUTES, minutes % SLOT_MINUTES);
    (q + i64::from(r != 0)) * SLOT_MINUTES
}

/// First half-hour mark strictly after `now`.
pub fn next_half_hour(now: NaiveDateTime) -> NaiveDateTime {
    let floored_minute = now.minute() - now.minute() % SLOT_MINUTES as u32;
    // minute < 60 and hour < 24 come straight from a valid time
    let floor = now.date().and_time(
        NaiveTime::from_hms_opt(now.hour(), floored_minute, 0).unwrap_or(NaiveTime::MIN),
    );
    floor + Duration::minutes(SLOT_MINUTES)
}

/// Start credited to a staff member clocking in at `now`.
pub fn effective_start(event: &Event, now: NaiveDateTime) -> NaiveDateTime {
    match event.nominal_start() {
        None => now,
        Some(nominal) if now <= nominal => nominal,
        Some(_) => next_half_hour(now),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunningEntry {
    pub entry_id: i64,
    pub staff_id: i64,
    pub staff_name: String,
    pub event_id: i64,
    pub event_name: String,
    pub start: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventMinutes {
    pub event_id: i64,
    pub event_name: String,
    pub event_date: String,
    pub minutes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffMinutes {
    pub staff_id: i64,
    pub staff_name: String,
    pub total_minutes: i64,
    pub events: Vec<EventMinutes>,
}

/// Read-side projection of all timesheet rows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimesheetSummary {
    pub running: Vec<RunningEntry>,
    pub per_staff: Vec<StaffMinutes>,
    pub per_event: Vec<EventMinutes>,
}

pub struct Timesheet;

impl Timesheet {
    pub fn open_entry(
        conn: &Connection,
        event_id: i64,
        staff_id: i64,
    ) -> AppResult<Option<TimesheetEntry>> {
        let sql = format!(
            "SELECT {TIMESHEET_COLUMNS} FROM timesheet
             WHERE event_id = ?1 AND staff_id = ?2 AND ended_at IS NULL"
        );
        Ok(conn
            .query_row(&sql, params![event_id, staff_id], map_timesheet)
            .optional()?)
    }

    /// The entry a staff member is currently clocked into, on any event.
    pub fn running_for(conn: &Connection, staff_id: i64) -> AppResult<Option<TimesheetEntry>> {
        let sql = format!(
            "SELECT {TIMESHEET_COLUMNS} FROM timesheet
             WHERE staff_id = ?1 AND ended_at IS NULL
             ORDER BY id DESC LIMIT 1"
        );
        Ok(conn.query_row(&sql, [staff_id], map_timesheet).optional()?)
    }

    pub fn clock_in(
        conn: &Connection,
        event_id: i64,
        staff_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<TimesheetEntry> {
        let event = require_event(conn, event_id)?;
        require_staff(conn, staff_id)?;

        if event.date != now.date() {
            return Err(AppError::Policy(format!(
                "clock-in for '{}' is only possible on {}",
                event.name,
                event.date_str()
            )));
        }

        if Self::open_entry(conn, event_id, staff_id)?.is_some() {
            return Err(AppError::Conflict(format!(
                "staff {staff_id} is already clocked in to event {event_id}"
            )));
        }

        let start = effective_start(&event, now);
        conn.execute(
            "INSERT INTO timesheet (event_id, staff_id, started_at, ended_at, minutes)
             VALUES (?1, ?2, ?3, NULL, 0)",
            params![event_id, staff_id, datetime_str(&start)],
        )?;
        let id = conn.last_insert_rowid();

        ttlog(
            conn,
            "clock_in",
            &format!("event {event_id}"),
            &format!("staff {staff_id} from {}", start.format("%H:%M")),
        )?;

        Ok(TimesheetEntry {
            id,
            event_id,
            staff_id,
            start: Some(start),
            end: None,
            minutes: 0,
        })
    }

    pub fn clock_out(
        conn: &Connection,
        event_id: i64,
        staff_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<TimesheetEntry> {
        require_event(conn, event_id)?;
        require_staff(conn, staff_id)?;

        let mut entry = Self::open_entry(conn, event_id, staff_id)?.ok_or_else(|| {
            AppError::Conflict(format!(
                "staff {staff_id} has no running entry for event {event_id}"
            ))
        })?;

        // Entries always get a start on clock-in; fall back to `now` for rows
        // imported without one.
        let start = entry.start.unwrap_or(now);

        // Clock skew can put `now` before the start; credit nothing then.
        let elapsed = (now - start).num_minutes().max(0);
        let rounded = round_up_half_hour(elapsed);
        let end = start + Duration::minutes(rounded);

        conn.execute(
            "UPDATE timesheet SET started_at = ?1, ended_at = ?2, minutes = ?3 WHERE id = ?4",
            params![datetime_str(&start), datetime_str(&end), rounded, entry.id],
        )?;

        ttlog(
            conn,
            "clock_out",
            &format!("event {event_id}"),
            &format!("staff {staff_id}: {rounded} min"),
        )?;

        entry.start = Some(start);
        entry.end = Some(end);
        entry.minutes = rounded;
        Ok(entry)
    }

    /// Administrative bulk delete, for one event or for everything.
    pub fn reset(conn: &Connection, event_id: Option<i64>) -> AppResult<usize> {
        let removed = match event_id {
            Some(eid) => conn.execute("DELETE FROM timesheet WHERE event_id = ?1", [eid])?,
            None => conn.execute("DELETE FROM timesheet", [])?,
        };

        let target = event_id
            .map(|e| format!("event {e}"))
            .unwrap_or_else(|| "all".to_string());
        ttlog(conn, "hours_reset", &target, &format!("{removed} entries removed"))?;

        Ok(removed)
    }

    pub fn entries_for_event(conn: &Connection, event_id: i64) -> AppResult<Vec<TimesheetEntry>> {
        let sql = format!("SELECT {TIMESHEET_COLUMNS} FROM timesheet WHERE event_id = ?1 ORDER BY id");
        collect_rows(conn, &sql, [event_id], map_timesheet)
    }

    /// Totals over closed entries; open entries are listed as running.
    /// With `staff_filter`, only that staff member's rows are considered.
    pub fn summary(conn: &Connection, staff_filter: Option<i64>) -> AppResult<TimesheetSummary> {
        struct Row {
            entry: TimesheetEntry,
            staff_name: String,
            event_name: String,
            event_date: String,
        }

        let rows = collect_rows(
            conn,
            "SELECT t.id, t.event_id, t.staff_id, t.started_at, t.ended_at, t.minutes,
                    COALESCE(s.display_name, s.login) AS staff_name,
                    e.name AS event_name, e.date AS event_date
             FROM timesheet t
             JOIN staff s ON s.id = t.staff_id
             JOIN event e ON e.id = t.event_id
             WHERE ?1 IS NULL OR t.staff_id = ?1
             ORDER BY t.id DESC",
            [staff_filter],
            |row| {
                Ok(Row {
                    entry: map_timesheet(row)?,
                    staff_name: row.get("staff_name")?,
                    event_name: row.get("event_name")?,
                    event_date: row.get("event_date")?,
                })
            },
        )?;

        let mut summary = TimesheetSummary::default();
        let mut per_staff: BTreeMap<i64, StaffMinutes> = BTreeMap::new();
        let mut per_staff_event: BTreeMap<(i64, i64), EventMinutes> = BTreeMap::new();
        let mut per_event: BTreeMap<i64, EventMinutes> = BTreeMap::new();

        for r in rows {
            let e = &r.entry;
            if e.is_open() {
                summary.running.push(RunningEntry {
                    entry_id: e.id,
                    staff_id: e.staff_id,
                    staff_name: r.staff_name,
                    event_id: e.event_id,
                    event_name: r.event_name,
                    start: e.start,
                });
                continue;
            }

            let event_minutes = || EventMinutes {
                event_id: e.event_id,
                event_name: r.event_name.clone(),
                event_date: r.event_date.clone(),
                minutes: 0,
            };

            per_staff
                .entry(e.staff_id)
                .or_insert_with(|| StaffMinutes {
                    staff_id: e.staff_id,
                    staff_name: r.staff_name.clone(),
                    total_minutes: 0,
                    events: Vec::new(),
                })
                .total_minutes += e.minutes;
            per_staff_event
                .entry((e.staff_id, e.event_id))
                .or_insert_with(event_minutes)
                .minutes += e.minutes;
            per_event
                .entry(e.event_id)
                .or_insert_with(event_minutes)
                .minutes += e.minutes;
        }

        for ((staff_id, _), em) in per_staff_event {
            if let Some(s) = per_staff.get_mut(&staff_id) {
                s.events.push(em);
            }
        }

        summary.per_staff = per_staff.into_values().collect();
        summary.per_event = per_event.into_values().collect();
        Ok(summary)
    }
}
