//! Event lifecycle: `absent → created → edited* → deleted`.
//!
//! `create`, `update` and `delete` each run inside one transaction that
//! covers the event row, its bindings (and their ledger movements), its
//! crew and its timesheets. Either everything commits or nothing does.
//!
//! After the commit the notifier hears about the event first, then about
//! every binding that was removed or created along with it.

use crate::core::assignment::Assignment;
use crate::core::binding::Binding;
use crate::core::notify::{Change, ChangeKind, ChangeNotifier, EntityKind};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{
    EVENT_COLUMNS, collect_rows, map_event, now_str, prefixed, require_event,
};
use crate::errors::{AppError, AppResult};
use crate::models::binding::EventProductBinding;
use crate::models::event::Event;
use crate::models::{DB_DATE, DB_TIME};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, params};
use std::collections::{BTreeMap, BTreeSet};

/// Editable fields of an event.
#[derive(Debug, Clone)]
pub struct EventFields {
    pub name: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: String,
    pub note: String,
}

impl EventFields {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("event name is required".into()));
        }
        if self.location.trim().is_empty() {
            return Err(AppError::Validation("event location is required".into()));
        }
        Ok(())
    }

    fn time_str(t: Option<NaiveTime>) -> Option<String> {
        t.map(|t| t.format(DB_TIME).to_string())
    }
}

fn notify_bindings(notifier: &dyn ChangeNotifier, bindings: &[EventProductBinding], kind: ChangeKind) {
    for b in bindings {
        notifier.notify(&Change::new(EntityKind::Binding, b.id, kind));
    }
}

pub struct Scheduler;

impl Scheduler {
    /// Validation shared by create and update; runs before any write.
    fn precheck(
        conn: &Connection,
        fields: &EventFields,
        products: &BTreeMap<i64, i64>,
        staff_ids: &[i64],
    ) -> AppResult<()> {
        fields.validate()?;
        Binding::check_desired(conn, products)?;
        let crew: BTreeSet<i64> = staff_ids.iter().copied().collect();
        Assignment::check_staff(conn, &crew)?;
        Ok(())
    }

    pub fn create(
        pool: &mut DbPool,
        notifier: &dyn ChangeNotifier,
        fields: &EventFields,
        products: &BTreeMap<i64, i64>,
        staff_ids: &[i64],
    ) -> AppResult<Event> {
        Self::precheck(&pool.conn, fields, products, staff_ids)?;

        let tx = pool.transaction()?;

        tx.execute(
            "INSERT INTO event (name, date, start_time, end_time, location, note, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                fields.name.trim(),
                fields.date.format(DB_DATE).to_string(),
                EventFields::time_str(fields.start_time),
                EventFields::time_str(fields.end_time),
                fields.location.trim(),
                fields.note.trim(),
                now_str(),
            ],
        )?;
        let id = tx.last_insert_rowid();

        let bound = Binding::rebind_all(&tx, id, products)?;
        Assignment::replace(&tx, id, staff_ids)?;
        ttlog(
            &tx,
            "event_create",
            &format!("event {id}"),
            &format!("{} on {}", fields.name.trim(), fields.date),
        )?;

        tx.commit()?;

        notifier.notify(&Change::new(EntityKind::Event, id, ChangeKind::Created));
        notify_bindings(notifier, &bound, ChangeKind::Created);
        require_event(&pool.conn, id)
    }

    /// Overwrite all fields, then re-apply the product list and crew in full.
    pub fn update(
        pool: &mut DbPool,
        notifier: &dyn ChangeNotifier,
        event_id: i64,
        fields: &EventFields,
        products: &BTreeMap<i64, i64>,
        staff_ids: &[i64],
    ) -> AppResult<Event> {
        require_event(&pool.conn, event_id)?;
        Self::precheck(&pool.conn, fields, products, staff_ids)?;

        let tx = pool.transaction()?;

        tx.execute(
            "UPDATE event
             SET name = ?1, date = ?2, start_time = ?3, end_time = ?4,
                 location = ?5, note = ?6
             WHERE id = ?7",
            params![
                fields.name.trim(),
                fields.date.format(DB_DATE).to_string(),
                EventFields::time_str(fields.start_time),
                EventFields::time_str(fields.end_time),
                fields.location.trim(),
                fields.note.trim(),
                event_id,
            ],
        )?;

        let removed = Binding::unbind_all(&tx, event_id)?;
        let bound = Binding::rebind_all(&tx, event_id, products)?;
        Assignment::replace(&tx, event_id, staff_ids)?;
        ttlog(
            &tx,
            "event_update",
            &format!("event {event_id}"),
            &format!("{} on {}", fields.name.trim(), fields.date),
        )?;

        tx.commit()?;

        notifier.notify(&Change::new(EntityKind::Event, event_id, ChangeKind::Updated));
        notify_bindings(notifier, &removed, ChangeKind::Deleted);
        notify_bindings(notifier, &bound, ChangeKind::Created);
        require_event(&pool.conn, event_id)
    }

    /// Return all equipment, drop crew and timesheets, then the event itself.
    pub fn delete(
        pool: &mut DbPool,
        notifier: &dyn ChangeNotifier,
        event_id: i64,
    ) -> AppResult<Event> {
        let event = require_event(&pool.conn, event_id)?;

        let tx = pool.transaction()?;

        let returned = Binding::unbind_all(&tx, event_id)?;
        Assignment::remove_all(&tx, event_id)?;
        let hours = tx.execute("DELETE FROM timesheet WHERE event_id = ?1", [event_id])?;
        tx.execute("DELETE FROM event WHERE id = ?1", [event_id])?;
        ttlog(
            &tx,
            "event_delete",
            &format!("event {event_id}"),
            &format!(
                "{}: {} products returned, {hours} timesheet entries removed",
                event.name,
                returned.len()
            ),
        )?;

        tx.commit()?;

        notifier.notify(&Change::new(EntityKind::Event, event_id, ChangeKind::Deleted));
        notify_bindings(notifier, &returned, ChangeKind::Deleted);
        Ok(event)
    }

    pub fn get(conn: &Connection, event_id: i64) -> AppResult<Event> {
        require_event(conn, event_id)
    }

    /// All events, optionally limited to an inclusive date range.
    pub fn list(conn: &Connection, range: Option<(NaiveDate, NaiveDate)>) -> AppResult<Vec<Event>> {
        match range {
            None => {
                let sql = format!("SELECT {EVENT_COLUMNS} FROM event ORDER BY date, start_time, id");
                collect_rows(conn, &sql, [], map_event)
            }
            Some((from, to)) => {
                let sql = format!(
                    "SELECT {EVENT_COLUMNS} FROM event
                     WHERE date BETWEEN ?1 AND ?2
                     ORDER BY date, start_time, id"
                );
                collect_rows(
                    conn,
                    &sql,
                    params![from.format(DB_DATE).to_string(), to.format(DB_DATE).to_string()],
                    map_event,
                )
            }
        }
    }

    /// Events the staff member is assigned to ("my events").
    pub fn list_for_staff(conn: &Connection, staff_id: i64) -> AppResult<Vec<Event>> {
        let cols = prefixed(EVENT_COLUMNS, "e");
        let sql = format!(
            "SELECT {cols} FROM event e
             JOIN event_staff es ON es.event_id = e.id
             WHERE es.staff_id = ?1
             ORDER BY e.date, e.start_time, e.id"
        );
        collect_rows(conn, &sql, [staff_id], map_event)
    }

    /// Assigned events on one calendar day.
    pub fn list_for_day(conn: &Connection, staff_id: i64, day: NaiveDate) -> AppResult<Vec<Event>> {
        Ok(Self::list_for_staff(conn, staff_id)?
            .into_iter()
            .filter(|e| e.date == day)
            .collect())
    }

    /// Rows still pointing at a deleted event; reported by `db --check`.
    pub fn orphan_count(conn: &Connection) -> AppResult<i64> {
        let n: i64 = conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM event_product WHERE event_id NOT IN (SELECT id FROM event))
              + (SELECT COUNT(*) FROM event_staff   WHERE event_id NOT IN (SELECT id FROM event))
              + (SELECT COUNT(*) FROM timesheet     WHERE event_id NOT IN (SELECT id FROM event))",
            [],
            |row| row.get(0),
        )?;
        Ok(n)
    }
}
