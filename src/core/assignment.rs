//! Many-to-many link between staff and events.

use crate::db::queries::{STAFF_COLUMNS, collect_rows, map_staff, prefixed, require_staff};
use crate::errors::AppResult;
use crate::models::staff::Staff;
use rusqlite::{Connection, params};
use std::collections::BTreeSet;

pub struct Assignment;

impl Assignment {
    /// Replace the crew of an event. Duplicates collapse; inactive staff are
    /// accepted so that later deactivation never rewrites history.
    pub fn replace(conn: &Connection, event_id: i64, staff_ids: &[i64]) -> AppResult<usize> {
        let unique: BTreeSet<i64> = staff_ids.iter().copied().collect();
        Self::check_staff(conn, &unique)?;

        conn.execute("DELETE FROM event_staff WHERE event_id = ?1", [event_id])?;

        let mut stmt =
            conn.prepare_cached("INSERT INTO event_staff (event_id, staff_id) VALUES (?1, ?2)")?;
        for sid in &unique {
            stmt.execute(params![event_id, sid])?;
        }

        Ok(unique.len())
    }

    /// Every id must name an existing staff member.
    pub fn check_staff(conn: &Connection, staff_ids: &BTreeSet<i64>) -> AppResult<()> {
        for &sid in staff_ids {
            require_staff(conn, sid)?;
        }
        Ok(())
    }

    pub fn is_assigned(conn: &Connection, event_id: i64, staff_id: i64) -> AppResult<bool> {
        let mut stmt = conn.prepare_cached(
            "SELECT 1 FROM event_staff WHERE event_id = ?1 AND staff_id = ?2 LIMIT 1",
        )?;
        Ok(stmt.exists(params![event_id, staff_id])?)
    }

    pub fn assigned_staff(conn: &Connection, event_id: i64) -> AppResult<Vec<Staff>> {
        let cols = prefixed(STAFF_COLUMNS, "s");
        let sql = format!(
            "SELECT {cols} FROM staff s
             JOIN event_staff es ON es.staff_id = s.id
             WHERE es.event_id = ?1
             ORDER BY COALESCE(s.display_name, s.login)"
        );
        collect_rows(conn, &sql, [event_id], map_staff)
    }

    pub fn remove_all(conn: &Connection, event_id: i64) -> AppResult<usize> {
        Ok(conn.execute("DELETE FROM event_staff WHERE event_id = ?1", [event_id])?)
    }
}
