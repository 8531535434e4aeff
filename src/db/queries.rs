//! Row mapping and single-row lookups shared by the core modules.

use crate::errors::{AppError, AppResult};
use crate::models::binding::{BoundProduct, EventProductBinding};
use crate::models::event::Event;
use crate::models::movement::{MovementKind, StockMovement};
use crate::models::product::{Category, Product};
use crate::models::staff::{Role, Staff};
use crate::models::timesheet::TimesheetEntry;
use crate::models::{DB_DATE, DB_DATETIME, DB_TIME};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row};

pub const EVENT_COLUMNS: &str =
    "id, name, date, start_time, end_time, location, note, created_at";
pub const PRODUCT_COLUMNS: &str = "id, name, unit, category, created_at";
pub const STAFF_COLUMNS: &str = "id, login, display_name, role, active, inventory_grant";
pub const MOVEMENT_COLUMNS: &str = "id, product_id, event_id, kind, quantity, created_at";
pub const TIMESHEET_COLUMNS: &str = "id, event_id, staff_id, started_at, ended_at, minutes";

/// `"id, name"` → `"e.id, e.name"` for joins.
pub fn prefixed(columns: &str, alias: &str) -> String {
    columns
        .split(", ")
        .map(|c| format!("{alias}.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn now_str() -> String {
    Local::now().naive_local().format(DB_DATETIME).to_string()
}

pub fn datetime_str(dt: &NaiveDateTime) -> String {
    dt.format(DB_DATETIME).to_string()
}

/// Wrap a bad TEXT value into the rusqlite conversion error.
fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(err))
}

fn parse_date_col(row: &Row, col: &str) -> Result<NaiveDate> {
    let s: String = row.get(col)?;
    NaiveDate::parse_from_str(&s, DB_DATE).map_err(|_| conversion_error(0, AppError::InvalidDate(s)))
}

fn parse_time_col(row: &Row, col: &str) -> Result<Option<NaiveTime>> {
    let s: Option<String> = row.get(col)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(t) => NaiveTime::parse_from_str(t, DB_TIME)
            .map(Some)
            .map_err(|_| conversion_error(0, AppError::InvalidTime(t.to_string()))),
    }
}

fn parse_datetime_col(row: &Row, col: &str) -> Result<Option<NaiveDateTime>> {
    let s: Option<String> = row.get(col)?;
    match s {
        None => Ok(None),
        Some(t) => NaiveDateTime::parse_from_str(&t, DB_DATETIME)
            .map(Some)
            .map_err(|_| conversion_error(0, AppError::InvalidTime(t))),
    }
}

pub fn map_event(row: &Row) -> Result<Event> {
    Ok(Event {
        id: row.get("id")?,
        name: row.get("name")?,
        date: parse_date_col(row, "date")?,
        start_time: parse_time_col(row, "start_time")?,
        end_time: parse_time_col(row, "end_time")?,
        location: row.get("location")?,
        note: row.get("note")?,
        created_at: row.get("created_at")?,
    })
}

pub fn map_product(row: &Row) -> Result<Product> {
    let cat: String = row.get("category")?;
    let category = Category::from_db_str(&cat).ok_or_else(|| {
        conversion_error(0, AppError::Validation(format!("Invalid category: {cat}")))
    })?;

    Ok(Product {
        id: row.get("id")?,
        name: row.get("name")?,
        unit: row.get("unit")?,
        category,
        created_at: row.get("created_at")?,
    })
}

pub fn map_staff(row: &Row) -> Result<Staff> {
    let role_str: String = row.get("role")?;
    let role = Role::from_db_str(&role_str).ok_or_else(|| {
        conversion_error(0, AppError::Validation(format!("Invalid role: {role_str}")))
    })?;

    Ok(Staff {
        id: row.get("id")?,
        login: row.get("login")?,
        display_name: row.get("display_name")?,
        role,
        active: row.get::<_, i32>("active")? == 1,
        inventory_grant: row.get::<_, i32>("inventory_grant")? == 1,
    })
}

pub fn map_movement(row: &Row) -> Result<StockMovement> {
    let kind_str: String = row.get("kind")?;
    let kind = MovementKind::from_db_str(&kind_str).ok_or_else(|| {
        conversion_error(0, AppError::Validation(format!("Invalid kind: {kind_str}")))
    })?;

    Ok(StockMovement {
        id: row.get("id")?,
        product_id: row.get("product_id")?,
        event_id: row.get("event_id")?,
        kind,
        quantity: row.get("quantity")?,
        created_at: row.get("created_at")?,
    })
}

pub fn map_binding(row: &Row) -> Result<EventProductBinding> {
    Ok(EventProductBinding {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        product_id: row.get("product_id")?,
        quantity: row.get("quantity")?,
        loaded: row.get::<_, i32>("loaded")? == 1,
        done: row.get::<_, i32>("done")? == 1,
    })
}

/// Expects the binding columns plus `product_name`, `unit`, `category`.
pub fn map_bound_product(row: &Row) -> Result<BoundProduct> {
    let cat: String = row.get("category")?;
    let category = Category::from_db_str(&cat).ok_or_else(|| {
        conversion_error(0, AppError::Validation(format!("Invalid category: {cat}")))
    })?;

    Ok(BoundProduct {
        binding: map_binding(row)?,
        product_name: row.get("product_name")?,
        unit: row.get("unit")?,
        category,
    })
}

pub fn map_timesheet(row: &Row) -> Result<TimesheetEntry> {
    Ok(TimesheetEntry {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        staff_id: row.get("staff_id")?,
        start: parse_datetime_col(row, "started_at")?,
        end: parse_datetime_col(row, "ended_at")?,
        minutes: row.get("minutes")?,
    })
}

pub fn find_event(conn: &Connection, id: i64) -> AppResult<Option<Event>> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM event WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_event).optional()?)
}

pub fn find_product(conn: &Connection, id: i64) -> AppResult<Option<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_product).optional()?)
}

pub fn find_staff(conn: &Connection, id: i64) -> AppResult<Option<Staff>> {
    let sql = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_staff).optional()?)
}

pub fn find_staff_by_login(conn: &Connection, login: &str) -> AppResult<Option<Staff>> {
    let sql = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE login = ?1");
    Ok(conn.query_row(&sql, [login], map_staff).optional()?)
}

pub fn require_event(conn: &Connection, id: i64) -> AppResult<Event> {
    find_event(conn, id)?.ok_or_else(|| AppError::not_found("event", id))
}

pub fn require_product(conn: &Connection, id: i64) -> AppResult<Product> {
    find_product(conn, id)?.ok_or_else(|| AppError::not_found("product", id))
}

pub fn require_staff(conn: &Connection, id: i64) -> AppResult<Staff> {
    find_staff(conn, id)?.ok_or_else(|| AppError::not_found("staff", id))
}

/// Collect every row of a prepared query into a Vec.
pub fn collect_rows<T, F>(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
    f: F,
) -> AppResult<Vec<T>>
where
    F: FnMut(&Row<'_>) -> Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, f)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
