use crate::db::migrate::latest_version;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::{Connection, OptionalExtension};
use std::fs;

#[derive(Debug, Default)]
pub struct DbStats {
    pub events: i64,
    pub products: i64,
    pub movements: i64,
    pub staff: i64,
    pub timesheet_entries: i64,
    pub first_event: Option<String>,
    pub last_event: Option<String>,
    pub schema_version: Option<String>,
}

fn count(conn: &Connection, table: &str) -> rusqlite::Result<i64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
}

pub fn collect(conn: &Connection) -> rusqlite::Result<DbStats> {
    let (first_event, last_event) = conn.query_row(
        "SELECT MIN(date), MAX(date) FROM event",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let schema_version = conn
        .query_row(
            "SELECT target FROM log WHERE operation = 'migration_applied'
             ORDER BY id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    Ok(DbStats {
        events: count(conn, "event")?,
        products: count(conn, "product")?,
        movements: count(conn, "stock_movement")?,
        staff: count(conn, "staff")?,
        timesheet_entries: count(conn, "timesheet")?,
        first_event,
        last_event,
        schema_version,
    })
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    let stats = collect(&pool.conn)?;

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!();
    println!("{CYAN}• File:{RESET} {YELLOW}{db_path}{RESET}");
    println!("{CYAN}• Size:{RESET} {file_mb:.2} MB");

    let schema = stats.schema_version.as_deref().unwrap_or("--");
    let marker = if schema == latest_version() { "" } else { " (pending migrations)" };
    println!("{CYAN}• Schema:{RESET} {schema}{marker}");

    for (label, n) in [
        ("Events", stats.events),
        ("Products", stats.products),
        ("Stock movements", stats.movements),
        ("Staff", stats.staff),
        ("Timesheet entries", stats.timesheet_entries),
    ] {
        println!("{CYAN}• {label}:{RESET} {GREEN}{n}{RESET}");
    }

    let or_dash = |d: Option<String>| d.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    println!("{CYAN}• Event dates:{RESET}");
    println!("    from: {}", or_dash(stats.first_event));
    println!("    to:   {}", or_dash(stats.last_event));
    println!();

    Ok(())
}
