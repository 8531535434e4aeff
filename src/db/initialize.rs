use crate::db::migrate::run_pending_migrations;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::staff::Role;
use rusqlite::{Connection, params};

/// Initialize the database.
/// Delegates all schema creation / upgrades to the migration engine.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;
    Ok(())
}

/// Seed the first administrator when the staff table is empty.
/// Returns true when an account was created.
pub fn seed_admin(conn: &Connection) -> AppResult<bool> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM staff", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO staff (login, display_name, role, active, inventory_grant, created_at)
         VALUES (?1, ?2, ?3, 1, 0, ?4)",
        params!["admin", "Administrator", Role::Admin.to_db_str(), queries::now_str()],
    )?;
    Ok(true)
}
