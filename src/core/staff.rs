//! Staff accounts. Passwords live with the external identity provider;
//! this module only manages roles, activity and permission flags.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{
    STAFF_COLUMNS, collect_rows, find_staff_by_login, map_staff, now_str, require_staff,
};
use crate::errors::{AppError, AppResult};
use crate::models::staff::{Role, Staff};
use rusqlite::{Connection, ToSql, params};
use std::fmt::Display;

pub struct StaffLogic;

impl StaffLogic {
    pub fn add(
        pool: &mut DbPool,
        login: &str,
        display_name: Option<&str>,
        role: Role,
    ) -> AppResult<Staff> {
        let login = login.trim();
        if login.is_empty() {
            return Err(AppError::Validation("login is required".into()));
        }
        if find_staff_by_login(&pool.conn, login)?.is_some() {
            return Err(AppError::Conflict(format!("login '{login}' already exists")));
        }

        let display_name = display_name.map(str::trim).filter(|s| !s.is_empty());

        let tx = pool.transaction()?;
        tx.execute(
            "INSERT INTO staff (login, display_name, role, active, inventory_grant, created_at)
             VALUES (?1, ?2, ?3, 1, 0, ?4)",
            params![login, display_name, role.to_db_str(), now_str()],
        )?;
        let id = tx.last_insert_rowid();
        ttlog(&tx, "staff_add", &format!("staff {id}"), &format!("{login} ({})", role.to_db_str()))?;
        tx.commit()?;

        require_staff(&pool.conn, id)
    }

    pub fn set_role(pool: &mut DbPool, staff_id: i64, role: Role) -> AppResult<Staff> {
        Self::update_flag(pool, staff_id, "role", role.to_db_str(), "staff_role")
    }

    /// Deactivated staff keep their assignments and hours.
    pub fn set_active(pool: &mut DbPool, staff_id: i64, active: bool) -> AppResult<Staff> {
        Self::update_flag(pool, staff_id, "active", i32::from(active), "staff_active")
    }

    pub fn set_inventory_grant(pool: &mut DbPool, staff_id: i64, grant: bool) -> AppResult<Staff> {
        Self::update_flag(
            pool,
            staff_id,
            "inventory_grant",
            i32::from(grant),
            "staff_inventory_grant",
        )
    }

    fn update_flag<V: ToSql + Display>(
        pool: &mut DbPool,
        staff_id: i64,
        column: &'static str,
        value: V,
        operation: &str,
    ) -> AppResult<Staff> {
        require_staff(&pool.conn, staff_id)?;

        let tx = pool.transaction()?;
        // column names come from the fixed set above, never from input
        tx.execute(
            &format!("UPDATE staff SET {column} = ?1 WHERE id = ?2"),
            params![value, staff_id],
        )?;
        ttlog(&tx, operation, &format!("staff {staff_id}"), &format!("{column} = {value}"))?;
        tx.commit()?;

        require_staff(&pool.conn, staff_id)
    }

    pub fn get_by_login(conn: &Connection, login: &str) -> AppResult<Staff> {
        find_staff_by_login(conn, login)?
            .ok_or_else(|| AppError::NotFound(format!("staff '{login}'")))
    }

    pub fn list(conn: &Connection) -> AppResult<Vec<Staff>> {
        let sql = format!(
            "SELECT {STAFF_COLUMNS} FROM staff
             ORDER BY CASE role WHEN 'admin' THEN 0 WHEN 'manager' THEN 1 ELSE 2 END,
                      COALESCE(display_name, login)"
        );
        collect_rows(conn, &sql, [], map_staff)
    }
}
