//! Append-only stock ledger.
//!
//! On-hand quantity is never stored: it is the sum of stock-in minus the sum
//! of stock-out over every movement of a product, recomputed on each read.
//! Corrections are new, compensating movements; rows are never updated or
//! deleted.

use crate::db::log::ttlog;
use crate::db::queries::{
    MOVEMENT_COLUMNS, PRODUCT_COLUMNS, collect_rows, map_movement, map_product, now_str,
    require_event, require_product,
};
use crate::errors::{AppError, AppResult};
use crate::models::movement::{MovementKind, StockMovement};
use crate::models::product::StockLevel;
use rusqlite::{Connection, params};

pub struct Ledger;

impl Ledger {
    /// Append one manual movement (delivery, repair, write-off).
    pub fn record(
        conn: &Connection,
        product_id: i64,
        kind: MovementKind,
        quantity: i64,
        event_id: Option<i64>,
    ) -> AppResult<StockMovement> {
        if quantity <= 0 {
            return Err(AppError::Validation(format!(
                "quantity must be positive, got {quantity}"
            )));
        }

        require_product(conn, product_id)?;
        if let Some(eid) = event_id {
            require_event(conn, eid)?;
        }

        let movement = Self::append(conn, product_id, kind, quantity, event_id)?;

        let operation = match kind {
            MovementKind::StockIn => "stock_in",
            MovementKind::StockOut => "stock_out",
        };
        let message = match event_id {
            Some(eid) => format!("× {quantity} for event {eid}"),
            None => format!("× {quantity}"),
        };
        ttlog(conn, operation, &format!("product {product_id}"), &message)?;

        Ok(movement)
    }

    /// Insert without reference checks; callers inside the crate have
    /// already validated product and event.
    pub(crate) fn append(
        conn: &Connection,
        product_id: i64,
        kind: MovementKind,
        quantity: i64,
        event_id: Option<i64>,
    ) -> AppResult<StockMovement> {
        let created_at = now_str();
        conn.execute(
            "INSERT INTO stock_movement (product_id, event_id, kind, quantity, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![product_id, event_id, kind.to_db_str(), quantity, created_at],
        )?;

        Ok(StockMovement {
            id: conn.last_insert_rowid(),
            product_id,
            event_id,
            kind,
            quantity,
            created_at,
        })
    }

    /// Σ stock-in − Σ stock-out for one product.
    pub fn on_hand(conn: &Connection, product_id: i64) -> AppResult<i64> {
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(CASE kind WHEN 'stock-in' THEN quantity ELSE -quantity END), 0)
             FROM stock_movement
             WHERE product_id = ?1",
            [product_id],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// On-hand quantity of every product, grouped by category then name.
    pub fn stock_levels(conn: &Connection) -> AppResult<Vec<StockLevel>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM product ORDER BY category, name");
        let products = collect_rows(conn, &sql, [], map_product)?;

        let mut levels = Vec::with_capacity(products.len());
        for product in products {
            let on_hand = Self::on_hand(conn, product.id)?;
            levels.push(StockLevel { product, on_hand });
        }
        Ok(levels)
    }

    /// Ledger rows, newest first, optionally for one product.
    pub fn movements(conn: &Connection, product_id: Option<i64>) -> AppResult<Vec<StockMovement>> {
        match product_id {
            Some(pid) => {
                let sql = format!(
                    "SELECT {MOVEMENT_COLUMNS} FROM stock_movement
                     WHERE product_id = ?1 ORDER BY id DESC"
                );
                collect_rows(conn, &sql, [pid], map_movement)
            }
            None => {
                let sql = format!("SELECT {MOVEMENT_COLUMNS} FROM stock_movement ORDER BY id DESC");
                collect_rows(conn, &sql, [], map_movement)
            }
        }
    }

    /// Net quantity moved on behalf of one event (negative while equipment is out).
    pub fn event_net(conn: &Connection, event_id: i64) -> AppResult<i64> {
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(CASE kind WHEN 'stock-in' THEN quantity ELSE -quantity END), 0)
             FROM stock_movement
             WHERE event_id = ?1",
            [event_id],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}
