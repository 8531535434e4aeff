//! Event ↔ product quantities, kept in step with the stock ledger.
//!
//! Every bind writes a stock-out tagged with the event, every unbind the
//! matching stock-in. Functions take a plain `&Connection` so that the
//! scheduler can run them inside its own transaction.

use crate::core::ledger::Ledger;
use crate::db::log::ttlog;
use crate::db::queries::{collect_rows, map_binding, map_bound_product, require_event, require_product};
use crate::errors::{AppError, AppResult};
use crate::models::binding::{BoundProduct, EventProductBinding};
use crate::models::movement::MovementKind;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeMap;

pub struct Binding;

impl Binding {
    pub fn find(
        conn: &Connection,
        event_id: i64,
        product_id: i64,
    ) -> AppResult<Option<EventProductBinding>> {
        Ok(conn
            .query_row(
                "SELECT id, event_id, product_id, quantity, loaded, done
                 FROM event_product
                 WHERE event_id = ?1 AND product_id = ?2",
                params![event_id, product_id],
                map_binding,
            )
            .optional()?)
    }

    /// Bind `quantity` of a product to an event, replacing any earlier binding.
    pub fn bind(
        conn: &Connection,
        event_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> AppResult<EventProductBinding> {
        if quantity <= 0 {
            return Err(AppError::Validation(format!(
                "bound quantity must be positive, got {quantity}"
            )));
        }
        require_event(conn, event_id)?;
        require_product(conn, product_id)?;

        Self::unbind(conn, event_id, product_id)?;

        conn.execute(
            "INSERT INTO event_product (event_id, product_id, quantity, loaded, done)
             VALUES (?1, ?2, ?3, 0, 0)",
            params![event_id, product_id, quantity],
        )?;
        let id = conn.last_insert_rowid();

        Ledger::append(conn, product_id, MovementKind::StockOut, quantity, Some(event_id))?;

        ttlog(
            conn,
            "bind",
            &format!("event {event_id}"),
            &format!("product {product_id} × {quantity}"),
        )?;

        Ok(EventProductBinding {
            id,
            event_id,
            product_id,
            quantity,
            loaded: false,
            done: false,
        })
    }

    /// Remove a binding and return its quantity to stock.
    /// Returns the quantity returned, `None` if nothing was bound.
    pub fn unbind(conn: &Connection, event_id: i64, product_id: i64) -> AppResult<Option<i64>> {
        let Some(existing) = Self::find(conn, event_id, product_id)? else {
            return Ok(None);
        };

        conn.execute("DELETE FROM event_product WHERE id = ?1", [existing.id])?;
        Ledger::append(
            conn,
            product_id,
            MovementKind::StockIn,
            existing.quantity,
            Some(event_id),
        )?;

        ttlog(
            conn,
            "unbind",
            &format!("event {event_id}"),
            &format!("product {product_id} × {} returned", existing.quantity),
        )?;

        Ok(Some(existing.quantity))
    }

    /// Return everything bound to the event, then bind `desired` afresh.
    ///
    /// Entries with quantity 0 mean "not needed" and are skipped. Negative
    /// quantities and unknown products are rejected before anything is written.
    pub fn rebind_all(
        conn: &Connection,
        event_id: i64,
        desired: &BTreeMap<i64, i64>,
    ) -> AppResult<Vec<EventProductBinding>> {
        require_event(conn, event_id)?;
        Self::check_desired(conn, desired)?;

        for current in Self::bindings_raw(conn, event_id)? {
            Self::unbind(conn, event_id, current.product_id)?;
        }

        let mut out = Vec::new();
        for (&product_id, &qty) in desired {
            if qty > 0 {
                out.push(Self::bind(conn, event_id, product_id, qty)?);
            }
        }
        Ok(out)
    }

    /// Validation half of `rebind_all`, usable before opening a transaction.
    pub fn check_desired(conn: &Connection, desired: &BTreeMap<i64, i64>) -> AppResult<()> {
        for (&product_id, &qty) in desired {
            if qty < 0 {
                return Err(AppError::Validation(format!(
                    "quantity for product {product_id} must not be negative, got {qty}"
                )));
            }
            require_product(conn, product_id)?;
        }
        Ok(())
    }

    /// Reverse every binding of the event. Returns the removed bindings.
    pub fn unbind_all(conn: &Connection, event_id: i64) -> AppResult<Vec<EventProductBinding>> {
        let current = Self::bindings_raw(conn, event_id)?;
        for b in &current {
            Self::unbind(conn, event_id, b.product_id)?;
        }
        Ok(current)
    }

    /// Flip checklist flags; quantity and ledger are untouched.
    pub fn set_checklist(
        conn: &Connection,
        event_id: i64,
        product_id: i64,
        loaded: Option<bool>,
        done: Option<bool>,
    ) -> AppResult<EventProductBinding> {
        let mut b = Self::find(conn, event_id, product_id)?.ok_or_else(|| {
            AppError::NotFound(format!("product {product_id} is not bound to event {event_id}"))
        })?;

        if let Some(l) = loaded {
            b.loaded = l;
        }
        if let Some(d) = done {
            b.done = d;
        }

        conn.execute(
            "UPDATE event_product SET loaded = ?1, done = ?2 WHERE id = ?3",
            params![i32::from(b.loaded), i32::from(b.done), b.id],
        )?;
        ttlog(
            conn,
            "checklist",
            &format!("event {event_id}"),
            &format!("product {product_id}: loaded={} done={}", b.loaded, b.done),
        )?;
        Ok(b)
    }

    fn bindings_raw(conn: &Connection, event_id: i64) -> AppResult<Vec<EventProductBinding>> {
        collect_rows(
            conn,
            "SELECT id, event_id, product_id, quantity, loaded, done
             FROM event_product WHERE event_id = ?1 ORDER BY id",
            [event_id],
            map_binding,
        )
    }

    /// Checklist projection: bindings joined with product data.
    pub fn bindings(conn: &Connection, event_id: i64) -> AppResult<Vec<BoundProduct>> {
        collect_rows(
            conn,
            "SELECT ep.id, ep.event_id, ep.product_id, ep.quantity, ep.loaded, ep.done,
                    p.name AS product_name, p.unit, p.category
             FROM event_product ep
             JOIN product p ON p.id = ep.product_id
             WHERE ep.event_id = ?1
             ORDER BY p.category, p.name",
            [event_id],
            map_bound_product,
        )
    }
}
