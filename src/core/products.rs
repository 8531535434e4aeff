use crate::core::notify::{Change, ChangeKind, ChangeNotifier, EntityKind};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{PRODUCT_COLUMNS, collect_rows, map_product, now_str, require_product};
use crate::errors::{AppError, AppResult};
use crate::models::product::{Category, Product};
use rusqlite::{Connection, params};

/// Name, unit and category of a product as entered by the user.
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: String,
    pub unit: String,
    pub category: Category,
}

impl ProductFields {
    fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("product name is required".into()));
        }
        if self.unit.trim().is_empty() {
            return Err(AppError::Validation("product unit is required".into()));
        }
        Ok(())
    }
}

pub struct Products;

impl Products {
    pub fn create(
        pool: &mut DbPool,
        notifier: &dyn ChangeNotifier,
        fields: &ProductFields,
    ) -> AppResult<Product> {
        fields.validate()?;

        let tx = pool.transaction()?;
        tx.execute(
            "INSERT INTO product (name, unit, category, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                fields.name.trim(),
                fields.unit.trim(),
                fields.category.to_db_str(),
                now_str()
            ],
        )?;
        let id = tx.last_insert_rowid();
        ttlog(&tx, "product_create", &format!("product {id}"), fields.name.trim())?;
        tx.commit()?;

        notifier.notify(&Change::new(EntityKind::Product, id, ChangeKind::Created));
        require_product(&pool.conn, id)
    }

    pub fn update(
        pool: &mut DbPool,
        notifier: &dyn ChangeNotifier,
        product_id: i64,
        fields: &ProductFields,
    ) -> AppResult<Product> {
        require_product(&pool.conn, product_id)?;
        fields.validate()?;

        let tx = pool.transaction()?;
        tx.execute(
            "UPDATE product SET name = ?1, unit = ?2, category = ?3 WHERE id = ?4",
            params![
                fields.name.trim(),
                fields.unit.trim(),
                fields.category.to_db_str(),
                product_id
            ],
        )?;
        ttlog(&tx, "product_update", &format!("product {product_id}"), fields.name.trim())?;
        tx.commit()?;

        notifier.notify(&Change::new(EntityKind::Product, product_id, ChangeKind::Updated));
        require_product(&pool.conn, product_id)
    }

    /// Delete a product that was never moved nor bound to an event.
    pub fn delete(
        pool: &mut DbPool,
        notifier: &dyn ChangeNotifier,
        product_id: i64,
    ) -> AppResult<Product> {
        let product = require_product(&pool.conn, product_id)?;

        let tx = pool.transaction()?;

        let (movements, bindings) = Self::usage(&tx, product_id)?;
        if movements > 0 || bindings > 0 {
            return Err(AppError::Conflict(format!(
                "product '{}' is in use ({movements} stock movements, {bindings} event bindings)",
                product.name
            )));
        }

        tx.execute("DELETE FROM product WHERE id = ?1", [product_id])?;
        ttlog(&tx, "product_delete", &format!("product {product_id}"), &product.name)?;
        tx.commit()?;

        notifier.notify(&Change::new(EntityKind::Product, product_id, ChangeKind::Deleted));
        Ok(product)
    }

    /// (ledger movements, event bindings) referencing the product.
    pub fn usage(conn: &Connection, product_id: i64) -> AppResult<(i64, i64)> {
        Ok(conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM stock_movement WHERE product_id = ?1),
                (SELECT COUNT(*) FROM event_product  WHERE product_id = ?1)",
            [product_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?)
    }

    pub fn get(conn: &Connection, product_id: i64) -> AppResult<Product> {
        require_product(conn, product_id)
    }

    pub fn list(conn: &Connection) -> AppResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM product ORDER BY category, name");
        collect_rows(conn, &sql, [], map_product)
    }
}
