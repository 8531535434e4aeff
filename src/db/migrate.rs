use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// One schema step. Applied steps are remembered in the `log` table
/// (operation = 'migration_applied', target = version).
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_base_schema",
        description: "Created staff, product, event, ledger, assignment and timesheet tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS staff (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            login         TEXT NOT NULL UNIQUE,
            display_name  TEXT,
            role          TEXT NOT NULL DEFAULT 'staff' CHECK(role IN ('admin','manager','staff')),
            active        INTEGER NOT NULL DEFAULT 1,
            created_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS product (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            unit        TEXT NOT NULL DEFAULT 'ks',
            category    TEXT NOT NULL
                        CHECK(category IN ('cabling','monitors','lighting','speakers','tools')),
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS event (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            date        TEXT NOT NULL,
            start_time  TEXT,
            end_time    TEXT,
            location    TEXT NOT NULL,
            note        TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );

        -- event_id is a historical tag: ledger rows outlive the event they served.
        CREATE TABLE IF NOT EXISTS stock_movement (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id  INTEGER NOT NULL REFERENCES product(id),
            event_id    INTEGER,
            kind        TEXT NOT NULL CHECK(kind IN ('stock-in','stock-out')),
            quantity    INTEGER NOT NULL CHECK(quantity > 0),
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS event_product (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id    INTEGER NOT NULL REFERENCES event(id),
            product_id  INTEGER NOT NULL REFERENCES product(id),
            quantity    INTEGER NOT NULL CHECK(quantity > 0),
            UNIQUE(event_id, product_id)
        );

        CREATE TABLE IF NOT EXISTS event_staff (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id  INTEGER NOT NULL REFERENCES event(id),
            staff_id  INTEGER NOT NULL REFERENCES staff(id),
            UNIQUE(event_id, staff_id)
        );

        CREATE TABLE IF NOT EXISTS timesheet (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id    INTEGER NOT NULL REFERENCES event(id),
            staff_id    INTEGER NOT NULL REFERENCES staff(id),
            started_at  TEXT,
            ended_at    TEXT,
            minutes     INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_movement_product ON stock_movement(product_id);
        CREATE INDEX IF NOT EXISTS idx_event_date ON event(date);
        CREATE INDEX IF NOT EXISTS idx_timesheet_event ON timesheet(event_id);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_timesheet_open
            ON timesheet(staff_id, event_id) WHERE ended_at IS NULL;
        "#,
    },
    Migration {
        version: "20250412_0002_checklist_flags",
        description: "Added loaded/done checklist flags to event_product",
        sql: r#"
        ALTER TABLE event_product ADD COLUMN loaded INTEGER NOT NULL DEFAULT 0;
        ALTER TABLE event_product ADD COLUMN done INTEGER NOT NULL DEFAULT 0;
        "#,
    },
    Migration {
        version: "20250520_0003_inventory_grant",
        description: "Added inventory_grant permission flag to staff",
        sql: r#"
        ALTER TABLE staff ADD COLUMN inventory_grant INTEGER NOT NULL DEFAULT 0;
        "#,
    },
];

/// Ensure that the `log` table exists (it also tracks applied migrations).
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    // Schema change and its marker commit together.
    conn.execute_batch("BEGIN IMMEDIATE;")?;

    let outcome = conn.execute_batch(m.sql).and_then(|_| {
        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            [m.version, m.description],
        )
    });

    match outcome {
        Ok(_) => conn.execute_batch("COMMIT;"),
        Err(e) => {
            conn.execute_batch("ROLLBACK;").ok();
            Err(e)
        }
    }
}

/// Public entry point: run all pending migrations, in order.
/// Returns the versions applied by this call.
///
/// Called by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut applied = Vec::new();
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        success(format!("Migration applied: {} → {}", m.version, m.description));
        applied.push(m.version);
    }

    Ok(applied)
}

/// Latest schema version known to this binary.
pub fn latest_version() -> &'static str {
    MIGRATIONS.last().map(|m| m.version).unwrap_or("none")
}
