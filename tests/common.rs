#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use gigstock::core::notify::{Change, ChangeNotifier};
use gigstock::core::scheduler::{EventFields, Scheduler};
use gigstock::core::staff::StaffLogic;
use gigstock::db::initialize::{init_db, seed_admin};
use gigstock::db::pool::DbPool;
use gigstock::models::event::Event;
use gigstock::models::product::Category;
use gigstock::models::staff::Role;
use rusqlite::params;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn gs() -> Command {
    cargo_bin_cmd!("gigstock")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_gigstock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// `gigstock --db <db> --as <login> <args…>`
pub fn gs_as(db_path: &str, login: &str, args: &[&str]) -> Command {
    let mut cmd = gs();
    cmd.args(["--db", db_path, "--as", login]).args(args);
    cmd
}

/// Initialize a CLI test database (schema + admin account).
pub fn init_cli_db(name: &str) -> String {
    let db_path = setup_test_db(name);
    gs().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();
    db_path
}

/// In-memory database with the full schema and the seeded admin (id 1).
pub fn mem_pool() -> DbPool {
    let pool = DbPool::in_memory().expect("open in-memory db");
    init_db(&pool.conn).expect("migrate");
    seed_admin(&pool.conn).expect("seed admin");
    pool
}

pub fn add_product(pool: &DbPool, name: &str, category: Category) -> i64 {
    pool.conn
        .execute(
            "INSERT INTO product (name, unit, category, created_at)
             VALUES (?1, 'ks', ?2, '2025-01-01 00:00:00')",
            params![name, category.to_db_str()],
        )
        .expect("insert product");
    pool.conn.last_insert_rowid()
}

pub fn add_staff(pool: &mut DbPool, login: &str, role: Role) -> i64 {
    StaffLogic::add(pool, login, None, role).expect("add staff").id
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
}

pub fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("datetime")
}

pub fn fields(name: &str, day: &str, start: Option<&str>) -> EventFields {
    EventFields {
        name: name.to_string(),
        date: date(day),
        start_time: start.map(|t| NaiveTime::parse_from_str(t, "%H:%M").expect("time")),
        end_time: None,
        location: "Lucerna".to_string(),
        note: String::new(),
    }
}

pub fn create_event(
    pool: &mut DbPool,
    day: &str,
    start: Option<&str>,
    products: &[(i64, i64)],
    staff: &[i64],
) -> Event {
    let products: BTreeMap<i64, i64> = products.iter().copied().collect();
    Scheduler::create(
        pool,
        &RecordingNotifier::default(),
        &fields("Gig", day, start),
        &products,
        staff,
    )
    .expect("create event")
}

/// Keeps every change it is told about.
#[derive(Default)]
pub struct RecordingNotifier {
    pub seen: RefCell<Vec<Change>>,
}

impl ChangeNotifier for RecordingNotifier {
    fn notify(&self, change: &Change) {
        self.seen.borrow_mut().push(change.clone());
    }
}
