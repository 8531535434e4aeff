use chrono::NaiveDate;
use gigstock::core::timesheet::Timesheet;
use gigstock::export::logic::{ExportLogic, ExportTarget};
use gigstock::export::model::HoursExport;
use gigstock::export::range::parse_range;
use gigstock::export::ExportFormat;
use gigstock::models::product::Category;
use gigstock::models::staff::Role;
use predicates::str::contains;
use std::fs;

mod common;
use common::{add_product, add_staff, at, create_event, gs_as, init_cli_db, mem_pool, temp_out};

fn d(s: &str) -> NaiveDate {
    common::date(s)
}

#[test]
fn range_shapes() {
    assert_eq!(parse_range("2025").unwrap(), (d("2025-01-01"), d("2025-12-31")));
    assert_eq!(parse_range("2024-02").unwrap(), (d("2024-02-01"), d("2024-02-29")));
    assert_eq!(parse_range("2025-12").unwrap(), (d("2025-12-01"), d("2025-12-31")));
    assert_eq!(parse_range("2025-06-01").unwrap(), (d("2025-06-01"), d("2025-06-01")));
    assert_eq!(
        parse_range("2025-03:2025-05").unwrap(),
        (d("2025-03-01"), d("2025-05-31"))
    );
}

#[test]
fn range_rejects_mixed_or_reversed_bounds() {
    assert!(parse_range("2025:2025-05").is_err());
    assert!(parse_range("2025-06:2025-05").is_err());
    assert!(parse_range("25-06").is_err());
    assert!(parse_range("2025-13").is_err());
}

#[test]
fn hours_rows_follow_the_summary() {
    let mut pool = mem_pool();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    let ev = create_event(&mut pool, "2025-06-01", Some("18:00"), &[], &[eva]);

    Timesheet::clock_in(&pool.conn, ev.id, eva, at("2025-06-01 18:00")).unwrap();
    Timesheet::clock_out(&pool.conn, ev.id, eva, at("2025-06-01 19:20")).unwrap();

    let rows = HoursExport::from_summary(&Timesheet::summary(&pool.conn, None).unwrap());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].staff_id, eva);
    assert_eq!(rows[0].minutes, 90);
    assert_eq!(rows[0].hours, "1.5");
}

#[test]
fn empty_export_writes_nothing() {
    let pool = mem_pool();
    let out = temp_out("export_empty", "csv");
    let target = ExportTarget {
        format: ExportFormat::Csv,
        file: &out,
        force: true,
    };

    assert!(!ExportLogic::events(&pool.conn, &target, None, None).unwrap());
    assert!(!std::path::Path::new(&out).exists());
}

#[test]
fn checklist_export_lists_bound_products() {
    let mut pool = mem_pool();
    let cable = add_product(&pool, "XLR 10m", Category::Cabling);
    let ev = create_event(&mut pool, "2025-06-01", Some("18:00"), &[(cable, 12)], &[]);
    let out = temp_out("export_checklist_lib", "json");
    let target = ExportTarget {
        format: ExportFormat::Json,
        file: &out,
        force: true,
    };

    assert!(ExportLogic::checklist(&pool.conn, &target, ev.id).unwrap());
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("XLR 10m"));
    assert!(text.contains("12"));
}

fn cli_event_db(name: &str) -> String {
    let db = init_cli_db(name);
    gs_as(&db, "admin", &["product", "add", "Par 64", "--category", "lighting"])
        .assert()
        .success();
    gs_as(&db, "admin", &["staff", "add", "eva"]).assert().success();
    gs_as(
        &db,
        "admin",
        &[
            "event", "create", "--name", "Open air", "--date", "2025-07-12", "--start", "16:00",
            "--location", "Park", "--product", "1=8", "--staff", "2",
        ],
    )
    .assert()
    .success();
    db
}

#[test]
fn export_events_csv_and_json() {
    let db = cli_event_db("export_events");

    let csv = temp_out("export_events", "csv");
    gs_as(&db, "admin", &["export", "events", "--file", &csv, "--range", "2025-07"])
        .assert()
        .success();
    let text = fs::read_to_string(&csv).unwrap();
    assert!(text.starts_with("id,name,date"));
    assert!(text.contains("Open air"));

    let json = temp_out("export_events", "json");
    gs_as(&db, "eva", &["export", "events", "--format", "json", "--file", &json])
        .assert()
        .success();
    let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(parsed.as_array().map(|a| a.len()), Some(1));
}

#[test]
fn export_checklist_pdf_and_xlsx() {
    let db = cli_event_db("export_checklist");

    let pdf = temp_out("export_checklist", "pdf");
    gs_as(&db, "admin", &["export", "checklist", "1", "--format", "pdf", "--file", &pdf])
        .assert()
        .success();
    let bytes = fs::read(&pdf).unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let xlsx = temp_out("export_checklist", "xlsx");
    gs_as(&db, "admin", &["export", "checklist", "1", "--format", "xlsx", "--file", &xlsx])
        .assert()
        .success();
    let bytes = fs::read(&xlsx).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn export_rejects_relative_path_and_bad_range() {
    let db = cli_event_db("export_invalid");

    gs_as(&db, "admin", &["export", "events", "--file", "events.csv"])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));

    let out = temp_out("export_invalid", "csv");
    gs_as(&db, "admin", &["export", "events", "--file", &out, "--range", "2025-07:2025"])
        .assert()
        .failure()
        .stderr(contains("Invalid date"));
}

#[test]
fn staff_export_only_their_hours() {
    let db = cli_event_db("export_hours");
    let out = temp_out("export_hours", "csv");

    gs_as(&db, "eva", &["export", "hours", "--file", &out, "--staff", "1"])
        .assert()
        .failure()
        .stderr(contains("Not allowed"));

    gs_as(&db, "eva", &["--at", "2025-07-12 16:10", "hours", "in", "1"])
        .assert()
        .success();
    gs_as(&db, "eva", &["--at", "2025-07-12 18:00", "hours", "out", "1"])
        .assert()
        .success();

    gs_as(&db, "eva", &["export", "hours", "--file", &out])
        .assert()
        .success();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("Open air"));
    assert!(text.contains(",90,1.5"));
}
