use crate::core::assignment::Assignment;
use crate::core::binding::Binding;
use crate::core::scheduler::Scheduler;
use crate::core::timesheet::Timesheet;
use crate::errors::AppResult;
use crate::export::fs_utils::{ensure_writable, require_absolute};
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{ChecklistExport, EventExport, ExportRow, HoursExport};
use crate::export::pdf_export::export_pdf;
use crate::export::range::parse_range;
use crate::export::xlsx::export_xlsx;
use crate::export::ExportFormat;
use crate::models::event::Event;
use crate::ui::messages::warning;
use crate::utils::time::format_time;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;

/// Where and how to write one export.
pub struct ExportTarget<'a> {
    pub format: ExportFormat,
    pub file: &'a str,
    pub force: bool,
}

impl ExportTarget<'_> {
    fn path(&self) -> AppResult<&Path> {
        let path = Path::new(self.file);
        require_absolute(path)?;
        ensure_writable(path, self.force)?;
        Ok(path)
    }

    fn write<T: ExportRow>(
        &self,
        rows: &[T],
        sheet: &str,
        title: &str,
        subtitle: Option<&str>,
    ) -> AppResult<bool> {
        let path = self.path()?;

        if rows.is_empty() {
            warning("Nothing to export for the selected data.");
            return Ok(false);
        }

        match self.format {
            ExportFormat::Csv => export_csv(rows, path)?,
            ExportFormat::Json => export_json(rows, path)?,
            ExportFormat::Xlsx => export_xlsx(rows, path, sheet)?,
            ExportFormat::Pdf => export_pdf(rows, path, title, subtitle)?,
        }
        Ok(true)
    }
}

pub struct ExportLogic;

impl ExportLogic {
    /// Events summary. `only_staff` limits it to one crew member's events.
    /// Returns false when there was nothing to write.
    pub fn events(
        conn: &Connection,
        target: &ExportTarget,
        range: Option<&str>,
        only_staff: Option<i64>,
    ) -> AppResult<bool> {
        let bounds = match range {
            None => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(parse_range(r)?),
        };

        let events: Vec<Event> = match only_staff {
            None => Scheduler::list(conn, bounds)?,
            Some(sid) => Scheduler::list_for_staff(conn, sid)?
                .into_iter()
                .filter(|e| bounds.is_none_or(|(from, to)| e.date >= from && e.date <= to))
                .collect(),
        };

        let mut rows = Vec::with_capacity(events.len());
        for e in &events {
            let products = Binding::bindings(conn, e.id)?.len() as i64;
            let crew = Assignment::assigned_staff(conn, e.id)?
                .iter()
                .map(|s| s.name().to_string())
                .collect();
            rows.push(EventExport::new(e, products, crew));
        }

        target.write(&rows, "Events", &events_title(bounds), None)
    }

    /// Loading checklist of one event.
    pub fn checklist(conn: &Connection, target: &ExportTarget, event_id: i64) -> AppResult<bool> {
        let event = Scheduler::get(conn, event_id)?;
        let rows: Vec<ChecklistExport> = Binding::bindings(conn, event_id)?
            .iter()
            .map(ChecklistExport::from)
            .collect();

        let title = format!("Loading checklist: {}", event.name);
        let subtitle = format!(
            "{} {}-{} @ {}",
            event.date_str(),
            format_time(event.start_time),
            format_time(event.end_time),
            event.location
        );

        target.write(&rows, "Checklist", &title, Some(&subtitle))
    }

    /// Credited hours per staff member and event (closed entries only).
    pub fn hours(
        conn: &Connection,
        target: &ExportTarget,
        staff_filter: Option<i64>,
    ) -> AppResult<bool> {
        let summary = Timesheet::summary(conn, staff_filter)?;
        let rows = HoursExport::from_summary(&summary);
        target.write(&rows, "Hours", "Staff hours", None)
    }
}

fn events_title(bounds: Option<(NaiveDate, NaiveDate)>) -> String {
    match bounds {
        None => "Events".to_string(),
        Some((from, to)) if from == to => format!("Events on {from}"),
        Some((from, to)) => format!("Events from {from} to {to}"),
    }
}
