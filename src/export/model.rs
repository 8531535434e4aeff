use crate::core::timesheet::TimesheetSummary;
use crate::models::binding::BoundProduct;
use crate::models::event::Event;
use crate::utils::formatting::mins2hours;
use crate::utils::time::format_time;
use serde::Serialize;

/// A flat record that every export format can render.
pub trait ExportRow: Serialize {
    fn headers() -> Vec<&'static str>;
    fn to_row(&self) -> Vec<String>;
}

#[derive(Serialize, Clone, Debug)]
pub struct EventExport {
    pub id: i64,
    pub name: String,
    pub date: String,
    pub start: String,
    pub end: String,
    pub location: String,
    pub note: String,
    pub products: i64,
    pub crew: String,
}

impl EventExport {
    pub fn new(event: &Event, products: i64, crew: Vec<String>) -> Self {
        Self {
            id: event.id,
            name: event.name.clone(),
            date: event.date_str(),
            start: format_time(event.start_time),
            end: format_time(event.end_time),
            location: event.location.clone(),
            note: event.note.clone(),
            products,
            crew: crew.join(", "),
        }
    }
}

impl ExportRow for EventExport {
    fn headers() -> Vec<&'static str> {
        vec!["id", "name", "date", "start", "end", "location", "note", "products", "crew"]
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.date.clone(),
            self.start.clone(),
            self.end.clone(),
            self.location.clone(),
            self.note.clone(),
            self.products.to_string(),
            self.crew.clone(),
        ]
    }
}

/// One line of the loading checklist.
#[derive(Serialize, Clone, Debug)]
pub struct ChecklistExport {
    pub product_id: i64,
    pub product: String,
    pub category: String,
    pub quantity: i64,
    pub unit: String,
    pub loaded: bool,
    pub done: bool,
}

impl From<&BoundProduct> for ChecklistExport {
    fn from(b: &BoundProduct) -> Self {
        Self {
            product_id: b.binding.product_id,
            product: b.product_name.clone(),
            category: b.category.to_db_str().to_string(),
            quantity: b.binding.quantity,
            unit: b.unit.clone(),
            loaded: b.binding.loaded,
            done: b.binding.done,
        }
    }
}

impl ExportRow for ChecklistExport {
    fn headers() -> Vec<&'static str> {
        vec!["product_id", "product", "category", "quantity", "unit", "loaded", "done"]
    }

    fn to_row(&self) -> Vec<String> {
        let mark = |b: bool| if b { "[x]" } else { "[ ]" }.to_string();
        vec![
            self.product_id.to_string(),
            self.product.clone(),
            self.category.clone(),
            self.quantity.to_string(),
            self.unit.clone(),
            mark(self.loaded),
            mark(self.done),
        ]
    }
}

/// Credited minutes of one staff member on one event.
#[derive(Serialize, Clone, Debug)]
pub struct HoursExport {
    pub staff_id: i64,
    pub staff: String,
    pub event_id: i64,
    pub event: String,
    pub date: String,
    pub minutes: i64,
    pub hours: String,
}

impl HoursExport {
    pub fn from_summary(summary: &TimesheetSummary) -> Vec<Self> {
        summary
            .per_staff
            .iter()
            .flat_map(|s| {
                s.events.iter().map(move |e| Self {
                    staff_id: s.staff_id,
                    staff: s.staff_name.clone(),
                    event_id: e.event_id,
                    event: e.event_name.clone(),
                    date: e.event_date.clone(),
                    minutes: e.minutes,
                    hours: mins2hours(e.minutes),
                })
            })
            .collect()
    }
}

impl ExportRow for HoursExport {
    fn headers() -> Vec<&'static str> {
        vec!["staff_id", "staff", "event_id", "event", "date", "minutes", "hours"]
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.staff_id.to_string(),
            self.staff.clone(),
            self.event_id.to_string(),
            self.event.clone(),
            self.date.clone(),
            self.minutes.to_string(),
            self.hours.clone(),
        ]
    }
}
