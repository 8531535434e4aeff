pub mod binding;
pub mod event;
pub mod movement;
pub mod product;
pub mod staff;
pub mod timesheet;

/// Timestamp format stored in TEXT columns.
pub const DB_DATETIME: &str = "%Y-%m-%d %H:%M:%S";
pub const DB_DATE: &str = "%Y-%m-%d";
pub const DB_TIME: &str = "%H:%M";
