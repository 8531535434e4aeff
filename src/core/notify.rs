//! Best-effort change signals, emitted after a successful commit.
//!
//! A notifier never returns an error: a lost signal must not undo or fail
//! the change it describes.

use crate::ui::messages::notice;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Event,
    Binding,
    Product,
    Timesheet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub entity: EntityKind,
    pub id: i64,
    pub change: ChangeKind,
}

impl Change {
    pub fn new(entity: EntityKind, id: i64, change: ChangeKind) -> Self {
        Self { entity, id, change }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entity = match self.entity {
            EntityKind::Event => "event",
            EntityKind::Binding => "binding",
            EntityKind::Product => "product",
            EntityKind::Timesheet => "timesheet",
        };
        let change = match self.change {
            ChangeKind::Created => "created",
            ChangeKind::Updated => "updated",
            ChangeKind::Deleted => "deleted",
        };
        write!(f, "{entity} #{} {change}", self.id)
    }
}

pub trait ChangeNotifier {
    fn notify(&self, change: &Change);
}

/// Drops every signal.
pub struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn notify(&self, _change: &Change) {}
}

/// Prints one info line per change.
pub struct ConsoleNotifier;

impl ChangeNotifier for ConsoleNotifier {
    fn notify(&self, change: &Change) {
        notice(change);
    }
}

/// Pick the notifier matching the `notify` config flag.
pub fn from_flag(enabled: bool) -> Box<dyn ChangeNotifier> {
    if enabled {
        Box::new(ConsoleNotifier)
    } else {
        Box::new(NoopNotifier)
    }
}
