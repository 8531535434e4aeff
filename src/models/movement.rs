use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MovementKind {
    #[serde(rename = "stock-in")]
    StockIn,
    #[serde(rename = "stock-out")]
    StockOut,
}

impl MovementKind {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            MovementKind::StockIn => "stock-in",
            MovementKind::StockOut => "stock-out",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "stock-in" => Some(MovementKind::StockIn),
            "stock-out" => Some(MovementKind::StockOut),
            _ => None,
        }
    }
}

/// One immutable row of the stock ledger.
#[derive(Debug, Clone, Serialize)]
pub struct StockMovement {
    pub id: i64,
    pub product_id: i64,
    pub event_id: Option<i64>,
    pub kind: MovementKind,
    pub quantity: i64,
    pub created_at: String,
}

impl StockMovement {
    /// Contribution of this movement to the on-hand quantity.
    pub fn signed_quantity(&self) -> i64 {
        match self.kind {
            MovementKind::StockIn => self.quantity,
            MovementKind::StockOut => -self.quantity,
        }
    }
}
