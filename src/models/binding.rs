use super::product::Category;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct EventProductBinding {
    pub id: i64,
    pub event_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub loaded: bool,
    pub done: bool,
}

/// Binding joined with the product it refers to (checklist line).
#[derive(Debug, Clone, Serialize)]
pub struct BoundProduct {
    pub binding: EventProductBinding,
    pub product_name: String,
    pub unit: String,
    pub category: Category,
}
