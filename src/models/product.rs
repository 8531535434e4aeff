use serde::{Deserialize, Serialize};

/// Functional group a piece of equipment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cabling,
    Monitors,
    Lighting,
    Speakers,
    Tools,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Cabling,
        Category::Monitors,
        Category::Lighting,
        Category::Speakers,
        Category::Tools,
    ];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Category::Cabling => "cabling",
            Category::Monitors => "monitors",
            Category::Lighting => "lighting",
            Category::Speakers => "speakers",
            Category::Tools => "tools",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.to_db_str() == s)
    }

    /// Helper: parse user input (case-insensitive)
    pub fn from_code(code: &str) -> Option<Self> {
        Self::from_db_str(&code.trim().to_lowercase())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub unit: String,
    pub category: Category,
    pub created_at: String,
}

/// Product plus its derived on-hand quantity.
#[derive(Debug, Clone, Serialize)]
pub struct StockLevel {
    pub product: Product,
    pub on_hand: i64,
}
