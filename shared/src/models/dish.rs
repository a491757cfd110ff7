//! Dish Model

use serde::{Deserialize, Serialize};

/// Prep time assumed for a dish missing from the catalog
pub const DEFAULT_PREP_TIME_MINUTES: i64 = 15;

/// Dish entity (read-only reference, owned by the catalog)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dish {
    pub id: String,
    pub name: String,
    /// Preparation time for one unit
    pub prep_time_minutes: i64,
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Image reference
    #[serde(default)]
    pub image: String,
}

impl Dish {
    pub fn new(id: impl Into<String>, name: impl Into<String>, prep_time_minutes: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            prep_time_minutes,
            ingredients: Vec::new(),
            image: String::new(),
        }
    }
}
