use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A catalog food. Macro fields are defined per `base_quantity` of
/// `base_unit` — e.g. calories/protein/carbs/fat per 100 g.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub base_quantity: f64,
    pub base_unit: String,
    #[sqlx(skip)]
    #[serde(default)]
    pub units: Vec<FoodUnit>,
    pub created_at: OffsetDateTime,
}

/// An alternative measurement unit for a food.
///
/// `conversion_factor` is how many base units one instance of this unit
/// equals. `label` is a display string that may encode the base amount in
/// parentheses ("1 serving (100 g)"); a label without parentheses is a
/// "simple" unit whose label is the unit itself ("g", "oz").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodUnit {
    pub id: String,
    pub code: String,
    pub label: String,
    pub unit_type: String,
    pub conversion_factor: f64,
}

impl Food {
    pub fn unit(&self, unit_id: &str) -> Option<&FoodUnit> {
        self.units.iter().find(|u| u.id == unit_id)
    }
}
