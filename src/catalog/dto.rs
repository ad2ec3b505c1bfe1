use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::catalog::model::{Food, FoodUnit};
use crate::catalog::units::UnitOption;

#[derive(Debug, Deserialize)]
pub struct FoodQuery {
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

/// Request body for creating a custom food.
#[derive(Debug, Deserialize)]
pub struct CreateFoodRequest {
    pub name: String,
    pub brand: Option<String>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub base_quantity: f64,
    pub base_unit: String,
    #[serde(default)]
    pub units: Vec<FoodUnitInput>,
}

#[derive(Debug, Deserialize)]
pub struct FoodUnitInput {
    /// Defaults to `code` when omitted.
    pub id: Option<String>,
    pub code: String,
    /// Defaults to `code` when omitted (a simple unit).
    pub label: Option<String>,
    #[serde(default = "default_unit_type")]
    pub unit_type: String,
    pub conversion_factor: f64,
}

fn default_unit_type() -> String {
    "serving".into()
}

#[derive(Debug, Serialize)]
pub struct FoodListItem {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub base_quantity: f64,
    pub base_unit: String,
}

impl From<Food> for FoodListItem {
    fn from(f: Food) -> Self {
        Self {
            id: f.id,
            name: f.name,
            brand: f.brand,
            calories: f.calories,
            protein: f.protein,
            carbs: f.carbs,
            fat: f.fat,
            base_quantity: f.base_quantity,
            base_unit: f.base_unit,
        }
    }
}

/// Full food record with its catalog units and the selectable unit
/// options derived from them.
#[derive(Debug, Serialize)]
pub struct FoodDetails {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub base_quantity: f64,
    pub base_unit: String,
    pub units: Vec<FoodUnit>,
    pub unit_options: Vec<UnitOption>,
    pub created_at: OffsetDateTime,
}

impl FoodDetails {
    pub fn from_food(food: Food, unit_options: Vec<UnitOption>) -> Self {
        Self {
            id: food.id,
            name: food.name,
            brand: food.brand,
            calories: food.calories,
            protein: food.protein,
            carbs: food.carbs,
            fat: food.fat,
            base_quantity: food.base_quantity,
            base_unit: food.base_unit,
            units: food.units,
            unit_options,
            created_at: food.created_at,
        }
    }
}
