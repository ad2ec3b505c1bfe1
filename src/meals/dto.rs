use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::dates::format_date;
use crate::format::format_quantity;
use crate::meals::repo::{Meal, MealItem};
use crate::scaling::Nutrition;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MealQuery {
    /// Defaults to today (UTC) when omitted.
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub date: Option<String>,
    pub meal_type: MealType,
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub food_id: Uuid,
    pub quantity: f64,
    pub unit_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: f64,
    /// Keep the item's current unit when omitted.
    pub unit_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MealItemResponse {
    pub id: Uuid,
    pub food_id: Option<Uuid>,
    pub food_name: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_label: String,
    pub conversion_factor: f64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// Rendered quantity string, e.g. "2 servings, 200 g".
    pub display: String,
}

impl From<MealItem> for MealItemResponse {
    fn from(item: MealItem) -> Self {
        let display = format_quantity(
            item.quantity,
            &item.unit,
            &item.unit_label,
            item.conversion_factor,
        );
        Self {
            id: item.id,
            food_id: item.food_id,
            food_name: item.food_name,
            quantity: item.quantity,
            unit: item.unit,
            unit_label: item.unit_label,
            conversion_factor: item.conversion_factor,
            calories: item.calories,
            protein: item.protein,
            carbs: item.carbs,
            fat: item.fat,
            display,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MealDetails {
    pub id: Uuid,
    pub logged_on: String,
    pub meal_type: String,
    pub created_at: OffsetDateTime,
    pub totals: Nutrition,
    pub items: Vec<MealItemResponse>,
}

impl MealDetails {
    pub fn from_meal(meal: Meal, items: Vec<MealItem>) -> Self {
        let totals = items
            .iter()
            .fold(Nutrition::zero(), |acc, i| acc.add(&i.totals()));
        Self {
            id: meal.id,
            logged_on: format_date(meal.logged_on),
            meal_type: meal.meal_type,
            created_at: meal.created_at,
            totals,
            items: items.into_iter().map(MealItemResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MealType::Breakfast).unwrap(),
            "\"breakfast\""
        );
        assert_eq!(MealType::Snack.as_str(), "snack");
    }
}
