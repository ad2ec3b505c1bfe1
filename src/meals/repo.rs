use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::scaling::Nutrition;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub logged_on: Date,
    pub meal_type: String,
    pub created_at: OffsetDateTime,
}

/// A logged line entry. The macro fields are absolute totals for the
/// stored quantity, not per-base-unit rates; the row carries everything
/// needed to rescale itself without the original food record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealItem {
    pub id: Uuid,
    pub meal_id: Uuid,
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
    pub created_at: OffsetDateTime,
}

impl MealItem {
    pub fn totals(&self) -> Nutrition {
        Nutrition {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }
}

const MEAL_COLUMNS: &str = "id, logged_on, meal_type, created_at";
const ITEM_COLUMNS: &str = "id, meal_id, food_id, food_name, quantity, unit, unit_label, \
                            conversion_factor, calories, protein, carbs, fat, created_at";

pub async fn create_meal(db: &PgPool, logged_on: Date, meal_type: &str) -> anyhow::Result<Meal> {
    let meal = sqlx::query_as::<_, Meal>(&format!(
        r#"
        INSERT INTO meals (logged_on, meal_type)
        VALUES ($1, $2)
        RETURNING {MEAL_COLUMNS}
        "#,
    ))
    .bind(logged_on)
    .bind(meal_type)
    .fetch_one(db)
    .await?;
    Ok(meal)
}

pub async fn get_meal(db: &PgPool, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
    let meal = sqlx::query_as::<_, Meal>(&format!(
        r#"
        SELECT {MEAL_COLUMNS}
        FROM meals
        WHERE id = $1
        "#,
    ))
    .bind(meal_id)
    .fetch_optional(db)
    .await?;
    Ok(meal)
}

pub async fn list_for_date(db: &PgPool, date: Date) -> anyhow::Result<Vec<Meal>> {
    let meals = sqlx::query_as::<_, Meal>(&format!(
        r#"
        SELECT {MEAL_COLUMNS}
        FROM meals
        WHERE logged_on = $1
        ORDER BY created_at
        "#,
    ))
    .bind(date)
    .fetch_all(db)
    .await?;
    Ok(meals)
}

pub async fn delete_meal(db: &PgPool, meal_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM meals WHERE id = $1")
        .bind(meal_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn items_for_meals(db: &PgPool, meal_ids: &[Uuid]) -> anyhow::Result<Vec<MealItem>> {
    let items = sqlx::query_as::<_, MealItem>(&format!(
        r#"
        SELECT {ITEM_COLUMNS}
        FROM meal_items
        WHERE meal_id = ANY($1)
        ORDER BY created_at
        "#,
    ))
    .bind(meal_ids)
    .fetch_all(db)
    .await?;
    Ok(items)
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_item(
    db: &PgPool,
    meal_id: Uuid,
    food_id: Uuid,
    food_name: &str,
    quantity: f64,
    unit: &str,
    unit_label: &str,
    conversion_factor: f64,
    totals: Nutrition,
) -> anyhow::Result<MealItem> {
    let item = sqlx::query_as::<_, MealItem>(&format!(
        r#"
        INSERT INTO meal_items
            (meal_id, food_id, food_name, quantity, unit, unit_label,
             conversion_factor, calories, protein, carbs, fat)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {ITEM_COLUMNS}
        "#,
    ))
    .bind(meal_id)
    .bind(food_id)
    .bind(food_name)
    .bind(quantity)
    .bind(unit)
    .bind(unit_label)
    .bind(conversion_factor)
    .bind(totals.calories)
    .bind(totals.protein)
    .bind(totals.carbs)
    .bind(totals.fat)
    .fetch_one(db)
    .await?;
    Ok(item)
}

pub async fn get_item(
    db: &PgPool,
    meal_id: Uuid,
    item_id: Uuid,
) -> anyhow::Result<Option<MealItem>> {
    let item = sqlx::query_as::<_, MealItem>(&format!(
        r#"
        SELECT {ITEM_COLUMNS}
        FROM meal_items
        WHERE id = $1 AND meal_id = $2
        "#,
    ))
    .bind(item_id)
    .bind(meal_id)
    .fetch_optional(db)
    .await?;
    Ok(item)
}

pub async fn update_item(
    db: &PgPool,
    item_id: Uuid,
    quantity: f64,
    unit: &str,
    unit_label: &str,
    conversion_factor: f64,
    totals: Nutrition,
) -> anyhow::Result<MealItem> {
    let item = sqlx::query_as::<_, MealItem>(&format!(
        r#"
        UPDATE meal_items
        SET quantity = $2, unit = $3, unit_label = $4, conversion_factor = $5,
            calories = $6, protein = $7, carbs = $8, fat = $9
        WHERE id = $1
        RETURNING {ITEM_COLUMNS}
        "#,
    ))
    .bind(item_id)
    .bind(quantity)
    .bind(unit)
    .bind(unit_label)
    .bind(conversion_factor)
    .bind(totals.calories)
    .bind(totals.protein)
    .bind(totals.carbs)
    .bind(totals.fat)
    .fetch_one(db)
    .await?;
    Ok(item)
}

pub async fn delete_item(db: &PgPool, meal_id: Uuid, item_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM meal_items WHERE id = $1 AND meal_id = $2")
        .bind(item_id)
        .bind(meal_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
