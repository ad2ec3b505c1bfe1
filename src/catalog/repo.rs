use sqlx::PgPool;
use uuid::Uuid;

use crate::catalog::model::{Food, FoodUnit};

const FOOD_COLUMNS: &str =
    "id, name, brand, calories, protein, carbs, fat, base_quantity, base_unit, created_at";

pub async fn search(
    db: &PgPool,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Food>> {
    let pattern = search
        .map(|s| format!("%{}%", s.trim()))
        .unwrap_or_else(|| "%".into());
    let rows = sqlx::query_as::<_, Food>(&format!(
        r#"
        SELECT {FOOD_COLUMNS}
        FROM foods
        WHERE name ILIKE $1 OR brand ILIKE $1
        ORDER BY name
        LIMIT $2 OFFSET $3
        "#,
    ))
    .bind(pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Fetch one food with its units populated.
pub async fn get(db: &PgPool, food_id: Uuid) -> anyhow::Result<Option<Food>> {
    let food = sqlx::query_as::<_, Food>(&format!(
        r#"
        SELECT {FOOD_COLUMNS}
        FROM foods
        WHERE id = $1
        "#,
    ))
    .bind(food_id)
    .fetch_optional(db)
    .await?;

    match food {
        Some(mut food) => {
            food.units = units_for(db, food_id).await?;
            Ok(Some(food))
        }
        None => Ok(None),
    }
}

pub async fn units_for(db: &PgPool, food_id: Uuid) -> anyhow::Result<Vec<FoodUnit>> {
    let units = sqlx::query_as::<_, FoodUnit>(
        r#"
        SELECT id, code, label, unit_type, conversion_factor
        FROM food_units
        WHERE food_id = $1
        ORDER BY id
        "#,
    )
    .bind(food_id)
    .fetch_all(db)
    .await?;
    Ok(units)
}

pub async fn create(
    db: &PgPool,
    name: &str,
    brand: Option<&str>,
    macros: [f64; 4],
    base_quantity: f64,
    base_unit: &str,
    units: &[FoodUnit],
) -> anyhow::Result<Food> {
    let mut tx = db.begin().await?;

    let mut food = sqlx::query_as::<_, Food>(&format!(
        r#"
        INSERT INTO foods (name, brand, calories, protein, carbs, fat, base_quantity, base_unit)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {FOOD_COLUMNS}
        "#,
    ))
    .bind(name)
    .bind(brand)
    .bind(macros[0])
    .bind(macros[1])
    .bind(macros[2])
    .bind(macros[3])
    .bind(base_quantity)
    .bind(base_unit)
    .fetch_one(&mut *tx)
    .await?;

    for unit in units {
        sqlx::query(
            r#"
            INSERT INTO food_units (food_id, id, code, label, unit_type, conversion_factor)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(food.id)
        .bind(&unit.id)
        .bind(&unit.code)
        .bind(&unit.label)
        .bind(&unit.unit_type)
        .bind(unit.conversion_factor)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    food.units = units.to_vec();
    Ok(food)
}
