use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// The single current macro/calorie goal. One row, upserted in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/goals", get(get_goal))
        .route("/goals", put(put_goal))
}

pub async fn current_goal(db: &PgPool) -> anyhow::Result<Option<Goal>> {
    let goal = sqlx::query_as::<_, Goal>(
        r#"
        SELECT calories, protein, carbs, fat, updated_at
        FROM goals
        WHERE id = 1
        "#,
    )
    .fetch_optional(db)
    .await?;
    Ok(goal)
}

#[instrument(skip(state))]
async fn get_goal(State(state): State<AppState>) -> Result<Json<Goal>, ApiError> {
    let goal = current_goal(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("No goal set".into()))?;
    Ok(Json(goal))
}

#[instrument(skip(state, body))]
async fn put_goal(
    State(state): State<AppState>,
    Json(body): Json<GoalRequest>,
) -> Result<Json<Goal>, ApiError> {
    if [body.calories, body.protein, body.carbs, body.fat]
        .iter()
        .any(|v| *v < 0.0)
    {
        return Err(ApiError::BadRequest("goal values must be non-negative".into()));
    }

    let goal = sqlx::query_as::<_, Goal>(
        r#"
        INSERT INTO goals (id, calories, protein, carbs, fat)
        VALUES (1, $1, $2, $3, $4)
        ON CONFLICT (id) DO UPDATE
        SET calories = EXCLUDED.calories,
            protein = EXCLUDED.protein,
            carbs = EXCLUDED.carbs,
            fat = EXCLUDED.fat,
            updated_at = now()
        RETURNING calories, protein, carbs, fat, updated_at
        "#,
    )
    .bind(body.calories)
    .bind(body.protein)
    .bind(body.carbs)
    .bind(body.fat)
    .fetch_one(&state.db)
    .await?;
    Ok(Json(goal))
}
