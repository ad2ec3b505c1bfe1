use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::catalog::dto::{CreateFoodRequest, FoodDetails, FoodListItem, FoodQuery};
use crate::catalog::model::FoodUnit;
use crate::catalog::units::build_unit_options;
use crate::catalog::repo;
use crate::error::ApiError;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods))
        .route("/foods/:id", get(get_food))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/foods", post(create_food))
}

#[instrument(skip(state))]
pub async fn list_foods(
    State(state): State<AppState>,
    Query(q): Query<FoodQuery>,
) -> Result<Json<Vec<FoodListItem>>, ApiError> {
    let foods = repo::search(&state.db, q.search.as_deref(), q.limit, q.offset).await?;
    Ok(Json(foods.into_iter().map(FoodListItem::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FoodDetails>, ApiError> {
    let food = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Food not found".into()))?;
    let options = build_unit_options(&food);
    Ok(Json(FoodDetails::from_food(food, options)))
}

#[instrument(skip(state, body))]
pub async fn create_food(
    State(state): State<AppState>,
    Json(body): Json<CreateFoodRequest>,
) -> Result<(StatusCode, Json<FoodDetails>), ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }
    if body.base_quantity <= 0.0 {
        return Err(ApiError::BadRequest("base_quantity must be positive".into()));
    }

    let mut units = Vec::with_capacity(body.units.len());
    for u in body.units {
        if u.conversion_factor <= 0.0 {
            return Err(ApiError::BadRequest(format!(
                "conversion_factor for unit '{}' must be positive",
                u.code
            )));
        }
        units.push(FoodUnit {
            id: u.id.unwrap_or_else(|| u.code.clone()),
            label: u.label.unwrap_or_else(|| u.code.clone()),
            code: u.code,
            unit_type: u.unit_type,
            conversion_factor: u.conversion_factor,
        });
    }

    let food = repo::create(
        &state.db,
        body.name.trim(),
        body.brand.as_deref(),
        [body.calories, body.protein, body.carbs, body.fat],
        body.base_quantity,
        &body.base_unit,
        &units,
    )
    .await?;

    let options = build_unit_options(&food);
    Ok((StatusCode::CREATED, Json(FoodDetails::from_food(food, options))))
}
