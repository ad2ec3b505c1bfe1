use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::catalog::{repo as catalog_repo, units::resolve_unit_option};
use crate::dates::{parse_date, today};
use crate::error::ApiError;
use crate::scaling::{nutrition_for, rescale};
use crate::state::AppState;

use super::dto::{
    AddItemRequest, CreateMealRequest, MealDetails, MealItemResponse, MealQuery,
    UpdateItemRequest,
};
use super::repo;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/:id", get(get_meal))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal))
        .route("/meals/:id", delete(delete_meal))
        .route("/meals/:id/items", post(add_item))
        .route("/meals/:id/items/:item_id", put(update_item).delete(delete_item))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    Query(q): Query<MealQuery>,
) -> Result<Json<Vec<MealDetails>>, ApiError> {
    let date = match q.date.as_deref() {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let meals = repo::list_for_date(&state.db, date).await?;
    let ids: Vec<Uuid> = meals.iter().map(|m| m.id).collect();
    let mut items = repo::items_for_meals(&state.db, &ids).await?;

    let mut details = Vec::with_capacity(ids.len());
    for meal in meals {
        let (mine, rest): (Vec<_>, Vec<_>) =
            items.into_iter().partition(|i| i.meal_id == meal.id);
        items = rest;
        details.push(MealDetails::from_meal(meal, mine));
    }
    Ok(Json(details))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MealDetails>, ApiError> {
    let meal = repo::get_meal(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Meal not found".into()))?;
    let items = repo::items_for_meals(&state.db, &[id]).await?;
    Ok(Json(MealDetails::from_meal(meal, items)))
}

#[instrument(skip(state, body))]
pub async fn create_meal(
    State(state): State<AppState>,
    Json(body): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<MealDetails>), ApiError> {
    let date = match body.date.as_deref() {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let meal = repo::create_meal(&state.db, date, body.meal_type.as_str()).await?;
    Ok((
        StatusCode::CREATED,
        Json(MealDetails::from_meal(meal, Vec::new())),
    ))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if repo::delete_meal(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Meal not found".into()))
    }
}

/// Add a food to a meal. The scaling engine computes the absolute macro
/// snapshot stored on the row; a degenerate quantity/unit yields a
/// zero-valued snapshot rather than an error.
#[instrument(skip(state, body))]
pub async fn add_item(
    State(state): State<AppState>,
    Path(meal_id): Path<Uuid>,
    Json(body): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<MealItemResponse>), ApiError> {
    repo::get_meal(&state.db, meal_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Meal not found".into()))?;
    let food = catalog_repo::get(&state.db, body.food_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Food not found".into()))?;
    let option = resolve_unit_option(&food, &body.unit_id)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown unit '{}'", body.unit_id)))?;

    // The serving option is synthesized, not stored; the engine must be
    // able to resolve it from the food's unit list.
    let mut food_for_scaling = food.clone();
    if food_for_scaling.unit(&option.id).is_none() {
        food_for_scaling.units.push(crate::catalog::model::FoodUnit {
            id: option.id.clone(),
            code: option.code.clone(),
            label: option.label.clone(),
            unit_type: option.unit_type.clone(),
            conversion_factor: option.conversion_factor,
        });
    }
    let totals = nutrition_for(Some(&food_for_scaling), body.quantity, &option.id);

    let item = repo::insert_item(
        &state.db,
        meal_id,
        food.id,
        &food.name,
        body.quantity,
        &option.code,
        &option.label,
        option.conversion_factor,
        totals,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(MealItemResponse::from(item))))
}

/// Edit an item's quantity/unit. The new totals are derived from the
/// item's own stored base amount, so the original food record is only
/// needed when the unit actually changes.
#[instrument(skip(state, body))]
pub async fn update_item(
    State(state): State<AppState>,
    Path((meal_id, item_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<MealItemResponse>, ApiError> {
    let item = repo::get_item(&state.db, meal_id, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Meal item not found".into()))?;

    let (unit, unit_label, new_factor) = match body.unit_id.as_deref() {
        None => (item.unit.clone(), item.unit_label.clone(), item.conversion_factor),
        Some(unit_id) => {
            let food_id = item.food_id.ok_or_else(|| {
                ApiError::BadRequest("cannot change unit: catalog food no longer exists".into())
            })?;
            let food = catalog_repo::get(&state.db, food_id).await?.ok_or_else(|| {
                ApiError::BadRequest("cannot change unit: catalog food no longer exists".into())
            })?;
            let option = resolve_unit_option(&food, unit_id)
                .ok_or_else(|| ApiError::BadRequest(format!("unknown unit '{unit_id}'")))?;
            (option.code, option.label, option.conversion_factor)
        }
    };

    let totals = rescale(
        item.quantity,
        item.conversion_factor,
        &item.totals(),
        body.quantity,
        new_factor,
    );

    let updated = repo::update_item(
        &state.db,
        item.id,
        body.quantity,
        &unit,
        &unit_label,
        new_factor,
        totals,
    )
    .await?;
    Ok(Json(MealItemResponse::from(updated)))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    Path((meal_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    if repo::delete_item(&state.db, meal_id, item_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Meal item not found".into()))
    }
}
