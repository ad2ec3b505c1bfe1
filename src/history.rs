use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, Duration};
use tracing::instrument;

use crate::dates::{format_date, parse_date, today};
use crate::error::ApiError;
use crate::goals::{current_goal, Goal};
use crate::scaling::Nutrition;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/history", get(get_history))
        .route("/history/today", get(get_today))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, FromRow)]
struct DayRow {
    logged_on: Date,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
}

#[derive(Debug, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub totals: Nutrition,
}

impl From<DayRow> for DaySummary {
    fn from(r: DayRow) -> Self {
        Self {
            date: format_date(r.logged_on),
            totals: Nutrition {
                calories: r.calories,
                protein: r.protein,
                carbs: r.carbs,
                fat: r.fat,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub days: Vec<DaySummary>,
    pub goal: Option<Goal>,
}

async fn totals_by_day(db: &PgPool, from: Date, to: Date) -> anyhow::Result<Vec<DayRow>> {
    let rows = sqlx::query_as::<_, DayRow>(
        r#"
        SELECT m.logged_on,
               COALESCE(SUM(i.calories), 0) AS calories,
               COALESCE(SUM(i.protein), 0) AS protein,
               COALESCE(SUM(i.carbs), 0) AS carbs,
               COALESCE(SUM(i.fat), 0) AS fat
        FROM meals m
        LEFT JOIN meal_items i ON i.meal_id = m.id
        WHERE m.logged_on BETWEEN $1 AND $2
        GROUP BY m.logged_on
        ORDER BY m.logged_on
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Per-day macro totals over a date range, newest-last, with the current
/// goal for context. Defaults to the trailing week.
#[instrument(skip(state))]
async fn get_history(
    State(state): State<AppState>,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let to = match q.to.as_deref() {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let from = match q.from.as_deref() {
        Some(s) => parse_date(s)?,
        None => to - Duration::days(6),
    };
    if from > to {
        return Err(ApiError::BadRequest("'from' must not be after 'to'".into()));
    }

    let days = totals_by_day(&state.db, from, to)
        .await?
        .into_iter()
        .map(DaySummary::from)
        .collect();
    let goal = current_goal(&state.db).await?;
    Ok(Json(HistoryResponse { days, goal }))
}

#[derive(Debug, Serialize)]
pub struct TodaySummary {
    pub date: String,
    pub totals: Nutrition,
    pub goal: Option<Goal>,
}

#[instrument(skip(state))]
async fn get_today(State(state): State<AppState>) -> Result<Json<TodaySummary>, ApiError> {
    let date = today();
    let totals = totals_by_day(&state.db, date, date)
        .await?
        .into_iter()
        .next()
        .map(|r| DaySummary::from(r).totals)
        .unwrap_or_else(Nutrition::zero);
    let goal = current_goal(&state.db).await?;
    Ok(Json(TodaySummary {
        date: format_date(date),
        totals,
        goal,
    }))
}
