mod dto;
pub mod handlers;
pub mod model;
pub mod repo;
pub mod units;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
