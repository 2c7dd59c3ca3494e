//! HTTP surface: one route per query operation.

pub mod error;
pub mod handlers;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/show_db", get(handlers::show_db))
        .route("/show_columns", get(handlers::show_columns))
        .route("/count_bar", post(handlers::count_bar))
        .route("/constrains_bar", post(handlers::constrains_bar))
        .route("/groupby_histo", post(handlers::groupby_histo))
        .route("/count_line", post(handlers::count_line))
        .route("/get_uniq_values", post(handlers::get_uniq_values))
        .with_state(state)
}
