use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use super::error::ApiError;
use crate::data::model::Cell;
use crate::query::output::{Counts, Histogram, TableDump};
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub filter: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PairParams {
    pub filter1: Option<String>,
    pub filter2: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConstraintParams {
    pub filter1: Option<String>,
    pub constrain: Option<JsonValue>,
    pub filter2: Option<String>,
}

/// Absent, `null` and `""` all count as missing.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn present_constraint(value: Option<JsonValue>) -> Option<Cell> {
    match value {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(s)) if s.is_empty() => None,
        Some(v) => Some(Cell::from(&v)),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn home() -> Json<JsonValue> {
    Json(json!({
        "message": "Welcome to the Climate Impact and Correlation Analyzer API!"
    }))
}

pub async fn show_db(State(state): State<AppState>) -> ApiResult<TableDump> {
    log::debug!("show_db");
    let dump = state
        .queries
        .full_dump()
        .map_err(ApiError::processing("Could not retrieve the dataset"))?;
    Ok(Json(dump))
}

pub async fn show_columns(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    log::debug!("show_columns");
    let columns = state
        .queries
        .list_columns()
        .map_err(ApiError::processing("Could not retrieve column names"))?;
    Ok(Json(columns))
}

pub async fn count_bar(
    State(state): State<AppState>,
    body: Result<Json<FilterParams>, JsonRejection>,
) -> ApiResult<Counts> {
    let Json(params) = body?;
    let filter = present(params.filter)
        .ok_or(ApiError::MissingParameter("Filter parameter is required"))?;
    log::debug!("count_bar filter={filter}");

    let counts = state
        .queries
        .value_counts(&filter)
        .map_err(ApiError::processing("Error processing count_bar"))?;
    Ok(Json(counts))
}

pub async fn constrains_bar(
    State(state): State<AppState>,
    body: Result<Json<ConstraintParams>, JsonRejection>,
) -> ApiResult<Vec<Cell>> {
    let Json(params) = body?;
    let (Some(filter1), Some(constrain), Some(filter2)) = (
        present(params.filter1),
        present_constraint(params.constrain),
        present(params.filter2),
    ) else {
        return Err(ApiError::MissingParameter(
            "filter1, constrain, and filter2 parameters are required",
        ));
    };
    log::debug!("constrains_bar filter1={filter1} constrain={constrain} filter2={filter2}");

    let values = state
        .queries
        .filtered_slice(&filter1, &constrain, &filter2)
        .map_err(ApiError::processing("Error processing constrains_bar"))?;
    Ok(Json(values))
}

pub async fn groupby_histo(
    State(state): State<AppState>,
    body: Result<Json<PairParams>, JsonRejection>,
) -> ApiResult<Histogram> {
    let Json(params) = body?;
    let (Some(filter1), Some(filter2)) = (present(params.filter1), present(params.filter2)) else {
        return Err(ApiError::MissingParameter(
            "filter1 and filter2 parameters are required",
        ));
    };
    log::debug!("groupby_histo filter1={filter1} filter2={filter2}");

    let histogram = state
        .queries
        .grouped_histogram(&filter1, &filter2)
        .map_err(ApiError::processing("Error processing groupby_histo"))?;
    Ok(Json(histogram))
}

pub async fn count_line(
    State(state): State<AppState>,
    body: Result<Json<FilterParams>, JsonRejection>,
) -> ApiResult<Counts> {
    let Json(params) = body?;
    let filter = present(params.filter)
        .ok_or(ApiError::MissingParameter("Filter parameter is required"))?;
    log::debug!("count_line filter={filter}");

    let counts = state
        .queries
        .grouped_counts(&filter)
        .map_err(ApiError::processing("Error processing count_line"))?;
    Ok(Json(counts))
}

pub async fn get_uniq_values(
    State(state): State<AppState>,
    body: Result<Json<FilterParams>, JsonRejection>,
) -> ApiResult<Vec<Cell>> {
    let Json(params) = body?;
    let filter = present(params.filter)
        .ok_or(ApiError::MissingParameter("Filter parameter is required"))?;
    log::debug!("get_uniq_values filter={filter}");

    let values = state
        .queries
        .unique_values(&filter)
        .map_err(ApiError::processing("Error processing get_uniq_values"))?;
    Ok(Json(values))
}
