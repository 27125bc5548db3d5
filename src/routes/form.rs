//! Form endpoints
//!
//! - GET /api/v1/form - Snapshot of all form state for exporters
//! - POST /api/v1/form/rows - Append an empty characteristic row
//! - PUT /api/v1/form/rows/:index - Overwrite one characteristic row

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;

use crate::error::Result;
use crate::form::{CharacteristicRow, FormSnapshot};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_snapshot))
        .route("/rows", post(add_row))
        .route("/rows/:index", put(set_row))
}

#[derive(Serialize)]
pub struct RowCreated {
    pub index: usize,
}

async fn get_snapshot(State(state): State<AppState>) -> Json<FormSnapshot> {
    Json(state.store().snapshot().await)
}

async fn add_row(State(state): State<AppState>) -> (StatusCode, Json<RowCreated>) {
    let index = state.store().add_row().await;
    (StatusCode::CREATED, Json(RowCreated { index }))
}

async fn set_row(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(row): Json<CharacteristicRow>,
) -> Result<StatusCode> {
    state.store().set_row(index, row).await?;
    Ok(StatusCode::NO_CONTENT)
}
