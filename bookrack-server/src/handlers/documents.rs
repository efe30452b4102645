use axum::{
    Json,
    extract::{Path, State},
};
use bookrack_model::{BookID, CustomColumn, Document};
use serde::Serialize;

use crate::errors::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct VirtualLibraryEntry {
    pub name: String,
    pub definition: String,
}

pub async fn document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Document>> {
    state
        .repository
        .query_document(BookID::new(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))
}

pub async fn custom_columns(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CustomColumn>>> {
    Ok(Json(state.repository.query_custom_columns().await?))
}

pub async fn virtual_libraries(
    State(state): State<AppState>,
) -> Json<Vec<VirtualLibraryEntry>> {
    let entries = state
        .libraries
        .names()
        .into_iter()
        .filter_map(|name| state.libraries.resolve(&name))
        .map(|library| VirtualLibraryEntry {
            name: library.name,
            definition: library.definition,
        })
        .collect();
    Json(entries)
}
