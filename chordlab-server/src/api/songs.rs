//! Song library endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use super::ApiError;
use crate::AppState;

/// Path segment of the export route, which is also a legal song id
pub const EXPORT_SEGMENT: &str = "export";

/// POST /songs/export response
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub message: String,
}

/// GET /songs
///
/// All stored songs, most recently analyzed first.
pub async fn list_songs(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.songs.list_all().await?))
}

/// GET /songs/:id
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    fetch_song(&state, id).await
}

/// GET /songs/export
///
/// The static export route shadows `/songs/:id`, so the song with id
/// `"export"` is served from here.
pub async fn get_export_song(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    fetch_song(&state, EXPORT_SEGMENT.to_string()).await
}

async fn fetch_song(state: &AppState, id: String) -> Result<Json<Value>, ApiError> {
    state
        .songs
        .get(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

/// POST /songs
///
/// Stores the record verbatim, replacing any song with the same id.
pub async fn create_song(
    State(state): State<AppState>,
    Json(record): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let stored = state.songs.upsert(record).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// DELETE /songs/:id
///
/// Deleting an unknown id still succeeds.
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    remove_song(&state, &id).await
}

/// DELETE /songs/export, for the song whose id is `"export"`
pub async fn delete_export_song(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    remove_song(&state, EXPORT_SEGMENT).await
}

async fn remove_song(state: &AppState, id: &str) -> Result<StatusCode, ApiError> {
    state.songs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /songs/export
///
/// Replaces the whole library with the posted array and rewrites the backup file.
pub async fn export_songs(
    State(state): State<AppState>,
    Json(records): Json<Vec<Value>>,
) -> Result<Json<ExportResponse>, ApiError> {
    let count = state.songs.replace_all(&records).await?;
    Ok(Json(ExportResponse {
        message: format!("Exported {} songs", count),
    }))
}
