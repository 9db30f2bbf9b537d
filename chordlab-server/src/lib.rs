//! chordlab-server library - HTTP surface for chord checking and the song library

use axum::Router;
use chordlab_common::SongStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Song records and their backup file
    pub songs: SongStore,
}

impl AppState {
    /// Create new application state
    pub fn new(songs: SongStore) -> Self {
        Self { songs }
    }
}

/// Build application router
///
/// Every route also answers `OPTIONS` with an empty 200 for cross-origin clients.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route(
            "/check-chord",
            post(api::check_chord).options(api::preflight),
        )
        .route(
            "/songs",
            get(api::list_songs)
                .post(api::create_song)
                .options(api::preflight),
        )
        .route(
            "/songs/export",
            post(api::export_songs)
                .get(api::get_export_song)
                .delete(api::delete_export_song)
                .options(api::preflight),
        )
        .route(
            "/songs/:id",
            get(api::get_song)
                .delete(api::delete_song)
                .options(api::preflight),
        )
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Browser clients run on another origin
        .layer(CorsLayer::permissive())
}
