//! HTTP API handlers for chordlab-server

pub mod chord;
pub mod error;
pub mod health;
pub mod songs;

pub use chord::check_chord;
pub use error::ApiError;
pub use health::{get_build_info, health_routes, BuildInfo};
pub use songs::{
    create_song, delete_export_song, delete_song, export_songs, get_export_song, get_song,
    list_songs,
};

use axum::http::StatusCode;

/// OPTIONS on any route: empty success
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
