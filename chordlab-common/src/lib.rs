//! # ChordLab Common Library
//!
//! Shared code for the ChordLab backend:
//! - Chord classification against the fixed triad catalog
//! - Song store (SQLite table plus JSON backup file)
//! - Database initialization
//! - Configuration loading
//! - Error types

pub mod chord;
pub mod config;
pub mod db;
pub mod error;
pub mod songs;

pub use chord::{detect_chord, ChordCheck, UNKNOWN_CHORD};
pub use error::{Error, Result};
pub use songs::SongStore;
