//! Chord checking endpoint

use axum::Json;
use chordlab_common::ChordCheck;
use serde::Deserialize;
use tracing::debug;

/// POST /check-chord request body
///
/// Both fields are optional on the wire: missing keys means nothing pressed.
#[derive(Debug, Default, Deserialize)]
pub struct CheckChordRequest {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub expected_chord: Option<String>,
}

/// POST /check-chord
///
/// Classifies the pressed keys and reports whether they form the expected chord.
pub async fn check_chord(Json(request): Json<CheckChordRequest>) -> Json<ChordCheck> {
    let check = ChordCheck::evaluate(&request.keys, request.expected_chord.as_deref());
    debug!(
        "Keys {:?} detected as {} (correct: {})",
        request.keys, check.detected_chord, check.is_correct
    );
    Json(check)
}
