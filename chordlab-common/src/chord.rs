//! Chord classification
//!
//! Maps a set of simultaneously pressed keys to a chord name by exact set
//! equality against a fixed catalog. Key order and duplicates never matter:
//! the catalog is keyed by ordered sets, so any permutation of the same keys
//! collapses to the same lookup key.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Label returned when the pressed keys match no catalog entry
pub const UNKNOWN_CHORD: &str = "Unknown";

/// Key set of a chord pattern
pub type KeySet = BTreeSet<String>;

/// Fixed chord catalog, built once on first use and never modified
static CATALOG: Lazy<BTreeMap<KeySet, &'static str>> = Lazy::new(|| {
    [
        (["C", "E", "G"], "C Major"),
        (["A", "C", "E"], "A Minor"),
        (["G", "B", "D"], "G Major"),
    ]
    .into_iter()
    .map(|(keys, label)| (key_set(keys), label))
    .collect()
});

/// Build the distinct set of key names from any sequence of keys
pub fn key_set<I, S>(keys: I) -> KeySet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter().map(|k| k.as_ref().to_string()).collect()
}

/// Detect the chord formed by `keys`
///
/// Returns the catalog label when the distinct keys equal a pattern exactly,
/// otherwise [`UNKNOWN_CHORD`]. Subsets and supersets of a pattern do not match.
pub fn detect_chord<I, S>(keys: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    CATALOG
        .get(&key_set(keys))
        .copied()
        .unwrap_or(UNKNOWN_CHORD)
        .to_string()
}

/// Result of checking pressed keys against the chord the player aimed for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordCheck {
    pub detected_chord: String,
    pub is_correct: bool,
}

impl ChordCheck {
    /// Classify `keys` and compare the label with `expected`
    ///
    /// A missing expected chord is never correct.
    pub fn evaluate<I, S>(keys: I, expected: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let detected_chord = detect_chord(keys);
        let is_correct = expected == Some(detected_chord.as_str());
        Self {
            detected_chord,
            is_correct,
        }
    }
}
