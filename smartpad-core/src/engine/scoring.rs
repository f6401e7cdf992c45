//! Cluster scoring.
//!
//! Each candidate cluster (a trailing slice of the history plus the held
//! notes) that detects as a chord or a unison is scored; the engine keeps
//! the best one.

use smartpad_types::pitch::pitch_class;
use smartpad_types::{Harmony, NoteEvent};

/// Tunable weights for [`score_cluster`]. `Default` holds the stock values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Weight of the oldest event in a cluster.
    pub position_floor: f64,
    /// Added across the cluster from oldest to newest (floor .. floor + span).
    pub position_span: f64,
    /// Events this close to the latest note-on count as "very recent".
    pub recency_window_ms: u64,
    pub recency_bonus: f64,
    /// Candidate still contains the most recent note played.
    pub last_note_bonus: f64,
    /// Candidate dropped the most recent note played.
    pub last_note_penalty: f64,
    /// Seventh/ninth qualities.
    pub extension_bonus: f64,
    /// Lowest note is the chord root.
    pub bass_root_bonus: f64,
    /// Candidates must score strictly above this to be considered at all.
    pub score_floor: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            position_floor: 0.5,
            position_span: 1.0,
            recency_window_ms: 500,
            recency_bonus: 2.0,
            last_note_bonus: 10.0,
            last_note_penalty: 20.0,
            extension_bonus: 0.5,
            bass_root_bonus: 2.0,
            score_floor: -1.0,
        }
    }
}

/// Score one candidate.
///
/// `cluster` is oldest first, `notes` is the candidate's sorted note set and
/// `latest` the newest event in the whole history. Recency is measured
/// against `latest`, not the clock, so scores stay frozen once input stops.
/// A unison has no root or extension and earns neither bonus.
pub fn score_cluster(
    weights: &ScoreWeights,
    cluster: &[NoteEvent],
    harmony: &Harmony,
    notes: &[u8],
    latest: Option<&NoteEvent>,
) -> f64 {
    let mut score = 0.0;

    let len = cluster.len() as f64;
    let reference = latest.map(|e| e.timestamp);
    for (i, event) in cluster.iter().enumerate() {
        score += weights.position_floor + weights.position_span * (i as f64 / len);
        let very_recent = reference
            .is_some_and(|r| r.saturating_sub(event.timestamp) < weights.recency_window_ms);
        if very_recent {
            score += weights.recency_bonus;
        }
    }

    if let Some(latest) = latest {
        if notes.contains(&latest.note) {
            score += weights.last_note_bonus;
        } else {
            score -= weights.last_note_penalty;
        }
    }

    let Harmony::Chord(chord) = harmony else {
        return score;
    };

    if chord.quality.is_extended() {
        score += weights.extension_bonus;
    }

    if let Some(&lowest) = notes.first() {
        if pitch_class(lowest) == chord.root {
            score += weights.bass_root_bonus;
        }
    }

    score
}
