//! Engine input and output records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chord::{Chord, Detection};

/// A note-on as retained in the engine history. Note-offs are never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub note: u8,
    /// Milliseconds on the engine clock; non-decreasing along the history.
    pub timestamp: u64,
    pub velocity: u8,
}

/// Why a chord is being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmonicSource {
    /// Detected from the live history/held-note clusters.
    HistoryCluster,
    /// Nothing matches now; the last stable chord is being held.
    SustainHold,
}

impl HarmonicSource {
    pub fn name(&self) -> &'static str {
        match self {
            HarmonicSource::HistoryCluster => "history_cluster",
            HarmonicSource::SustainHold => "sustain_hold",
        }
    }
}

/// What a non-silent state names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Harmony {
    Chord(Chord),
    /// Two or more notes, all the same pitch class.
    Unison,
}

impl Harmony {
    /// The detections an engine may report. Empty, ambiguous and unknown
    /// results give `None`.
    pub fn from_detection(detection: Detection) -> Option<Self> {
        match detection {
            Detection::Chord(chord) => Some(Harmony::Chord(chord)),
            Detection::Unison => Some(Harmony::Unison),
            Detection::Empty | Detection::Ambiguous | Detection::Unknown => None,
        }
    }

    pub fn chord(&self) -> Option<Chord> {
        match self {
            Harmony::Chord(chord) => Some(*chord),
            Harmony::Unison => None,
        }
    }
}

impl fmt::Display for Harmony {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Harmony::Chord(chord) => write!(f, "{}", chord),
            Harmony::Unison => f.write_str("Unison"),
        }
    }
}

/// Snapshot returned by the engine after every query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HarmonicState {
    pub harmony: Option<Harmony>,
    /// Absolute MIDI notes backing the chord, ascending and unique.
    pub notes: Vec<u8>,
    /// `None` when silent.
    pub source: Option<HarmonicSource>,
}

impl HarmonicState {
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn is_silent(&self) -> bool {
        self.harmony.is_none()
    }

    /// The named chord; `None` when silent or for a unison.
    pub fn chord(&self) -> Option<Chord> {
        self.harmony.and_then(|h| h.chord())
    }

    /// Chord label, `Unison`, or `--` when silent.
    pub fn label(&self) -> String {
        self.harmony
            .map(|h| h.to_string())
            .unwrap_or_else(|| "--".to_string())
    }

    /// Same chord and notes, relabelled as a sustain hold.
    pub fn held(&self) -> Self {
        Self {
            source: Some(HarmonicSource::SustainHold),
            ..self.clone()
        }
    }
}
