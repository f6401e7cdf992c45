//! # smartpad-types
//!
//! Pure harmonic-analysis building blocks for the smart pad: pitch-class
//! helpers, the chord template catalogue, the chord detector, and the
//! records exchanged with the harmony engine in `smartpad-core`.

pub mod chord;
pub mod config;
pub mod harmonic;
pub mod pitch;

pub use chord::{
    all_quality_names, detect_chord, intervals_for_quality, Chord, ChordQuality, ChordTemplate,
    Detection, QualityFilter,
};
pub use config::{
    ConfigError, EngineConfig, EngineConfigUpdate, DEFAULT_HISTORY_SIZE, DEFAULT_SUSTAIN_TIME_MS,
    LATCH_SUSTAIN_MS, MAX_HISTORY_AGE_MS, MAX_HISTORY_SIZE, MIN_HISTORY_SIZE,
};
pub use harmonic::{HarmonicSource, HarmonicState, Harmony, NoteEvent};
