//! # smartpad-core
//!
//! Real-time harmony engine for the smart pad voice. Feed it note-on and
//! note-off events, ask it for the current [`HarmonicState`], and let a
//! [`SmartPad`] turn successive states into note commands.
//!
//! ```rust,ignore
//! use smartpad_core::config::Config;
//! use smartpad_core::engine::HarmonyEngine;
//!
//! let config = Config::load();
//! let mut engine = HarmonyEngine::new(config.engine())?;
//! let mut pad = config.pad();
//!
//! engine.note_on(60, 96);
//! let state = engine.get_harmonic_state();
//! for cmd in pad.apply(&state, 96) {
//!     // forward to the pad synth
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`engine`]: `HarmonyEngine`, its bounded note history and cluster scoring
//! - [`clock`]: millisecond clocks (`SystemClock`, `ManualClock` for tests)
//! - [`pad`]: `SmartPad`, the diffing voice driver
//! - [`config`]: TOML configuration (embedded defaults + user override)
//! - [`event_log`]: JSONL note logs and offline replay

pub mod clock;
pub mod config;
pub mod engine;
pub mod event_log;
pub mod pad;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{HarmonyEngine, ScoreWeights};
pub use pad::{PadCommand, SmartPad};
pub use smartpad_types::{HarmonicSource, HarmonicState, Harmony};
