//! Harmony engine: turns a stream of note-on/note-off events into a stable
//! chord for the smart pad.
//!
//! Every note-on is kept in a short history. On each query the engine tries
//! trailing slices of that history (three events, four, ... all of them),
//! each combined with the notes still held, detects a chord (or a unison) for
//! every slice and keeps the best-scoring one. When nothing detects, the last
//! stable state is held for the configured sustain time (forever when latched).
//!
//! Sustain expiry is evaluated lazily: a held chord only disappears when
//! the engine is queried again.

mod history;
pub mod scoring;

use std::collections::BTreeSet;

use smartpad_types::{
    detect_chord, ConfigError, EngineConfig, EngineConfigUpdate, HarmonicSource, HarmonicState,
    Harmony, NoteEvent,
};

use crate::clock::{Clock, SystemClock};
pub use history::NoteHistory;
pub use scoring::{score_cluster, ScoreWeights};

/// Smallest trailing slice of the history that is tried as a chord.
pub const MIN_CLUSTER_SIZE: usize = 3;

/// Single-caller, synchronous. Wrap in a lock to share across threads.
pub struct HarmonyEngine<C: Clock = SystemClock> {
    config: EngineConfig,
    weights: ScoreWeights,
    clock: C,
    held: BTreeSet<u8>,
    history: NoteHistory,
    last_stable: Option<HarmonicState>,
    last_active_ms: u64,
}

impl HarmonyEngine<SystemClock> {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock::new())
    }
}

impl Default for HarmonyEngine<SystemClock> {
    fn default() -> Self {
        Self::build(EngineConfig::default(), SystemClock::new())
    }
}

impl<C: Clock> HarmonyEngine<C> {
    pub fn with_clock(config: EngineConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    fn build(config: EngineConfig, clock: C) -> Self {
        let last_active_ms = clock.now_ms();
        Self {
            history: NoteHistory::new(config.history_size),
            config,
            weights: ScoreWeights::default(),
            clock,
            held: BTreeSet::new(),
            last_stable: None,
            last_active_ms,
        }
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Currently pressed notes, ascending.
    pub fn held_notes(&self) -> impl Iterator<Item = u8> + '_ {
        self.held.iter().copied()
    }

    /// Retained note-ons, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &NoteEvent> {
        self.history.iter()
    }

    pub fn last_stable_chord(&self) -> Option<&HarmonicState> {
        self.last_stable.as_ref()
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) {
        self.held.insert(note);
        let event = NoteEvent {
            note,
            timestamp: self.clock.now_ms(),
            velocity,
        };
        if self.history.push(event) {
            log::debug!("phrase gap before note {}, history restarted", note);
        }
    }

    /// Release a note. Its note-on stays in the history as context.
    pub fn note_off(&mut self, note: u8) {
        self.held.remove(&note);
    }

    /// Decide what is being played right now.
    pub fn get_harmonic_state(&mut self) -> HarmonicState {
        if self.held.is_empty() && self.history.is_empty() {
            return HarmonicState::silent();
        }

        let now = self.clock.now_ms();

        if let Some((state, score)) = self.best_cluster() {
            if self.last_stable.as_ref().map(|s| s.harmony) != Some(state.harmony) {
                log::debug!(
                    "chord {} from {:?} (score {:.2})",
                    state.label(),
                    state.notes,
                    score
                );
            }
            self.last_stable = Some(state.clone());
            self.last_active_ms = now;
            return state;
        }

        let elapsed = now.saturating_sub(self.last_active_ms);
        match &self.last_stable {
            Some(stable) if elapsed < self.config.sustain_time_ms => {
                log::trace!("holding {} ({} ms since last match)", stable.label(), elapsed);
                stable.held()
            }
            _ => HarmonicState::silent(),
        }
    }

    /// Best-scoring cluster candidate, if any clears the score floor.
    /// Ties keep the smaller cluster.
    fn best_cluster(&self) -> Option<(HarmonicState, f64)> {
        let latest = self.history.latest();
        let mut best: Option<(HarmonicState, f64)> = None;
        let mut best_score = self.weights.score_floor;

        for size in MIN_CLUSTER_SIZE..=self.history.len() {
            let cluster: Vec<NoteEvent> = self.history.tail(size).copied().collect();

            // held notes always take part, whatever the cluster size
            let mut notes = self.held.clone();
            notes.extend(cluster.iter().map(|e| e.note));
            let notes: Vec<u8> = notes.into_iter().collect();

            let detection = detect_chord(&notes, &self.config.allowed_qualities);
            let Some(harmony) = Harmony::from_detection(detection) else {
                continue;
            };

            let score = score_cluster(&self.weights, &cluster, &harmony, &notes, latest);
            log::trace!("cluster {}: {} {:?} scored {:.2}", size, harmony, notes, score);

            if score > best_score {
                best_score = score;
                best = Some((
                    HarmonicState {
                        harmony: Some(harmony),
                        notes,
                        source: Some(HarmonicSource::HistoryCluster),
                    },
                    score,
                ));
            }
        }

        best
    }

    /// Panic button: forget held notes, history and the held chord.
    pub fn reset(&mut self) {
        self.held.clear();
        self.history.clear();
        self.last_stable = None;
        self.last_active_ms = self.clock.now_ms();
    }

    /// Apply a partial update. On error the current config is untouched.
    pub fn update_config(&mut self, update: EngineConfigUpdate) -> Result<(), ConfigError> {
        let next = self.config.merged(update);
        self.set_config(next)
    }

    /// Replace the whole config.
    pub fn set_config(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.history.set_capacity(config.history_size);
        log::debug!(
            "engine config: history {}, sustain {}, qualities {:?}",
            config.history_size,
            if config.is_latched() {
                "latch".to_string()
            } else {
                format!("{} ms", config.sustain_time_ms)
            },
            config.allowed_qualities
        );
        self.config = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use smartpad_types::{QualityFilter, LATCH_SUSTAIN_MS};

    fn engine() -> (HarmonyEngine<ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        let engine = HarmonyEngine::with_clock(EngineConfig::default(), clock.clone())
            .expect("default config is valid");
        (engine, clock)
    }

    #[test]
    fn empty_engine_is_silent() {
        let (mut engine, _) = engine();
        let state = engine.get_harmonic_state();
        assert!(state.is_silent());
        assert!(engine.last_stable_chord().is_none());
    }

    #[test]
    fn two_events_are_not_enough() {
        let (mut engine, clock) = engine();
        engine.note_on(60, 100);
        clock.advance(10);
        engine.note_on(67, 100);
        assert!(engine.get_harmonic_state().is_silent());
    }

    #[test]
    fn note_off_keeps_history() {
        let (mut engine, _) = engine();
        engine.note_on(60, 90);
        engine.note_off(60);
        assert_eq!(engine.held_notes().count(), 0);
        let history: Vec<u8> = engine.history().map(|e| e.note).collect();
        assert_eq!(history, vec![60]);
    }

    #[test]
    fn repeated_note_on_is_held_once() {
        let (mut engine, _) = engine();
        engine.note_on(60, 90);
        engine.note_on(60, 90);
        assert_eq!(engine.held_notes().collect::<Vec<_>>(), vec![60]);
        assert_eq!(engine.history().count(), 2);
    }

    #[test]
    fn rejects_invalid_config_at_construction() {
        let config = EngineConfig {
            history_size: 1,
            ..EngineConfig::default()
        };
        assert!(HarmonyEngine::with_clock(config, ManualClock::new(0)).is_err());
    }

    #[test]
    fn failed_update_leaves_config_alone() {
        let (mut engine, _) = engine();
        let err = engine
            .update_config(EngineConfigUpdate::default().history_size(2).latch(true))
            .unwrap_err();
        assert_eq!(err, ConfigError::HistorySizeOutOfRange(2));
        assert_eq!(engine.config(), &EngineConfig::default());

        let err = engine
            .update_config(
                EngineConfigUpdate::default().allowed_qualities(QualityFilter::only(Vec::new())),
            )
            .unwrap_err();
        assert_eq!(err, ConfigError::EmptyQualityFilter);
    }

    #[test]
    fn update_merges_and_trims_history() {
        let (mut engine, clock) = engine();
        for n in [60, 62, 64, 65, 67] {
            engine.note_on(n, 100);
            clock.advance(5);
        }
        engine
            .update_config(EngineConfigUpdate::default().history_size(3))
            .unwrap();
        let history: Vec<u8> = engine.history().map(|e| e.note).collect();
        assert_eq!(history, vec![64, 65, 67]);
        assert_eq!(engine.config().sustain_time_ms, 10_000);

        engine
            .update_config(EngineConfigUpdate::default().sustain_time_ms(LATCH_SUSTAIN_MS))
            .unwrap();
        assert!(engine.config().is_latched());
        assert_eq!(engine.config().history_size, 3);
    }

    #[test]
    fn reset_clears_everything() {
        let (mut engine, clock) = engine();
        for n in [60, 64, 67] {
            engine.note_on(n, 100);
            clock.advance(10);
        }
        assert!(!engine.get_harmonic_state().is_silent());

        engine.reset();
        assert_eq!(engine.held_notes().count(), 0);
        assert_eq!(engine.history().count(), 0);
        assert!(engine.last_stable_chord().is_none());

        clock.advance(10);
        assert!(engine.get_harmonic_state().is_silent());
    }

    #[test]
    fn unreachable_score_floor_disables_detection() {
        let (engine, clock) = engine();
        let mut engine = engine.with_weights(ScoreWeights {
            score_floor: 1_000.0,
            ..ScoreWeights::default()
        });
        for n in [60, 64, 67] {
            engine.note_on(n, 100);
            clock.advance(10);
        }
        assert!(engine.get_harmonic_state().is_silent());
    }
}
