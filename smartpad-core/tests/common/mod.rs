use smartpad_core::{HarmonyEngine, ManualClock};
use smartpad_types::{EngineConfig, HarmonicState};

/// Engine on a hand-driven clock.
pub struct Rig {
    pub engine: HarmonyEngine<ManualClock>,
    pub clock: ManualClock,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let clock = ManualClock::new(0);
        let engine = HarmonyEngine::with_clock(config, clock.clone()).unwrap();
        Self { engine, clock }
    }

    /// Press `note` at `t_ms` and query, like the live front end does.
    pub fn press(&mut self, note: u8, t_ms: u64) -> HarmonicState {
        self.clock.set(t_ms);
        self.engine.note_on(note, 100);
        self.engine.get_harmonic_state()
    }

    pub fn release(&mut self, note: u8, t_ms: u64) -> HarmonicState {
        self.clock.set(t_ms);
        self.engine.note_off(note);
        self.engine.get_harmonic_state()
    }

    pub fn play(&mut self, notes: &[(u8, u64)]) {
        for &(note, t) in notes {
            self.press(note, t);
        }
    }
}
