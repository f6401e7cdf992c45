//! Smart pad voice: turns successive harmonic states into note commands.
//!
//! The engine reports which notes make up the current chord; the pad keeps
//! track of what it is already sounding and emits only the difference.

use std::collections::BTreeSet;

use smartpad_types::HarmonicState;

/// Velocity used when a release triggers the update and no fixed velocity
/// is configured.
pub const FALLBACK_VELOCITY: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadCommand {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
}

#[derive(Debug, Clone, Default)]
pub struct SmartPad {
    /// Untransposed notes currently sounding.
    sounding: BTreeSet<u8>,
    octave_shift: i8,
    /// Ignore playing dynamics and always use this velocity.
    fixed_velocity: Option<u8>,
}

impl SmartPad {
    pub fn new(octave_shift: i8, fixed_velocity: Option<u8>) -> Self {
        Self {
            sounding: BTreeSet::new(),
            octave_shift,
            fixed_velocity,
        }
    }

    pub fn sounding(&self) -> impl Iterator<Item = u8> + '_ {
        self.sounding.iter().copied()
    }

    pub fn octave_shift(&self) -> i8 {
        self.octave_shift
    }

    /// Follow a new harmonic state. `velocity` is that of the note event
    /// that caused the update (0 for a release).
    pub fn apply(&mut self, state: &HarmonicState, velocity: u8) -> Vec<PadCommand> {
        let target: BTreeSet<u8> = state.notes.iter().copied().collect();
        let velocity = match self.fixed_velocity {
            Some(v) => v,
            None if velocity > 0 => velocity,
            None => FALLBACK_VELOCITY,
        };

        let mut commands = Vec::new();

        let stale: Vec<u8> = self.sounding.difference(&target).copied().collect();
        for note in stale {
            self.sounding.remove(&note);
            if let Some(note) = self.transpose(note) {
                commands.push(PadCommand::NoteOff { note });
            }
        }

        for &note in target.difference(&self.sounding) {
            if let Some(note) = self.transpose(note) {
                commands.push(PadCommand::NoteOn { note, velocity });
            }
        }
        self.sounding.extend(target);

        commands
    }

    /// Silence everything, e.g. when the pad is switched off.
    pub fn release_all(&mut self) -> Vec<PadCommand> {
        let commands = self
            .sounding
            .iter()
            .filter_map(|&n| self.transpose(n))
            .map(|note| PadCommand::NoteOff { note })
            .collect();
        self.sounding.clear();
        commands
    }

    /// Change transposition. Notes sounding at the old shift are released.
    pub fn set_octave_shift(&mut self, octave_shift: i8) -> Vec<PadCommand> {
        let commands = self.release_all();
        self.octave_shift = octave_shift;
        commands
    }

    pub fn set_fixed_velocity(&mut self, velocity: Option<u8>) {
        self.fixed_velocity = velocity;
    }

    /// Shifted note, or `None` if it falls outside the MIDI range.
    fn transpose(&self, note: u8) -> Option<u8> {
        let shifted = note as i16 + self.octave_shift as i16 * 12;
        u8::try_from(shifted).ok().filter(|n| *n <= 127)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartpad_types::{Chord, ChordQuality, HarmonicSource, Harmony};

    fn state(notes: &[u8]) -> HarmonicState {
        HarmonicState {
            harmony: Some(Harmony::Chord(Chord::new(0, ChordQuality::Major, 0))),
            notes: notes.to_vec(),
            source: Some(HarmonicSource::HistoryCluster),
        }
    }

    #[test]
    fn first_chord_turns_all_notes_on() {
        let mut pad = SmartPad::default();
        let cmds = pad.apply(&state(&[60, 64, 67]), 90);
        assert_eq!(
            cmds,
            vec![
                PadCommand::NoteOn { note: 60, velocity: 90 },
                PadCommand::NoteOn { note: 64, velocity: 90 },
                PadCommand::NoteOn { note: 67, velocity: 90 },
            ]
        );
    }

    #[test]
    fn chord_change_only_sends_difference() {
        let mut pad = SmartPad::default();
        pad.apply(&state(&[60, 64, 67]), 90);
        // C -> Am: E and C stay, G off, A on
        let cmds = pad.apply(&state(&[57, 60, 64]), 80);
        assert_eq!(
            cmds,
            vec![
                PadCommand::NoteOff { note: 67 },
                PadCommand::NoteOn { note: 57, velocity: 80 },
            ]
        );
        assert_eq!(pad.sounding().collect::<Vec<_>>(), vec![57, 60, 64]);
    }

    #[test]
    fn same_state_is_silent() {
        let mut pad = SmartPad::default();
        pad.apply(&state(&[60, 64, 67]), 90);
        assert!(pad.apply(&state(&[60, 64, 67]), 0).is_empty());
    }

    #[test]
    fn silence_releases_everything() {
        let mut pad = SmartPad::default();
        pad.apply(&state(&[60, 64, 67]), 90);
        let cmds = pad.apply(&HarmonicState::silent(), 0);
        assert_eq!(cmds.len(), 3);
        assert!(cmds.iter().all(|c| matches!(c, PadCommand::NoteOff { .. })));
        assert_eq!(pad.sounding().count(), 0);
    }

    #[test]
    fn release_velocity_falls_back() {
        let mut pad = SmartPad::default();
        let cmds = pad.apply(&state(&[60]), 0);
        assert_eq!(cmds, vec![PadCommand::NoteOn { note: 60, velocity: FALLBACK_VELOCITY }]);
    }

    #[test]
    fn fixed_velocity_overrides_dynamics() {
        let mut pad = SmartPad::new(0, Some(64));
        let cmds = pad.apply(&state(&[60]), 127);
        assert_eq!(cmds, vec![PadCommand::NoteOn { note: 60, velocity: 64 }]);
    }

    #[test]
    fn octave_shift_transposes_and_clips() {
        let mut pad = SmartPad::new(-1, None);
        let cmds = pad.apply(&state(&[5, 60]), 100);
        // 5 - 12 is below the MIDI range: tracked, not sent
        assert_eq!(cmds, vec![PadCommand::NoteOn { note: 48, velocity: 100 }]);
        assert_eq!(pad.sounding().collect::<Vec<_>>(), vec![5, 60]);

        let mut pad = SmartPad::new(1, None);
        let cmds = pad.apply(&state(&[120, 60]), 100);
        assert_eq!(cmds, vec![PadCommand::NoteOn { note: 72, velocity: 100 }]);
    }

    #[test]
    fn changing_shift_releases_old_voicing() {
        let mut pad = SmartPad::new(0, None);
        pad.apply(&state(&[60, 64]), 100);
        let cmds = pad.set_octave_shift(1);
        assert_eq!(
            cmds,
            vec![PadCommand::NoteOff { note: 60 }, PadCommand::NoteOff { note: 64 }]
        );
        let cmds = pad.apply(&state(&[60, 64]), 100);
        assert_eq!(
            cmds,
            vec![
                PadCommand::NoteOn { note: 72, velocity: 100 },
                PadCommand::NoteOn { note: 76, velocity: 100 },
            ]
        );
    }
}
