//! Pitch-class helpers shared by the detector and the engine.

/// Sharp spellings, indexed by pitch class.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Reduce a MIDI note number to its pitch class (0-11).
pub fn pitch_class(note: u8) -> u8 {
    note % 12
}

/// Name of a pitch class. Values above 11 wrap.
pub fn note_name(pc: u8) -> &'static str {
    NOTE_NAMES[(pc % 12) as usize]
}

/// Note name with octave, MIDI 60 = C4.
pub fn midi_to_note_name(note: u8) -> String {
    let octave = (note as i32 / 12) - 1;
    format!("{}{}", note_name(pitch_class(note)), octave)
}

/// Parse the leading letter and optional sharp of a label ("C#m7" -> 1).
pub fn parse_pitch_class(label: &str) -> Option<u8> {
    let mut chars = label.chars();
    let base = match chars.next()? {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    match chars.next() {
        Some('#') => Some((base + 1) % 12),
        _ => Some(base),
    }
}

/// Interval from `root` up to `pc`, in semitones (0-11).
pub fn interval_above(root: u8, pc: u8) -> u8 {
    (pc % 12 + 12 - root % 12) % 12
}
