//! Chord detection from a set of sounding MIDI notes.

use super::templates::{interval_mask, ChordQuality, CATALOGUE};
use super::{Chord, Detection, QualityFilter};
use crate::pitch::{interval_above, pitch_class};

/// Detect the chord spelled by `notes` (absolute MIDI numbers, any order,
/// duplicates allowed).
///
/// The lowest note is tried as the root first, so root position wins over
/// inversions. A quality is only accepted when it explains every pitch class
/// present; a triad hiding inside a denser cluster is not reported.
pub fn detect_chord(notes: &[u8], allowed: &QualityFilter) -> Detection {
    if notes.len() < 2 {
        return if notes.is_empty() {
            Detection::Empty
        } else {
            Detection::Ambiguous
        };
    }

    // Deduplicate pitch classes
    let mut present = [false; 12];
    for &n in notes {
        present[pitch_class(n) as usize] = true;
    }
    let pcs: Vec<u8> = (0..12).filter(|&pc| present[pc as usize]).collect();

    if pcs.len() < 2 {
        return Detection::Unison;
    }

    let Some(&lowest) = notes.iter().min() else {
        return Detection::Empty;
    };
    let bass = pitch_class(lowest);

    let roots = std::iter::once(bass).chain(pcs.iter().copied().filter(|&pc| pc != bass));

    for root in roots {
        let intervals = interval_mask(pcs.iter().map(|&pc| interval_above(root, pc)));

        let Some(quality) = identify_quality(intervals, pcs.len(), allowed) else {
            continue;
        };

        // Reject if any sounding interval is not part of the quality
        let required = quality.template().mask();
        if intervals & !required != 0 {
            continue;
        }

        return Detection::Chord(Chord::new(root, quality, bass));
    }

    Detection::Unknown
}

/// First allowed quality (in catalogue order) whose intervals are all present.
fn identify_quality(intervals: u16, count: usize, allowed: &QualityFilter) -> Option<ChordQuality> {
    CATALOGUE
        .iter()
        .filter(|t| allowed.allows(t.quality))
        // no point testing a tetrad against three notes
        .filter(|t| t.intervals.len() <= count)
        .find(|t| {
            let mask = t.mask();
            intervals & mask == mask
        })
        .map(|t| t.quality)
}
