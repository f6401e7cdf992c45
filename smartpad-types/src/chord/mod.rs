//! Chord vocabulary: the template catalogue, detected chords and the
//! detector that maps a set of sounding notes onto them.

pub mod chord_detect;
pub mod templates;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pitch::note_name;
pub use chord_detect::detect_chord;
pub use templates::{all_quality_names, intervals_for_quality, ChordQuality, ChordTemplate, CATALOGUE};

/// A recognised chord. `root` and `bass` are pitch classes (0-11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord {
    pub root: u8,
    pub quality: ChordQuality,
    pub bass: u8,
}

impl Chord {
    pub fn new(root: u8, quality: ChordQuality, bass: u8) -> Self {
        Self {
            root: root % 12,
            quality,
            bass: bass % 12,
        }
    }

    /// Lowest note is not the root (rendered as a slash chord).
    pub fn is_inversion(&self) -> bool {
        self.root != self.bass
    }

    /// Rendered label, e.g. `C`, `F#m7`, `C/E`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", note_name(self.root), self.quality.name())?;
        if self.is_inversion() {
            write!(f, "/{}", note_name(self.bass))?;
        }
        Ok(())
    }
}

/// Outcome of a single detection. Everything except `Chord` is a
/// non-match sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// No notes at all.
    Empty,
    /// A single note: not enough to call a chord.
    Ambiguous,
    /// Several notes, all octaves of one pitch class.
    Unison,
    /// Notes present but no template fits them exactly.
    Unknown,
    Chord(Chord),
}

impl Detection {
    pub fn chord(&self) -> Option<Chord> {
        match self {
            Detection::Chord(c) => Some(*c),
            _ => None,
        }
    }

    pub fn is_chord(&self) -> bool {
        matches!(self, Detection::Chord(_))
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detection::Empty => f.write_str("--"),
            Detection::Ambiguous => f.write_str("..."),
            Detection::Unison => f.write_str("Unison"),
            Detection::Unknown => f.write_str("Unknown"),
            Detection::Chord(c) => write!(f, "{}", c),
        }
    }
}

/// Which qualities the detector may report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QualityFilter {
    #[default]
    All,
    Only(BTreeSet<ChordQuality>),
}

impl QualityFilter {
    pub fn only(qualities: impl IntoIterator<Item = ChordQuality>) -> Self {
        QualityFilter::Only(qualities.into_iter().collect())
    }

    /// Build from catalogue names. Unknown names are returned separately.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> (Self, Vec<&'a str>) {
        let mut known = BTreeSet::new();
        let mut unknown = Vec::new();
        for name in names {
            match ChordQuality::from_name(name) {
                Some(q) => {
                    known.insert(q);
                }
                None => unknown.push(name),
            }
        }
        (QualityFilter::Only(known), unknown)
    }

    pub fn allows(&self, quality: ChordQuality) -> bool {
        match self {
            QualityFilter::All => true,
            QualityFilter::Only(set) => set.contains(&quality),
        }
    }

    /// An `Only` filter that admits nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, QualityFilter::Only(set) if set.is_empty())
    }
}
