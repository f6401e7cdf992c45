//! Chord quality catalogue.
//!
//! Qualities are listed from most to least specific (six notes down to the
//! two-note power chord). The order doubles as the match priority: when more
//! than one template fits, the earlier one wins.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// One catalogue entry: a quality, its display suffix and its root-relative
/// intervals (ascending, always starting at 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordTemplate {
    pub quality: ChordQuality,
    pub name: &'static str,
    pub intervals: &'static [u8],
}

impl ChordTemplate {
    /// Bit `i` set for every interval `i` in the template.
    pub fn mask(&self) -> u16 {
        interval_mask(self.intervals.iter().copied())
    }
}

/// Chord quality, declared in catalogue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChordQuality {
    // Hexads
    Minor11,
    // Pentads
    Thirteenth,
    Major7Sharp11,
    Minor7Add11,
    SevenFlat9,
    Ninth,
    Major9,
    Minor9,
    SixNine,
    MinorSixNine,
    // Tetrads
    Eleventh,
    FifthSixNine,
    Add9,
    MinorAdd9,
    Dominant7,
    Major7,
    Minor7,
    Diminished7,
    MinorMajor7,
    SevenSus4,
    Sixth,
    Minor6,
    HalfDiminished7,
    // Triads
    Major,
    Minor,
    Diminished,
    Augmented,
    Sus2,
    Sus4,
    // Dyads
    Power,
}

pub const CATALOGUE: [ChordTemplate; 30] = [
    tpl(ChordQuality::Minor11, "m11", &[0, 2, 3, 5, 7, 10]),
    tpl(ChordQuality::Thirteenth, "13", &[0, 2, 4, 9, 10]), // no 5th
    tpl(ChordQuality::Major7Sharp11, "M7(#11)", &[0, 4, 6, 7, 11]),
    tpl(ChordQuality::Minor7Add11, "m7(11)", &[0, 3, 5, 7, 10]), // no 9th
    tpl(ChordQuality::SevenFlat9, "7b9", &[0, 1, 4, 7, 10]),
    tpl(ChordQuality::Ninth, "9", &[0, 2, 4, 7, 10]),
    tpl(ChordQuality::Major9, "M9", &[0, 2, 4, 7, 11]),
    tpl(ChordQuality::Minor9, "m9", &[0, 2, 3, 7, 10]),
    tpl(ChordQuality::SixNine, "6/9", &[0, 2, 4, 7, 9]),
    tpl(ChordQuality::MinorSixNine, "m6/9", &[0, 2, 3, 7, 9]),
    tpl(ChordQuality::Eleventh, "11", &[0, 2, 5, 10]), // no 3rd, no 5th
    tpl(ChordQuality::FifthSixNine, "5(6/9)", &[0, 2, 7, 9]),
    tpl(ChordQuality::Add9, "add9", &[0, 2, 4, 7]),
    tpl(ChordQuality::MinorAdd9, "m(add9)", &[0, 2, 3, 7]),
    tpl(ChordQuality::Dominant7, "7", &[0, 4, 7, 10]),
    tpl(ChordQuality::Major7, "M7", &[0, 4, 7, 11]),
    tpl(ChordQuality::Minor7, "m7", &[0, 3, 7, 10]),
    tpl(ChordQuality::Diminished7, "dim7", &[0, 3, 6, 9]),
    tpl(ChordQuality::MinorMajor7, "m(maj7)", &[0, 3, 7, 11]),
    tpl(ChordQuality::SevenSus4, "7sus4", &[0, 5, 7, 10]),
    tpl(ChordQuality::Sixth, "6", &[0, 4, 7, 9]),
    tpl(ChordQuality::Minor6, "m6", &[0, 3, 7, 9]),
    tpl(ChordQuality::HalfDiminished7, "m7(b5)", &[0, 3, 6, 10]),
    tpl(ChordQuality::Major, "", &[0, 4, 7]),
    tpl(ChordQuality::Minor, "m", &[0, 3, 7]),
    tpl(ChordQuality::Diminished, "dim", &[0, 3, 6]),
    tpl(ChordQuality::Augmented, "aug", &[0, 4, 8]),
    tpl(ChordQuality::Sus2, "sus2", &[0, 2, 7]),
    tpl(ChordQuality::Sus4, "sus4", &[0, 5, 7]),
    tpl(ChordQuality::Power, "5", &[0, 7]),
];

const fn tpl(quality: ChordQuality, name: &'static str, intervals: &'static [u8]) -> ChordTemplate {
    ChordTemplate {
        quality,
        name,
        intervals,
    }
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 30] = [
        ChordQuality::Minor11,
        ChordQuality::Thirteenth,
        ChordQuality::Major7Sharp11,
        ChordQuality::Minor7Add11,
        ChordQuality::SevenFlat9,
        ChordQuality::Ninth,
        ChordQuality::Major9,
        ChordQuality::Minor9,
        ChordQuality::SixNine,
        ChordQuality::MinorSixNine,
        ChordQuality::Eleventh,
        ChordQuality::FifthSixNine,
        ChordQuality::Add9,
        ChordQuality::MinorAdd9,
        ChordQuality::Dominant7,
        ChordQuality::Major7,
        ChordQuality::Minor7,
        ChordQuality::Diminished7,
        ChordQuality::MinorMajor7,
        ChordQuality::SevenSus4,
        ChordQuality::Sixth,
        ChordQuality::Minor6,
        ChordQuality::HalfDiminished7,
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
        ChordQuality::Augmented,
        ChordQuality::Sus2,
        ChordQuality::Sus4,
        ChordQuality::Power,
    ];

    pub fn template(self) -> &'static ChordTemplate {
        &CATALOGUE[self as usize]
    }

    /// Display suffix appended to the root name ("" for major).
    pub fn name(self) -> &'static str {
        self.template().name
    }

    pub fn intervals(self) -> &'static [u8] {
        self.template().intervals
    }

    pub fn from_name(name: &str) -> Option<ChordQuality> {
        CATALOGUE.iter().find(|t| t.name == name).map(|t| t.quality)
    }

    /// Seventh or ninth family, judged by the rendered suffix.
    pub fn is_extended(self) -> bool {
        self.name().contains('7') || self.name().contains('9')
    }
}

// Qualities travel as their display suffix so config files read naturally.
impl Serialize for ChordQuality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ChordQuality {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        ChordQuality::from_name(&name)
            .ok_or_else(|| de::Error::custom(format!("unknown chord quality: {:?}", name)))
    }
}

/// Catalogue names in priority order.
pub fn all_quality_names() -> Vec<&'static str> {
    CATALOGUE.iter().map(|t| t.name).collect()
}

/// Required intervals for a quality name; empty for unknown names.
pub fn intervals_for_quality(name: &str) -> &'static [u8] {
    ChordQuality::from_name(name)
        .map(ChordQuality::intervals)
        .unwrap_or(&[])
}

pub fn interval_mask(intervals: impl IntoIterator<Item = u8>) -> u16 {
    intervals
        .into_iter()
        .fold(0u16, |mask, i| mask | (1 << (i % 12)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_matches_declaration_order() {
        for (i, q) in ChordQuality::ALL.iter().enumerate() {
            assert_eq!(CATALOGUE[i].quality, *q, "catalogue slot {} out of order", i);
        }
    }

    #[test]
    fn every_template_contains_root_and_is_sorted() {
        for t in &CATALOGUE {
            assert_eq!(t.intervals[0], 0, "{:?} lacks a root", t.quality);
            assert!(
                t.intervals.windows(2).all(|w| w[0] < w[1] && w[1] < 12),
                "{:?} intervals not strictly ascending within an octave",
                t.quality
            );
        }
    }

    #[test]
    fn catalogue_runs_from_specific_to_general() {
        assert!(CATALOGUE
            .windows(2)
            .all(|w| w[0].intervals.len() >= w[1].intervals.len()));
        assert_eq!(CATALOGUE[0].intervals.len(), 6);
        assert_eq!(CATALOGUE[CATALOGUE.len() - 1].intervals.len(), 2);
    }

    #[test]
    fn names_are_unique() {
        let names = all_quality_names();
        for (i, a) in names.iter().enumerate() {
            assert!(!names[i + 1..].contains(a), "duplicate name {:?}", a);
        }
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(intervals_for_quality("m7"), &[0, 3, 7, 10]);
        assert_eq!(intervals_for_quality(""), &[0, 4, 7]);
        assert!(intervals_for_quality("maj13#5").is_empty());
        assert_eq!(ChordQuality::from_name("7sus4"), Some(ChordQuality::SevenSus4));
        assert_eq!(ChordQuality::from_name("nope"), None);
    }

    #[test]
    fn extension_flag_follows_suffix() {
        assert!(ChordQuality::Dominant7.is_extended());
        assert!(ChordQuality::SixNine.is_extended());
        assert!(ChordQuality::HalfDiminished7.is_extended());
        assert!(!ChordQuality::Eleventh.is_extended());
        assert!(!ChordQuality::Thirteenth.is_extended());
        assert!(!ChordQuality::Major.is_extended());
    }

    #[test]
    fn mask_sets_one_bit_per_interval() {
        assert_eq!(ChordQuality::Major.template().mask(), 0b1001_0001);
        assert_eq!(interval_mask([0, 12]), 1);
    }
}
