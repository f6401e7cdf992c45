use std::collections::VecDeque;

use smartpad_types::{NoteEvent, MAX_HISTORY_AGE_MS};

/// Bounded note-on history, oldest first.
#[derive(Debug, Clone)]
pub struct NoteHistory {
    events: VecDeque<NoteEvent>,
    capacity: usize,
}

impl NoteHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append an event. Returns `true` if a phrase gap wiped the old
    /// entries first.
    pub fn push(&mut self, event: NoteEvent) -> bool {
        let gap_reset = self
            .events
            .back()
            .is_some_and(|last| event.timestamp.saturating_sub(last.timestamp) > MAX_HISTORY_AGE_MS);
        if gap_reset {
            self.events.clear();
        }
        self.events.push_back(event);
        self.trim();
        gap_reset
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.trim();
    }

    fn trim(&mut self) {
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn latest(&self) -> Option<&NoteEvent> {
        self.events.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoteEvent> {
        self.events.iter()
    }

    /// The most recent `size` events, oldest first.
    pub fn tail(&self, size: usize) -> impl Iterator<Item = &NoteEvent> {
        self.events.iter().skip(self.events.len().saturating_sub(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(note: u8, timestamp: u64) -> NoteEvent {
        NoteEvent {
            note,
            timestamp,
            velocity: 100,
        }
    }

    fn notes(h: &NoteHistory) -> Vec<u8> {
        h.iter().map(|e| e.note).collect()
    }

    #[test]
    fn drops_oldest_beyond_capacity() {
        let mut h = NoteHistory::new(3);
        for (i, n) in [60, 62, 64, 65].into_iter().enumerate() {
            h.push(ev(n, i as u64 * 10));
        }
        assert_eq!(notes(&h), vec![62, 64, 65]);
    }

    #[test]
    fn long_gap_starts_new_phrase() {
        let mut h = NoteHistory::new(12);
        assert!(!h.push(ev(60, 0)));
        assert!(!h.push(ev(64, 2000)));
        assert!(h.push(ev(67, 4001)));
        assert_eq!(notes(&h), vec![67]);
    }

    #[test]
    fn shrinking_capacity_trims_immediately() {
        let mut h = NoteHistory::new(12);
        for n in 60..70 {
            h.push(ev(n, n as u64));
        }
        h.set_capacity(4);
        assert_eq!(notes(&h), vec![66, 67, 68, 69]);
    }

    #[test]
    fn tail_keeps_chronological_order() {
        let mut h = NoteHistory::new(12);
        for n in [60, 62, 64, 65, 67] {
            h.push(ev(n, 0));
        }
        let last: Vec<u8> = h.tail(3).map(|e| e.note).collect();
        assert_eq!(last, vec![64, 65, 67]);
        assert_eq!(h.tail(10).count(), 5);
        assert_eq!(h.latest().map(|e| e.note), Some(67));
    }
}
