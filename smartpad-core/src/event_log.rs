//! Append-only JSONL note logs for debugging and replay.
//!
//! One JSON object per line:
//! `{"t_ms":1200,"kind":"on","note":60,"velocity":96}`.
//! A recorded performance can be fed back through a fresh engine with
//! [`replay`] to see exactly which chords it produces.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use smartpad_types::{ConfigError, EngineConfig, HarmonicState};

use crate::clock::{Clock, ManualClock};
use crate::engine::HarmonyEngine;
use crate::pad::{PadCommand, SmartPad};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteLogEntry {
    pub t_ms: u64,
    pub kind: NoteKind,
    pub note: u8,
    #[serde(default)]
    pub velocity: u8,
}

impl NoteLogEntry {
    pub fn on(t_ms: u64, note: u8, velocity: u8) -> Self {
        Self {
            t_ms,
            kind: NoteKind::On,
            note,
            velocity,
        }
    }

    pub fn off(t_ms: u64, note: u8) -> Self {
        Self {
            t_ms,
            kind: NoteKind::Off,
            note,
            velocity: 0,
        }
    }
}

/// Error type for note log IO.
#[derive(Debug)]
pub enum EventLogError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<std::io::Error> for EventLogError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for EventLogError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl std::fmt::Display for EventLogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for EventLogError {}

/// Append-only JSONL writer.
pub struct NoteLogWriter {
    writer: BufWriter<File>,
}

impl NoteLogWriter {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> Result<Self, EventLogError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    pub fn write(&mut self, entry: &NoteLogEntry) -> Result<(), EventLogError> {
        let json = serde_json::to_string(entry)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Read every entry of a note log. Blank and unparseable lines are skipped.
pub fn read_note_log(path: &Path) -> Result<Vec<NoteLogEntry>, EventLogError> {
    let file = File::open(path)?;
    let mut entries = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<NoteLogEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                log::warn!(target: "replay", "{}:{}: skipped: {}", path.display(), lineno + 1, e)
            }
        }
    }
    Ok(entries)
}

/// One replayed event with what the engine and the pad made of it.
#[derive(Debug, Clone)]
pub struct ReplayStep {
    pub entry: NoteLogEntry,
    pub state: HarmonicState,
    pub commands: Vec<PadCommand>,
}

/// Drive a fresh engine through `entries`, querying it after every event
/// the same way a live front end does.
pub fn replay(
    entries: &[NoteLogEntry],
    config: EngineConfig,
    mut pad: SmartPad,
) -> Result<Vec<ReplayStep>, ConfigError> {
    let clock = ManualClock::new(entries.first().map(|e| e.t_ms).unwrap_or(0));
    let mut engine = HarmonyEngine::with_clock(config, clock.clone())?;

    let mut now = 0;
    let mut steps = Vec::with_capacity(entries.len());
    for entry in entries {
        // logs from other tools may be slightly out of order
        now = now.max(entry.t_ms);
        clock.set(now);
        steps.push(apply_entry(&mut engine, &mut pad, *entry));
    }
    Ok(steps)
}

/// Feed one event to the engine, query it and update the pad. The engine
/// clock is expected to read `entry.t_ms` already.
pub fn apply_entry<C: Clock>(
    engine: &mut HarmonyEngine<C>,
    pad: &mut SmartPad,
    entry: NoteLogEntry,
) -> ReplayStep {
    let velocity = match entry.kind {
        NoteKind::On => {
            engine.note_on(entry.note, entry.velocity);
            entry.velocity
        }
        NoteKind::Off => {
            engine.note_off(entry.note);
            0
        }
    };
    let state = engine.get_harmonic_state();
    let commands = pad.apply(&state, velocity);
    ReplayStep {
        entry,
        state,
        commands,
    }
}
