//! `smartpad record`: a live session driven by text note events.
//!
//! Each input line is `on <note> [velocity]` or `off <note>`; blank lines and
//! `#` comments are ignored. Events are stamped with the engine clock,
//! appended to a note log and echoed with the resulting chord, so the take
//! can be fed to `smartpad replay` later.

use std::io::{BufRead, Write};

use smartpad_core::event_log::{apply_entry, EventLogError, NoteLogEntry, NoteLogWriter};
use smartpad_core::{Clock, HarmonyEngine, SmartPad};

use crate::format_step;

const DEFAULT_VELOCITY: u8 = 100;

/// Parse one input line into an entry stamped `t_ms`. `Ok(None)` for lines
/// that carry no event.
pub fn parse_event(line: &str, t_ms: u64) -> Result<Option<NoteLogEntry>, String> {
    let mut words = line.split_whitespace();
    let Some(kind) = words.next() else {
        return Ok(None);
    };
    if kind.starts_with('#') {
        return Ok(None);
    }

    let note = words
        .next()
        .ok_or_else(|| format!("{} needs a note", kind))
        .and_then(midi_value)?;
    let entry = match kind {
        "on" => {
            let velocity = words
                .next()
                .map(midi_value)
                .transpose()?
                .unwrap_or(DEFAULT_VELOCITY);
            NoteLogEntry::on(t_ms, note, velocity)
        }
        "off" => NoteLogEntry::off(t_ms, note),
        other => return Err(format!("unknown event {:?}", other)),
    };
    if let Some(extra) = words.next() {
        return Err(format!("unexpected {:?}", extra));
    }
    Ok(Some(entry))
}

fn midi_value(s: &str) -> Result<u8, String> {
    match s.parse::<u8>() {
        Ok(v) if v <= 127 => Ok(v),
        _ => Err(format!("invalid MIDI value: {}", s)),
    }
}

/// Run a session until `input` ends. Bad lines are reported on `out` and
/// skipped. Returns the number of events recorded.
pub fn record<C: Clock>(
    input: impl BufRead,
    out: &mut impl Write,
    engine: &mut HarmonyEngine<C>,
    pad: &mut SmartPad,
    clock: &C,
    log: &mut NoteLogWriter,
) -> Result<usize, EventLogError> {
    let mut recorded = 0;
    for line in input.lines() {
        let line = line?;
        let entry = match parse_event(&line, clock.now_ms()) {
            Ok(Some(entry)) => entry,
            Ok(None) => continue,
            Err(e) => {
                log::warn!(target: "record", "skipped {:?}: {}", line, e);
                writeln!(out, "? {}", e)?;
                continue;
            }
        };

        log.write(&entry)?;
        let step = apply_entry(engine, pad, entry);
        writeln!(out, "{}", format_step(&step))?;
        recorded += 1;
    }
    Ok(recorded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartpad_core::event_log::{read_note_log, NoteKind};
    use smartpad_core::ManualClock;
    use smartpad_types::EngineConfig;
    use std::io::Cursor;

    #[test]
    fn parses_note_events() {
        assert_eq!(
            parse_event("on 60 90", 5).unwrap(),
            Some(NoteLogEntry::on(5, 60, 90))
        );
        assert_eq!(
            parse_event("on 60", 5).unwrap(),
            Some(NoteLogEntry::on(5, 60, DEFAULT_VELOCITY))
        );
        assert_eq!(parse_event("  off 60 ", 7).unwrap(), Some(NoteLogEntry::off(7, 60)));
        assert_eq!(parse_event("", 0).unwrap(), None);
        assert_eq!(parse_event("# warm-up", 0).unwrap(), None);
    }

    #[test]
    fn rejects_malformed_events() {
        assert!(parse_event("on", 0).is_err());
        assert!(parse_event("on 128", 0).is_err());
        assert!(parse_event("on 60 200", 0).is_err());
        assert!(parse_event("hold 60", 0).is_err());
        assert!(parse_event("off 60 64", 0).is_err());
    }

    #[test]
    fn session_is_logged_and_echoed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.jsonl");
        let mut log = NoteLogWriter::open(&path).unwrap();

        let clock = ManualClock::new(0);
        let mut engine = HarmonyEngine::with_clock(EngineConfig::default(), clock.clone()).unwrap();
        let mut pad = SmartPad::default();
        let input = Cursor::new("on 60\non 64 90\nbogus 1\non 67\n\noff 60\n");
        let mut out = Vec::new();

        let recorded = record(input, &mut out, &mut engine, &mut pad, &clock, &mut log).unwrap();
        assert_eq!(recorded, 4);

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[2].starts_with('?'), "{:?}", lines[2]);
        assert!(lines[3].contains("history_cluster"), "{:?}", lines[3]);
        assert!(lines[3].ends_with("+60 +64 +67"), "{:?}", lines[3]);

        let entries = read_note_log(&path).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[1], NoteLogEntry::on(0, 64, 90));
        assert_eq!(entries[3].kind, NoteKind::Off);
    }
}
