//! Command-line parsing.

use smartpad_types::{EngineConfigUpdate, QualityFilter, LATCH_SUSTAIN_MS};

pub const USAGE: &str = "\
usage: smartpad [--verbose] [--latch] [--sustain MS] [--history N] [--qualities a,b,c] <command>

commands:
  replay <file.jsonl>     run a recorded note log through the engine
  record <file.jsonl>     play `on <note> [vel]` / `off <note>` lines from stdin, logging them
  detect <note>...        name the chord spelled by MIDI note numbers
  qualities               list chord qualities in match priority order";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Replay(String),
    Record(String),
    Detect(Vec<u8>),
    Qualities,
}

#[derive(Debug)]
pub struct Args {
    pub verbose: bool,
    pub overrides: EngineConfigUpdate,
    pub command: Command,
}

pub fn parse(args: &[String]) -> Result<Args, String> {
    let mut verbose = false;
    let mut overrides = EngineConfigUpdate::default();
    let mut rest = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--verbose" | "-v" => verbose = true,
            "--latch" => overrides.sustain_time_ms = Some(LATCH_SUSTAIN_MS),
            "--sustain" => {
                let ms = value(&mut iter, "--sustain")?;
                overrides.sustain_time_ms =
                    Some(ms.parse().map_err(|_| format!("invalid sustain time: {}", ms))?);
            }
            "--history" => {
                let n = value(&mut iter, "--history")?;
                overrides.history_size =
                    Some(n.parse().map_err(|_| format!("invalid history size: {}", n))?);
            }
            "--qualities" => {
                let list = value(&mut iter, "--qualities")?;
                overrides.allowed_qualities = Some(quality_filter(list)?);
            }
            _ => rest.push(arg.as_str()),
        }
    }

    let command = match rest.as_slice() {
        ["replay", path] => Command::Replay(path.to_string()),
        ["record", path] => Command::Record(path.to_string()),
        ["detect", notes @ ..] if !notes.is_empty() => Command::Detect(
            notes
                .iter()
                .map(|n| match n.parse::<u8>() {
                    Ok(v) if v <= 127 => Ok(v),
                    _ => Err(format!("invalid MIDI note: {}", n)),
                })
                .collect::<Result<_, _>>()?,
        ),
        ["qualities"] => Command::Qualities,
        _ => return Err(USAGE.to_string()),
    };

    Ok(Args {
        verbose,
        overrides,
        command,
    })
}

/// `all`, or a comma-separated list of quality names. Unknown names are
/// rejected rather than skipped.
fn quality_filter(list: &str) -> Result<QualityFilter, String> {
    if list.trim() == "all" {
        return Ok(QualityFilter::All);
    }
    let (filter, unknown) = QualityFilter::from_names(list.split(',').map(str::trim));
    if !unknown.is_empty() {
        return Err(format!("unknown chord qualities: {}", unknown.join(", ")));
    }
    if filter.is_empty() {
        return Err("--qualities needs at least one quality".to_string());
    }
    Ok(filter)
}

fn value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<&'a String, String> {
    iter.next().ok_or_else(|| format!("{} needs a value", flag))
}
