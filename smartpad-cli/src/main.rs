mod args;
mod record;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use smartpad_core::config::Config;
use smartpad_core::event_log::{read_note_log, replay, NoteKind, NoteLogWriter, ReplayStep};
use smartpad_core::{HarmonyEngine, PadCommand, SystemClock};
use smartpad_types::chord::CATALOGUE;
use smartpad_types::pitch::midi_to_note_name;
use smartpad_types::{detect_chord, EngineConfig};

use args::Command;

fn init_logging(verbose: bool) {
    use simplelog::{LevelFilter, WriteLogger};

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("smartpad")
        .join("smartpad.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path)
        .or_else(|_| File::create(std::env::temp_dir().join("smartpad.log")))
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("smartpad: logging disabled: {}", e);
            return;
        }
    };

    if let Err(e) = WriteLogger::init(log_level, simplelog::Config::default(), log_file) {
        eprintln!("smartpad: logging disabled: {}", e);
        return;
    }

    log::info!("smartpad starting (log level: {:?})", log_level);
}

fn main() -> ExitCode {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = match args::parse(&raw) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };
    init_logging(args.verbose);

    let config = Config::load();
    let engine_config = config.engine().merged(args.overrides);
    if let Err(e) = engine_config.validate() {
        eprintln!("smartpad: {}", e);
        return ExitCode::FAILURE;
    }

    match args.command {
        Command::Replay(path) => run_replay(Path::new(&path), engine_config, &config),
        Command::Record(path) => run_record(Path::new(&path), engine_config, &config),
        Command::Detect(notes) => {
            println!("{}", detect_chord(&notes, &engine_config.allowed_qualities));
            ExitCode::SUCCESS
        }
        Command::Qualities => {
            for template in &CATALOGUE {
                let name = if template.name.is_empty() { "(major)" } else { template.name };
                println!("{:<10} {:?}", name, template.intervals);
            }
            ExitCode::SUCCESS
        }
    }
}

fn run_replay(path: &Path, engine_config: EngineConfig, config: &Config) -> ExitCode {
    let entries = match read_note_log(path) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("smartpad: {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("replaying {} events from {}", entries.len(), path.display());

    match replay(&entries, engine_config, config.pad()) {
        Ok(steps) => {
            for step in &steps {
                println!("{}", format_step(step));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("smartpad: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_record(path: &Path, engine_config: EngineConfig, config: &Config) -> ExitCode {
    let mut log = match NoteLogWriter::open(path) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("smartpad: {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let clock = SystemClock::new();
    let mut engine = match HarmonyEngine::with_clock(engine_config, clock.clone()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("smartpad: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut pad = config.pad();
    log::info!("recording to {}", path.display());

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    match record::record(stdin.lock(), &mut stdout, &mut engine, &mut pad, &clock, &mut log) {
        Ok(recorded) => {
            log::info!("recorded {} events to {}", recorded, path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("smartpad: {}: {}", path.display(), e);
            ExitCode::FAILURE
        }
    }
}

/// `  1200 ms  on  C4   C         history_cluster  [60, 64, 67]  +67`
fn format_step(step: &ReplayStep) -> String {
    let kind = match step.entry.kind {
        NoteKind::On => "on",
        NoteKind::Off => "off",
    };
    let source = step.state.source.map(|s| s.name()).unwrap_or("-");
    let commands: Vec<String> = step
        .commands
        .iter()
        .map(|c| match c {
            PadCommand::NoteOn { note, .. } => format!("+{}", note),
            PadCommand::NoteOff { note } => format!("-{}", note),
        })
        .collect();
    format!(
        "{:>6} ms  {:<3} {:<4} {:<9} {:<15}  {:?}  {}",
        step.entry.t_ms,
        kind,
        midi_to_note_name(step.entry.note),
        step.state.label(),
        source,
        step.state.notes,
        commands.join(" ")
    )
    .trim_end()
    .to_string()
}
