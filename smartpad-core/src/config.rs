use std::path::{Path, PathBuf};

use serde::Deserialize;

use smartpad_types::{
    EngineConfig, QualityFilter, DEFAULT_HISTORY_SIZE, DEFAULT_SUSTAIN_TIME_MS, LATCH_SUSTAIN_MS,
    MAX_HISTORY_SIZE, MIN_HISTORY_SIZE,
};

use crate::pad::SmartPad;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    engine: EngineSection,
    #[serde(default)]
    pad: PadSection,
}

#[derive(Deserialize, Default)]
struct EngineSection {
    history_size: Option<usize>,
    sustain_time_ms: Option<u64>,
    latch: Option<bool>,
    allowed_qualities: Option<QualityList>,
}

#[derive(Deserialize, Default)]
struct PadSection {
    octave_shift: Option<i8>,
    fixed_velocity: Option<u8>,
}

/// `"all"`, a single name, or a list of names.
#[derive(Deserialize, Clone)]
#[serde(untagged)]
enum QualityList {
    Keyword(String),
    Names(Vec<String>),
}

/// Embedded defaults overlaid with the user's config file.
pub struct Config {
    engine: EngineSection,
    pad: PadSection,
}

impl Config {
    /// Embedded defaults plus `<config_dir>/smartpad/config.toml` if present.
    pub fn load() -> Self {
        match user_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::embedded(),
        }
    }

    /// Embedded defaults plus the file at `path`. A missing, unreadable or
    /// malformed file is logged and ignored.
    pub fn load_from(path: &Path) -> Self {
        let mut config = Self::embedded();
        if !path.exists() {
            return config;
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                Ok(user) => config.merge(user),
                Err(e) => {
                    log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                }
            },
            Err(e) => {
                log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
            }
        }
        config
    }

    pub fn embedded() -> Self {
        let base: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            log::warn!(target: "config", "embedded config.toml is invalid: {}", e);
            ConfigFile::default()
        });
        Config {
            engine: base.engine,
            pad: base.pad,
        }
    }

    fn merge(&mut self, user: ConfigFile) {
        merge_engine(&mut self.engine, user.engine);
        merge_pad(&mut self.pad, user.pad);
    }

    /// Engine settings, clamped into their valid ranges.
    pub fn engine(&self) -> EngineConfig {
        let requested = self.engine.history_size.unwrap_or(DEFAULT_HISTORY_SIZE);
        let history_size = requested.clamp(MIN_HISTORY_SIZE, MAX_HISTORY_SIZE);
        if history_size != requested {
            log::warn!(target: "config", "history_size {} clamped to {}", requested, history_size);
        }

        let sustain_time_ms = if self.engine.latch.unwrap_or(false) {
            LATCH_SUSTAIN_MS
        } else {
            self.engine.sustain_time_ms.unwrap_or(DEFAULT_SUSTAIN_TIME_MS)
        };

        let allowed_qualities = self
            .engine
            .allowed_qualities
            .as_ref()
            .map(parse_quality_list)
            .unwrap_or_default();

        EngineConfig {
            history_size,
            sustain_time_ms,
            allowed_qualities,
        }
    }

    /// A silent pad voice with the configured transposition and velocity.
    pub fn pad(&self) -> SmartPad {
        SmartPad::new(
            self.pad.octave_shift.unwrap_or(0).clamp(-4, 4),
            self.pad.fixed_velocity.map(|v| v.min(127)),
        )
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("smartpad").join("config.toml"))
}

fn merge_engine(base: &mut EngineSection, user: EngineSection) {
    if user.history_size.is_some() {
        base.history_size = user.history_size;
    }
    if user.sustain_time_ms.is_some() {
        base.sustain_time_ms = user.sustain_time_ms;
    }
    if user.latch.is_some() {
        base.latch = user.latch;
    }
    if user.allowed_qualities.is_some() {
        base.allowed_qualities = user.allowed_qualities;
    }
}

fn merge_pad(base: &mut PadSection, user: PadSection) {
    if user.octave_shift.is_some() {
        base.octave_shift = user.octave_shift;
    }
    if user.fixed_velocity.is_some() {
        base.fixed_velocity = user.fixed_velocity;
    }
}

fn parse_quality_list(list: &QualityList) -> QualityFilter {
    let names: Vec<&str> = match list {
        QualityList::Keyword(k) if k.eq_ignore_ascii_case("all") => return QualityFilter::All,
        QualityList::Keyword(k) => vec![k.as_str()],
        QualityList::Names(names) => names.iter().map(String::as_str).collect(),
    };
    parse_quality_names(&names)
}

/// Build a filter from quality names, skipping unknown ones. Falls back to
/// all qualities when nothing usable remains.
fn parse_quality_names(names: &[&str]) -> QualityFilter {
    let (filter, unknown) = QualityFilter::from_names(names.iter().copied());
    for name in unknown {
        log::warn!(target: "config", "unknown chord quality {:?} ignored", name);
    }
    if filter.is_empty() {
        log::warn!(target: "config", "no usable chord qualities, allowing all");
        return QualityFilter::All;
    }
    filter
}
