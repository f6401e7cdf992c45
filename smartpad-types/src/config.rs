//! Harmony engine configuration and its validation boundary.

use std::fmt;

use crate::chord::QualityFilter;

/// Note-on events retained by default.
pub const DEFAULT_HISTORY_SIZE: usize = 12;
pub const MIN_HISTORY_SIZE: usize = 3;
pub const MAX_HISTORY_SIZE: usize = 24;

/// A gap longer than this between consecutive note-ons starts a new phrase
/// and discards the history.
pub const MAX_HISTORY_AGE_MS: u64 = 2000;

/// How long the last chord is held once nothing matches.
pub const DEFAULT_SUSTAIN_TIME_MS: u64 = 10_000;

/// Sustain time that never runs out (latch mode).
pub const LATCH_SUSTAIN_MS: u64 = u64::MAX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub history_size: usize,
    pub sustain_time_ms: u64,
    pub allowed_qualities: QualityFilter,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_HISTORY_SIZE,
            sustain_time_ms: DEFAULT_SUSTAIN_TIME_MS,
            allowed_qualities: QualityFilter::All,
        }
    }
}

impl EngineConfig {
    pub fn is_latched(&self) -> bool {
        self.sustain_time_ms == LATCH_SUSTAIN_MS
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_HISTORY_SIZE..=MAX_HISTORY_SIZE).contains(&self.history_size) {
            return Err(ConfigError::HistorySizeOutOfRange(self.history_size));
        }
        if self.allowed_qualities.is_empty() {
            return Err(ConfigError::EmptyQualityFilter);
        }
        Ok(())
    }

    /// A copy with every field present in `update` replaced.
    pub fn merged(&self, update: EngineConfigUpdate) -> EngineConfig {
        EngineConfig {
            history_size: update.history_size.unwrap_or(self.history_size),
            sustain_time_ms: update.sustain_time_ms.unwrap_or(self.sustain_time_ms),
            allowed_qualities: update
                .allowed_qualities
                .unwrap_or_else(|| self.allowed_qualities.clone()),
        }
    }
}

/// Partial configuration change; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfigUpdate {
    pub history_size: Option<usize>,
    pub sustain_time_ms: Option<u64>,
    pub allowed_qualities: Option<QualityFilter>,
}

impl EngineConfigUpdate {
    pub fn history_size(mut self, size: usize) -> Self {
        self.history_size = Some(size);
        self
    }

    pub fn sustain_time_ms(mut self, ms: u64) -> Self {
        self.sustain_time_ms = Some(ms);
        self
    }

    /// Latch on: sustain forever. Latch off: back to the default sustain.
    pub fn latch(self, on: bool) -> Self {
        self.sustain_time_ms(if on { LATCH_SUSTAIN_MS } else { DEFAULT_SUSTAIN_TIME_MS })
    }

    pub fn allowed_qualities(mut self, filter: QualityFilter) -> Self {
        self.allowed_qualities = Some(filter);
        self
    }
}

/// Rejected configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    HistorySizeOutOfRange(usize),
    EmptyQualityFilter,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HistorySizeOutOfRange(n) => write!(
                f,
                "history size {} outside {}..={}",
                n, MIN_HISTORY_SIZE, MAX_HISTORY_SIZE
            ),
            Self::EmptyQualityFilter => write!(f, "allowed qualities must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}
