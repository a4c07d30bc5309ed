//! Errors raised while assembling settings from files and the environment.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid time zone {value:?}: {reason}")]
    TimeZone { value: String, reason: String },

    #[error("invalid repository {0:?} (expected owner/name)")]
    Repository(String),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid event payload {path}: {source}")]
    Event {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("late-night band {start}..{end} must satisfy start < end <= 24")]
    LateNightBand { start: u32, end: u32 },

    #[error("missing {0}")]
    Missing(&'static str),
}

impl ConfigError {
    pub fn time_zone(value: &str, reason: impl Into<String>) -> Self {
        Self::TimeZone {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
