use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const ENABLED_VAR: &str = "VOICE_LATENCY_ENABLED";
pub const LOG_FORMAT_VAR: &str = "VOICE_LATENCY_LOG_FORMAT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: expected a boolean, got {value:?}")]
    InvalidBool { var: &'static str, value: String },
    #[error("{var}: unknown log format {value:?} (expected \"text\" or \"json\")")]
    InvalidLogFormat { var: &'static str, value: String },
}

/// How `TracingSink` renders events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `[LATENCY] <tag>: <value>ms`
    #[default]
    Text,
    /// The serialized event as a single structured field.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidLogFormat {
                var: LOG_FORMAT_VAR,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    pub enabled: bool,
    pub log_format: LogFormat,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_format: LogFormat::Text,
        }
    }
}

impl RecorderConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENABLED_VAR) {
            config.enabled = parse_bool(&value).ok_or(ConfigError::InvalidBool {
                var: ENABLED_VAR,
                value,
            })?;
        }
        if let Some(value) = lookup(LOG_FORMAT_VAR) {
            config.log_format = value.parse()?;
        }

        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
