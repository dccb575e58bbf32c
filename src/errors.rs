use std::result::Result as StdResult;

use thiserror::Error;

use crate::cadence::RecurrenceFrequency;

/// Caller-configuration failures raised by the computation engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Unsupported frequency for conversion: {0}")]
    UnsupportedFrequency(RecurrenceFrequency),
    #[error("Invalid anchor: {0}")]
    InvalidAnchor(String),
    #[error("Invalid horizon: {0} day(s)")]
    InvalidHorizon(i64),
}

pub type Result<T> = StdResult<T, EngineError>;

/// Failures raised while loading or saving engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err.to_string())
    }
}
