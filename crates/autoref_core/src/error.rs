use thiserror::Error;

use crate::model::BotId;

/// Rejected configuration. Raised once, at engine construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must not be negative (got {value})")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must be positive (got {value})")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} must be within ({min}, {max}] (got {value})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("history depth must be at least {min} frames (got {found})")]
    HistoryTooShort { found: usize, min: usize },

    #[error("detector registry is empty")]
    NoDetectors,

    #[error("invalid configuration document: {0}")]
    Parse(String),
}

/// Recoverable per-tick failure inside a detector or calculator.
///
/// The engine logs these and treats the detector as silent for the tick.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectorError {
    #[error("bot {0} is no longer tracked")]
    MissingBot(BotId),

    #[error("inconsistent kick data: {0}")]
    InconsistentKick(String),
}

/// Failures while decoding the wire representation.
#[derive(Error, Debug)]
pub enum WireError {
    #[error("unknown team: {0}")]
    UnknownTeam(String),

    #[error("missing field {field} for event {event}")]
    MissingField {
        event: &'static str,
        field: &'static str,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
