//! error.rs — Replay error type
//!
//! Only ingestion and configuration can fail. Once a boat is built, the
//! animation core has no failure paths: out-of-range queries are `None`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("boat '{boat}' has an empty trace")]
    EmptyTrace { boat: String },

    #[error("boat '{boat}' trace is not strictly increasing in time: {prev} then {next}")]
    UnorderedTrace { boat: String, prev: i64, next: i64 },

    #[error("boat '{boat}' sample at {ts} is off the globe: lon={lon} lat={lat}")]
    CoordinateOutOfRange { boat: String, ts: i64, lon: f64, lat: f64 },

    #[error("invalid team id '{id}'")]
    InvalidTeamId { id: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid race start '{value}': {source}")]
    RaceStart {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

pub type Result<T, E = ReplayError> = std::result::Result<T, E>;
