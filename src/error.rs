//! Error types for plume operations.
//!
//! Content operations exposed to a host (normalization, marking, editing
//! intents) degrade silently and never return these. They surface only from
//! I/O, configuration and dictionary sources.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while loading resources or configuration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Dictionary unavailable: {0}")]
    Unavailable(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
