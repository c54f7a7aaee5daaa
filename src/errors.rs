// src/errors.rs

//! Crate-wide error type and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatterError {
    #[error("Collection error: {0}")]
    CollectionError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Unknown formation: {0}")]
    UnknownFormation(String),

    #[error("Unknown family: {0}")]
    UnknownFamily(String),

    #[error("Unknown call: {0}")]
    UnknownCall(String),

    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PatterError>;
