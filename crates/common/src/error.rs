//! Error types for practice-qa shared data

use thiserror::Error;

/// Result type alias using the shared Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading fixtures and configuration
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
