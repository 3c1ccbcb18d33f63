//! Error types for the character creator

use thiserror::Error;

/// Main error type for the character creator
#[derive(Error, Debug)]
pub enum CreatorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Script error: {0}")]
    Script(#[from] ScriptError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Errors raised while building a headless scene from configuration.
///
/// The customization and rotation operations themselves never fail.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Unknown mesh: {0}")]
    UnknownMesh(String),

    #[error("Duplicate name: {0}")]
    DuplicateName(String),
}

/// Input script errors
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read script file: {0}")]
    ReadFile(String),

    #[error("Failed to parse script: {0}")]
    Parse(String),

    #[error("Invalid event #{index}: {message}")]
    InvalidEvent { index: usize, message: String },
}

/// Result type alias for character creator operations
pub type Result<T> = std::result::Result<T, CreatorError>;
