//! Error types for the planner_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for planner_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML plan document error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP transport error talking to the workout service
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed notation that cannot be skipped (bad `mm:ss`, bad repeat count, bad plan shape)
    #[error("Format error: {0}")]
    Format(String),

    /// `@EQUIP(...)` named something we do not know
    #[error("EQUIP selected but not a valid option: {0}")]
    InvalidEquipment(String),

    /// A workout failed to compile
    #[error("Workout '{name}' failed to compile: {source}")]
    Workout {
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote workout service rejected a request
    #[error("Service error: {0}")]
    Service(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Attach the workout name to a compile failure
    pub fn in_workout(self, name: &str) -> Self {
        Error::Workout {
            name: name.to_string(),
            source: Box::new(self),
        }
    }
}
