use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExporterError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Source {name} unavailable: {message}")]
    Source { name: String, message: String },
}

impl ExporterError {
    /// Shorthand for a source-level failure (store unreachable, bad fixture file).
    pub fn source(name: impl Into<String>, message: impl Into<String>) -> Self {
        ExporterError::Source {
            name: name.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;
