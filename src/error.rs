use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompactorError {
    #[error("Source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Failed to fetch source {locator}: {message}")]
    SourceFetch { locator: String, message: String },

    #[error("Failed to parse source {source_name}: {message}")]
    SourceParse { source_name: String, message: String },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CompactorError {
    pub fn fetch(locator: &str, message: impl Into<String>) -> Self {
        CompactorError::SourceFetch {
            locator: locator.to_string(),
            message: message.into(),
        }
    }

    /// True for the source-level failures that abort a run before any output exists.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            CompactorError::SourceNotFound { .. }
                | CompactorError::SourceFetch { .. }
                | CompactorError::SourceParse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CompactorError>;
