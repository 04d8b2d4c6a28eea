use thiserror::Error;

/// Top-level error type for the triage system.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for TriageError` so that `?` works across crate
/// boundaries. Analysis operations never surface these to callers; only
/// startup (config loading, language model construction) does.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TriageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Language model error: {0}")]
    LanguageModel(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Input too large: {size} chars exceeds {limit} chars")]
    InputTooLarge { size: usize, limit: usize },
}

impl From<toml::de::Error> for TriageError {
    fn from(err: toml::de::Error) -> Self {
        TriageError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for TriageError {
    fn from(err: toml::ser::Error) -> Self {
        TriageError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for TriageError {
    fn from(err: serde_json::Error) -> Self {
        TriageError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for triage operations.
pub type Result<T> = std::result::Result<T, TriageError>;
