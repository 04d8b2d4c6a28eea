use thiserror::Error;
use triage_core::TriageError;

/// Errors from the linguistic preprocessor.
#[derive(Error, Debug)]
pub enum NlpError {
    #[error("language model unavailable: {0}")]
    ModelLoad(String),
    #[error("lexicon error: {0}")]
    Lexicon(String),
    #[error("input too large: {size} chars exceeds {limit}")]
    InputTooLarge { size: usize, limit: usize },
    #[error("encoder error: {0}")]
    Encoder(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<NlpError> for TriageError {
    fn from(err: NlpError) -> Self {
        match err {
            NlpError::InputTooLarge { size, limit } => TriageError::InputTooLarge { size, limit },
            NlpError::Io(e) => TriageError::Io(e),
            other => TriageError::LanguageModel(other.to_string()),
        }
    }
}
