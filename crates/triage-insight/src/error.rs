use thiserror::Error;
use triage_core::TriageError;
use triage_nlp::NlpError;

/// Errors raised inside the analysis components.
///
/// These never reach callers of the public analysis operations, which
/// degrade to safe defaults; they exist so internal steps can use `?`.
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("nlp error: {0}")]
    Nlp(#[from] NlpError),
    #[error("vectorization error: {0}")]
    Vectorization(String),
    #[error("clustering error: {0}")]
    Clustering(String),
    #[error("insufficient data: {0}")]
    InsufficientData(String),
}

impl From<InsightError> for TriageError {
    fn from(err: InsightError) -> Self {
        match err {
            InsightError::Nlp(e) => e.into(),
            other => TriageError::Analysis(other.to_string()),
        }
    }
}
