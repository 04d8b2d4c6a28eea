//! Shared configuration, errors, and domain types for the message triage
//! pipeline.

pub mod config;
pub mod error;
pub mod types;

pub use config::TriageConfig;
pub use error::{Result, TriageError};
pub use types::*;
