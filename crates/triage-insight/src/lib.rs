//! Triage Insight crate - message analysis on top of the NLP pipeline.
//!
//! Provides the analysis operations used by the dashboard:
//! - Priority scoring from urgency vocabulary, date mentions and sentiment
//! - Task and event candidate extraction with proposed schedules
//! - TF-IDF similarity search over recent messages
//! - Extractive summarization (TextRank, then k-means over sentence vectors)
//! - Advisory dependency inference between tasks
//!
//! [`Analyzer`] bundles all of them around one shared preprocessor.

pub mod actions;
pub mod analyzer;
pub mod cluster;
pub mod dependency;
pub mod error;
pub mod facility;
pub mod priority;
pub mod schedule;
pub mod similarity;
pub mod summarizer;
pub mod text;
pub mod types;

pub use actions::ActionExtractor;
pub use analyzer::Analyzer;
pub use cluster::{Clustering, KMeans};
pub use dependency::DependencyAnalyzer;
pub use error::InsightError;
pub use facility::FacilityMatcher;
pub use priority::PriorityScorer;
pub use schedule::ScheduleResolver;
pub use similarity::{SimilarityEngine, TfIdfVectorizer};
pub use summarizer::Summarizer;
pub use types::{
    ActionCandidate, ActionKind, AnalysisResult, DependencyMap, PriorityAssessment,
    PrioritySignals, SimilarMessage,
};
