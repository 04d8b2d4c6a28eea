//! The long-lived analysis context.
//!
//! Built once at startup; owns the loaded preprocessor (and its cache) and
//! every analysis component. All operations take `&self` and are safe to call
//! from many threads at once.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};
use triage_core::{Message, PriorityLabel, Task, TriageConfig};
use triage_nlp::Preprocessor;

use crate::actions::ActionExtractor;
use crate::dependency::DependencyAnalyzer;
use crate::facility::FacilityMatcher;
use crate::priority::PriorityScorer;
use crate::similarity::SimilarityEngine;
use crate::summarizer::Summarizer;
use crate::types::{ActionCandidate, AnalysisResult, DependencyMap, PriorityAssessment, SimilarMessage};

pub struct Analyzer {
    config: TriageConfig,
    pre: Arc<Preprocessor>,
    priority: PriorityScorer,
    actions: ActionExtractor,
    similarity: SimilarityEngine,
    summarizer: Summarizer,
    dependencies: DependencyAnalyzer,
}

impl Analyzer {
    /// Validate `config` and load the language pipeline. Both failures are
    /// fatal; nothing after construction returns an error.
    pub fn new(config: TriageConfig) -> triage_core::Result<Self> {
        config.validate()?;
        let pre = Arc::new(Preprocessor::load(&config.nlp)?);
        info!(
            encoder = ?config.nlp.encoder,
            dimensions = pre.dimensions(),
            cache_capacity = config.nlp.cache_capacity,
            "Analyzer ready"
        );
        Ok(Self::with_preprocessor(config, pre))
    }

    /// Assemble the components around an already loaded preprocessor.
    pub fn with_preprocessor(config: TriageConfig, pre: Arc<Preprocessor>) -> Self {
        Self {
            priority: PriorityScorer::new(pre.clone(), config.priority.clone()),
            actions: ActionExtractor::new(
                pre.clone(),
                config.actions.clone(),
                FacilityMatcher::from_config(&config.facilities),
            ),
            similarity: SimilarityEngine::new(config.similarity.clone()),
            summarizer: Summarizer::new(pre.clone(), config.summarization.clone()),
            dependencies: DependencyAnalyzer::new(pre.clone(), config.task_dependencies.clone()),
            pre,
            config,
        }
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    pub fn preprocessor(&self) -> &Arc<Preprocessor> {
        &self.pre
    }

    pub fn score_priority(&self, content: &str) -> (PriorityLabel, f64) {
        self.priority.score(content)
    }

    /// Priority with the per-signal breakdown; falls back like
    /// [`Analyzer::score_priority`].
    pub fn assess_priority(&self, content: &str) -> PriorityAssessment {
        self.priority.assess(content).unwrap_or_else(|e| {
            warn!(error = %e, content_len = content.len(), "Priority assessment failed");
            let (label, score) = crate::priority::FALLBACK;
            PriorityAssessment {
                label,
                score,
                ..PriorityAssessment::empty()
            }
        })
    }

    pub fn extract_actions(&self, content: &str) -> Vec<ActionCandidate> {
        self.actions.extract(content)
    }

    pub fn extract_actions_at(&self, content: &str, now: NaiveDateTime) -> Vec<ActionCandidate> {
        self.actions.extract_at(content, now)
    }

    pub fn find_similar(&self, content: &str, corpus: &[Message], limit: usize) -> Vec<SimilarMessage> {
        self.similarity.find_similar(content, corpus, limit)
    }

    /// Like [`Analyzer::find_similar`] but never returns `message` itself.
    pub fn find_similar_to(&self, message: &Message, corpus: &[Message], limit: usize) -> Vec<SimilarMessage> {
        let others: Vec<Message> = corpus
            .iter()
            .filter(|m| m.id != message.id)
            .cloned()
            .collect();
        self.similarity.find_similar(&message.content, &others, limit)
    }

    pub fn summarize(&self, content: &str) -> String {
        self.summarizer.summarize(content)
    }

    pub fn analyze_dependencies(&self, tasks: &[Task]) -> DependencyMap {
        self.dependencies.analyze(tasks)
    }

    /// Priority, actions, summary and similar messages for one message.
    pub fn analyze(&self, message: &Message, corpus: &[Message]) -> AnalysisResult {
        self.analyze_at(message, corpus, Local::now().naive_local())
    }

    pub fn analyze_at(&self, message: &Message, corpus: &[Message], now: NaiveDateTime) -> AnalysisResult {
        let content = message.content.as_str();
        let (priority, priority_score) = self.score_priority(content);
        let result = AnalysisResult {
            message_id: Some(message.id),
            priority,
            priority_score,
            actions: self.extract_actions_at(content, now),
            similar: self.find_similar_to(message, corpus, self.config.similarity.default_limit),
            summary: self.summarize(content),
        };
        debug!(
            message_id = %message.id,
            priority = result.priority.as_str(),
            actions = result.actions.len(),
            similar = result.similar.len(),
            "Message analyzed"
        );
        result
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("preprocessor", &self.pre)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::config::EncoderKind;
    use triage_core::{MessageSource, TriageError};

    #[test]
    fn test_invalid_config_is_fatal() {
        let mut config = TriageConfig::default();
        config.priority.medium_threshold = 0.9;
        assert!(matches!(Analyzer::new(config), Err(TriageError::Config(_))));
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let mut config = TriageConfig::default();
        config.nlp.encoder = EncoderKind::Onnx;
        config.nlp.model_dir = Some("/nonexistent/model".into());
        assert!(Analyzer::new(config).is_err());
    }

    #[test]
    fn test_analyze_excludes_self_and_writes_back() {
        let analyzer = Analyzer::new(TriageConfig::default()).unwrap();
        let mut msg = Message::new(
            "nurse@example.com",
            "URGENT: need coverage at Clinic A by tomorrow 3pm",
            MessageSource::Email,
        );
        let dup = Message::new(
            "lead@example.com",
            "URGENT: need coverage at Clinic A by tomorrow 3pm",
            MessageSource::Voicemail,
        );
        let corpus = vec![msg.clone(), dup.clone()];

        let result = analyzer.analyze(&msg, &corpus);
        assert_eq!(result.message_id, Some(msg.id));
        assert_eq!(result.priority, PriorityLabel::High);
        assert_eq!(result.similar.len(), 1);
        assert_eq!(result.similar[0].message.id, dup.id);
        assert_eq!(result.summary, msg.content);

        result.apply_to(&mut msg);
        assert_eq!(msg.priority, PriorityLabel::High);
        assert_eq!(msg.summary.as_deref(), Some(msg.content.as_str()));
    }

    #[test]
    fn test_assess_priority_falls_back() {
        let mut config = TriageConfig::default();
        config.nlp.max_input_chars = 4;
        let analyzer = Analyzer::new(config).unwrap();
        let a = analyzer.assess_priority("far too long");
        assert_eq!(a.label, PriorityLabel::Medium);
        assert_eq!(a.score, 0.5);
    }
}
