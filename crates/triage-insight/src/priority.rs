//! Weighted multi-signal priority scoring.

use std::sync::Arc;

use tracing::warn;
use triage_core::config::PriorityConfig;
use triage_core::{preview, PriorityLabel};
use triage_nlp::{EntityLabel, Preprocessor, SentimentEstimator};

use crate::error::InsightError;
use crate::types::{PriorityAssessment, PrioritySignals};

pub const URGENT_TERMS: &[&str] = &[
    "urgent", "asap", "emergency", "immediate", "critical", "important", "priority",
];
pub const DEADLINE_TERMS: &[&str] = &[
    "deadline", "due", "by", "before", "tomorrow", "today", "tonight",
];
pub const ACTION_TERMS: &[&str] = &["need", "must", "required", "necessary", "mandatory"];

/// Returned when scoring itself fails.
pub const FALLBACK: (PriorityLabel, f64) = (PriorityLabel::Medium, 0.5);

/// Classifies message urgency from vocabulary, date mentions and sentiment.
pub struct PriorityScorer {
    pre: Arc<Preprocessor>,
    config: PriorityConfig,
    sentiment: SentimentEstimator,
}

impl PriorityScorer {
    pub fn new(pre: Arc<Preprocessor>, config: PriorityConfig) -> Self {
        Self {
            pre,
            config,
            sentiment: SentimentEstimator::new(),
        }
    }

    /// Label and score. Never fails: empty content is `(Low, 0.0)` and any
    /// internal error degrades to `(Medium, 0.5)`.
    pub fn score(&self, content: &str) -> (PriorityLabel, f64) {
        match self.assess(content) {
            Ok(a) => (a.label, a.score),
            Err(e) => {
                warn!(
                    error = %e,
                    content_len = content.len(),
                    content = %preview(content, 60),
                    "Priority analysis failed, using default"
                );
                FALLBACK
            }
        }
    }

    /// Full assessment with the per-signal breakdown.
    pub fn assess(&self, content: &str) -> Result<PriorityAssessment, InsightError> {
        if content.trim().is_empty() {
            return Ok(PriorityAssessment::empty());
        }

        let doc = self.pre.process(content)?;
        let polarity = self.sentiment.polarity(&doc.tokens);
        let has_term = |terms: &[&str]| doc.tokens.iter().any(|t| terms.contains(&t.lower.as_str()));
        let weight_if = |present: bool, weight: f64| if present { weight } else { 0.0 };

        let c = &self.config;
        let signals = PrioritySignals {
            urgent: weight_if(has_term(URGENT_TERMS), c.urgent_terms_weight),
            deadline: weight_if(has_term(DEADLINE_TERMS), c.deadline_terms_weight),
            action: weight_if(has_term(ACTION_TERMS), c.action_terms_weight),
            date: weight_if(
                doc.has_entity(&[EntityLabel::Date, EntityLabel::Time]),
                c.date_weight,
            ),
            sentiment: if polarity < 0.0 {
                c.sentiment_weight * f64::from(polarity.abs())
            } else {
                0.0
            },
        };

        let score = signals.total();
        Ok(PriorityAssessment {
            label: PriorityLabel::from_score(score, c.high_threshold, c.medium_threshold),
            score,
            signals,
            sentiment: polarity,
        })
    }
}
