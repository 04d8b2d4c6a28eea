use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use triage_core::{Message, PriorityLabel};
use uuid::Uuid;

/// Kind of action proposed for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Task,
    Event,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Event => "event",
        }
    }
}

/// A provisional task or event extracted from message text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCandidate {
    pub kind: ActionKind,
    pub title: String,
    /// Source sentence for tasks; the (truncated) message for events.
    pub description: String,
    /// Always within `[0, 1]`.
    pub confidence: f32,
    /// DATE / TIME mentions as they appear in the text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposed_start: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposed_end: Option<NaiveDateTime>,
}

/// Contribution of each priority signal to the total score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PrioritySignals {
    pub urgent: f64,
    pub deadline: f64,
    pub action: f64,
    pub date: f64,
    pub sentiment: f64,
}

impl PrioritySignals {
    pub fn total(&self) -> f64 {
        self.urgent + self.deadline + self.action + self.date + self.sentiment
    }
}

/// Priority label and score plus the breakdown that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityAssessment {
    pub label: PriorityLabel,
    pub score: f64,
    pub signals: PrioritySignals,
    /// Raw polarity in `[-1, 1]`.
    pub sentiment: f32,
}

impl PriorityAssessment {
    /// The assessment for empty input.
    pub fn empty() -> Self {
        Self {
            label: PriorityLabel::Low,
            score: 0.0,
            signals: PrioritySignals::default(),
            sentiment: 0.0,
        }
    }
}

/// A corpus message ranked against a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarMessage {
    pub message: Message,
    pub score: f64,
}

/// Everything the pipeline derives from one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<Uuid>,
    pub priority: PriorityLabel,
    pub priority_score: f64,
    pub actions: Vec<ActionCandidate>,
    pub similar: Vec<SimilarMessage>,
    pub summary: String,
}

impl AnalysisResult {
    /// Write the derived priority and summary back onto the message.
    pub fn apply_to(&self, message: &mut Message) {
        message.priority = self.priority;
        message.summary = (!self.summary.is_empty()).then(|| self.summary.clone());
    }
}

/// Task id -> ids of the tasks it depends on.
pub type DependencyMap = BTreeMap<Uuid, BTreeSet<Uuid>>;
