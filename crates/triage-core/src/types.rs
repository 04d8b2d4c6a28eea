use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Urgency label assigned to a message or task.
///
/// Always derived from a continuous priority score via configured thresholds
/// (see [`PriorityLabel::from_score`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriorityLabel {
    #[default]
    Low,
    Medium,
    High,
}

impl PriorityLabel {
    /// Map a score to a label: strictly above `high` is High, strictly above
    /// `medium` is Medium, everything else is Low.
    pub fn from_score(score: f64, high: f64, medium: f64) -> Self {
        if score > high {
            PriorityLabel::High
        } else if score > medium {
            PriorityLabel::Medium
        } else {
            PriorityLabel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLabel::Low => "Low",
            PriorityLabel::Medium => "Medium",
            PriorityLabel::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(PriorityLabel::Low),
            "medium" => Some(PriorityLabel::Medium),
            "high" => Some(PriorityLabel::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel a message arrived through.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSource {
    /// Inbound email (body preview).
    Email,
    /// Voicemail transcript.
    Voicemail,
    /// Note submitted from a phone shortcut.
    Shortcut,
    /// Chat message (e.g. Teams).
    Chat,
    /// Entered by hand on the dashboard.
    #[default]
    Manual,
}

/// Lifecycle status of a dashboard task.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

// =============================================================================
// Entities
// =============================================================================

/// A triaged text unit. Owned by the persistence layer; analysis only reads
/// `content` and writes back `priority` and `summary`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: String,
    pub content: String,
    #[serde(default)]
    pub source: MessageSource,
    #[serde(default)]
    pub priority: PriorityLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message with a fresh id, stamped now.
    pub fn new(sender: impl Into<String>, content: impl Into<String>, source: MessageSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: sender.into(),
            content: content.into(),
            source,
            priority: PriorityLabel::default(),
            summary: None,
            created_at: Utc::now(),
        }
    }

    /// Override the creation timestamp (useful when importing history).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// A dashboard task. Referenced by the dependency analyzer, never owned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub facility: String,
    #[serde(default)]
    pub priority: PriorityLabel,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDateTime>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            facility: String::new(),
            priority: PriorityLabel::Medium,
            status: TaskStatus::NotStarted,
            due_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Short, log-safe preview of message content.
pub fn preview(content: &str, max_chars: usize) -> String {
    let mut out: String = content.chars().take(max_chars).collect();
    if content.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}
