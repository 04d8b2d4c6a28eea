//! Decoding of message and task batches given to the CLI.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use triage_core::{Message, MessageSource, PriorityLabel, Task, TaskStatus, TriageError};
use uuid::Uuid;

/// A JSON document holding one item or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(v) => v,
            Self::One(t) => vec![t],
        }
    }
}

/// Anything from a full stored message down to a bare string.
#[derive(Deserialize)]
#[serde(untagged)]
enum MessageInput {
    Full(Message),
    Partial {
        content: String,
        #[serde(default)]
        id: Option<Uuid>,
        #[serde(default)]
        sender: Option<String>,
        #[serde(default)]
        source: MessageSource,
        #[serde(default)]
        created_at: Option<DateTime<Utc>>,
    },
    Text(String),
}

impl From<MessageInput> for Message {
    fn from(input: MessageInput) -> Self {
        match input {
            MessageInput::Full(m) => m,
            MessageInput::Partial {
                content,
                id,
                sender,
                source,
                created_at,
            } => {
                let mut m = Message::new(sender.unwrap_or_default(), content, source);
                if let Some(id) = id {
                    m.id = id;
                }
                if let Some(at) = created_at {
                    m.created_at = at;
                }
                m
            }
            MessageInput::Text(content) => Message::new("", content, MessageSource::Manual),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TaskInput {
    Full(Task),
    Partial {
        title: String,
        #[serde(default)]
        id: Option<Uuid>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        facility: Option<String>,
        #[serde(default)]
        priority: Option<PriorityLabel>,
        #[serde(default)]
        status: TaskStatus,
    },
}

impl From<TaskInput> for Task {
    fn from(input: TaskInput) -> Self {
        match input {
            TaskInput::Full(t) => t,
            TaskInput::Partial {
                title,
                id,
                description,
                facility,
                priority,
                status,
            } => {
                let mut t = Task::new(title);
                t.id = id.unwrap_or(t.id);
                t.description = description;
                t.facility = facility.unwrap_or_default();
                t.priority = priority.unwrap_or(t.priority);
                t.status = status;
                t
            }
        }
    }
}

/// Messages from JSON (object, string, or array of either). Input that does
/// not look like JSON is taken as the text of a single message.
pub fn parse_messages(raw: &str) -> Result<Vec<Message>, TriageError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if !trimmed.starts_with(['[', '{', '"']) {
        return Ok(vec![Message::new("", trimmed, MessageSource::Manual)]);
    }
    let parsed: OneOrMany<MessageInput> = serde_json::from_str(trimmed)?;
    Ok(parsed.into_vec().into_iter().map(Message::from).collect())
}

/// Tasks from a JSON object or array.
pub fn parse_tasks(raw: &str) -> Result<Vec<Task>, TriageError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let parsed: OneOrMany<TaskInput> = serde_json::from_str(trimmed)?;
    Ok(parsed.into_vec().into_iter().map(Task::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_message() {
        let msgs = parse_messages("Mop the lobby before noon.\n").unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].content, "Mop the lobby before noon.");
        assert_eq!(msgs[0].source, MessageSource::Manual);
    }

    #[test]
    fn test_mixed_array() {
        let raw = r#"[
            "Restock gloves",
            {"content": "Freezer alarm", "sender": "lab@example.com", "source": "voicemail"},
            {
                "id": "9b2f8c1e-7a43-4d5e-9c11-2f3a4b5c6d7e",
                "sender": "desk@example.com",
                "content": "Lobby is wet",
                "created_at": "2026-03-10T12:00:00Z"
            }
        ]"#;
        let msgs = parse_messages(raw).unwrap();
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0].content, "Restock gloves");
        assert_eq!(msgs[1].source, MessageSource::Voicemail);
        assert_eq!(msgs[1].sender, "lab@example.com");
        assert_eq!(
            msgs[2].id.to_string(),
            "9b2f8c1e-7a43-4d5e-9c11-2f3a4b5c6d7e"
        );
        assert_eq!(msgs[2].created_at.to_rfc3339(), "2026-03-10T12:00:00+00:00");
    }

    #[test]
    fn test_single_object() {
        let msgs = parse_messages(r#"{"content": "Call the plumber"}"#).unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].content, "Call the plumber");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            parse_messages(r#"[{"content": 3}]"#),
            Err(TriageError::Serialization(_))
        ));
        assert!(parse_messages("   ").unwrap().is_empty());
    }

    #[test]
    fn test_tasks() {
        let raw = r#"[
            {"title": "Fix the parking lot lights"},
            {"title": "Order ballasts", "description": "Fix the parking lot lights", "facility": "Clinic A"}
        ]"#;
        let tasks = parse_tasks(raw).unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks[0].description.is_none());
        assert_eq!(tasks[1].facility, "Clinic A");
        assert_ne!(tasks[0].id, tasks[1].id);
    }
}
