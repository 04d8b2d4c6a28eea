//! Extraction of task and event candidates from message text.

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDateTime};
use regex::Regex;
use tracing::{debug, warn};
use triage_core::config::ActionConfig;
use triage_core::preview;
use triage_nlp::{DepLabel, Doc, PartOfSpeech, Preprocessor, Tag};

use crate::error::InsightError;
use crate::facility::FacilityMatcher;
use crate::schedule::ScheduleResolver;
use crate::text::{clip, title_case};
use crate::types::{ActionCandidate, ActionKind};

const BASE_FORM_CONFIDENCE: f32 = 0.8;
const OTHER_FORM_CONFIDENCE: f32 = 0.6;
const OBJECT_BONUS: f32 = 0.1;
const DATE_BONUS: f32 = 0.1;
const TITLE_CHARS: usize = 100;
const EVENT_DESCRIPTION_CHARS: usize = 200;

/// Finds actionable sentences (verb-rooted) and, when the message talks
/// about a schedulable event, proposes one calendar event for it.
pub struct ActionExtractor {
    pre: Arc<Preprocessor>,
    config: ActionConfig,
    facilities: FacilityMatcher,
    schedule: ScheduleResolver,
    event_indicator: Regex,
    event_phrase: Regex,
    clause_end: Regex,
}

impl ActionExtractor {
    pub fn new(pre: Arc<Preprocessor>, config: ActionConfig, facilities: FacilityMatcher) -> Self {
        Self {
            schedule: ScheduleResolver::new(config.default_start_hour),
            pre,
            config,
            facilities,
            event_indicator: Regex::new(
                r"(?i)\b(meeting|appointment|audit|inspection|training|conference|call|visit|deadline|due|reminder)s?\b",
            )
            .expect("Invalid event indicator regex"),
            event_phrase: Regex::new(
                r"(?i)\b(meeting|appointment|audit|inspection|training|conference).{0,50}",
            )
            .expect("Invalid event phrase regex"),
            clause_end: Regex::new(r"[.!?;\n]").expect("Invalid clause regex"),
        }
    }

    /// Candidates scheduled relative to the local wall clock.
    pub fn extract(&self, content: &str) -> Vec<ActionCandidate> {
        self.extract_at(content, Local::now().naive_local())
    }

    /// Candidates with date mentions resolved against `now`. Never fails:
    /// errors are logged and produce an empty list.
    pub fn extract_at(&self, content: &str, now: NaiveDateTime) -> Vec<ActionCandidate> {
        match self.try_extract(content, now) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(
                    error = %e,
                    content_len = content.len(),
                    content = %preview(content, 60),
                    "Action extraction failed"
                );
                Vec::new()
            }
        }
    }

    pub fn try_extract(
        &self,
        content: &str,
        now: NaiveDateTime,
    ) -> Result<Vec<ActionCandidate>, InsightError> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let doc = self.pre.process(content)?;
        let mut candidates: Vec<ActionCandidate> = (0..doc.sentences.len())
            .filter_map(|i| self.task_for_sentence(&doc, i, now))
            .collect();

        if let Some(event) = self.propose_event(&doc, now) {
            candidates.push(event);
        }

        debug!(count = candidates.len(), "Extracted action candidates");
        Ok(candidates)
    }

    fn task_for_sentence(&self, doc: &Doc, index: usize, now: NaiveDateTime) -> Option<ActionCandidate> {
        let root = doc.sentences[index].root?;
        let verb = &doc.tokens[root];
        if verb.pos != PartOfSpeech::Verb {
            return None;
        }

        let mut confidence = if verb.tag == Tag::Vb {
            BASE_FORM_CONFIDENCE
        } else {
            OTHER_FORM_CONFIDENCE
        };
        let has_object = doc
            .children(root)
            .any(|c| matches!(doc.tokens[c].dep, DepLabel::Dobj | DepLabel::Pobj));
        if has_object {
            confidence += OBJECT_BONUS;
        }
        confidence = confidence.min(1.0);

        let dates: Vec<String> = doc.sentence_entities(index).map(|e| e.text.clone()).collect();
        if !dates.is_empty() {
            confidence = (confidence + DATE_BONUS).min(1.0);
        }

        let sentence = doc.sentence_text(index);
        Some(ActionCandidate {
            kind: ActionKind::Task,
            title: clip(sentence, TITLE_CHARS),
            description: sentence.to_string(),
            confidence,
            proposed_start: self.schedule.resolve(&dates, now),
            proposed_end: None,
            facility: self.facilities.infer(sentence, &doc.text),
            dates,
        })
    }

    /// One event per message: needs an indicator word and a date/time that
    /// resolves to a concrete start.
    fn propose_event(&self, doc: &Doc, now: NaiveDateTime) -> Option<ActionCandidate> {
        let content = doc.text.as_str();
        if !self.event_indicator.is_match(content) {
            return None;
        }

        let dates: Vec<String> = doc.entities.iter().map(|e| e.text.clone()).collect();
        let start = self.schedule.resolve(&dates, now)?;
        let end = start + Duration::minutes(self.config.event_duration_minutes);

        Some(ActionCandidate {
            kind: ActionKind::Event,
            title: self.event_title(content),
            description: clip(content.trim(), EVENT_DESCRIPTION_CHARS),
            confidence: self.config.event_confidence.clamp(0.0, 1.0),
            dates,
            facility: self.facilities.infer(content, content),
            proposed_start: Some(start),
            proposed_end: Some(end),
        })
    }

    fn event_title(&self, content: &str) -> String {
        if let Some(m) = self.event_phrase.find(content) {
            let phrase = m
                .as_str()
                .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '.' | '!' | '?' | ',' | ';'));
            return title_case(phrase);
        }
        let first_clause = self
            .clause_end
            .split(content.trim())
            .find(|c| !c.trim().is_empty())
            .unwrap_or("")
            .trim();
        clip(first_clause, TITLE_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use triage_core::config::{FacilityConfig, NlpConfig};

    fn extractor() -> ActionExtractor {
        let pre = Arc::new(Preprocessor::load(&NlpConfig::default()).unwrap());
        let facilities = FacilityMatcher::from_config(&FacilityConfig {
            names: vec!["Clinic A".into(), "Clinic B".into()],
            ..Default::default()
        });
        ActionExtractor::new(pre, ActionConfig::default(), facilities)
    }

    /// Wednesday, 2026-03-11 10:30.
    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 11)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn tasks(c: &[ActionCandidate]) -> Vec<&ActionCandidate> {
        c.iter().filter(|a| a.kind == ActionKind::Task).collect()
    }

    #[test]
    fn test_empty_content() {
        let x = extractor();
        assert!(x.extract("").is_empty());
        assert!(x.extract("  \n ").is_empty());
    }

    #[test]
    fn test_imperative_with_object_and_time() {
        let out = extractor().extract_at("Please clean the lobby floor before noon.", now());
        let tasks = tasks(&out);
        assert_eq!(tasks.len(), 1);
        let t = tasks[0];
        assert_eq!(t.description, "Please clean the lobby floor before noon.");
        assert_eq!(t.dates, vec!["noon".to_string()]);
        // 0.8 base + 0.1 object + 0.1 date, clamped
        assert!((t.confidence - 1.0).abs() < 1e-6);
        assert!(t.confidence <= 1.0);
        assert_eq!(
            t.proposed_start,
            NaiveDate::from_ymd_opt(2026, 3, 11).unwrap().and_hms_opt(12, 0, 0)
        );
        assert!(out.iter().all(|a| a.kind == ActionKind::Task));
    }

    #[test]
    fn test_finite_verb_gets_lower_base() {
        let out = extractor().extract_at("The staff needs more gloves.", now());
        assert_eq!(out.len(), 1);
        assert!((out[0].confidence - 0.7).abs() < 1e-6);
        assert!(out[0].dates.is_empty());
        assert!(out[0].proposed_start.is_none());
    }

    #[test]
    fn test_non_verb_roots_are_skipped() {
        let x = extractor();
        assert!(x.extract_at("Leak in the basement.", now()).is_empty());
        assert!(x.extract_at("The floor is wet.", now()).is_empty());
    }

    #[test]
    fn test_imperatives_after_adverbs_and_noun_verbs() {
        let x = extractor();
        for text in [
            "Kindly restock the gloves in room 4",
            "Kindly clean the lobby.",
            "Water the plants.",
            "Remember to lock the doors tonight.",
        ] {
            let out = x.extract_at(text, now());
            let tasks = tasks(&out);
            assert_eq!(tasks.len(), 1, "{text}");
            assert_eq!(tasks[0].description, text);
            assert!(tasks[0].confidence >= 0.8 - 1e-6, "{text}");
        }
    }

    #[test]
    fn test_one_task_per_verb_sentence() {
        let out = extractor().extract_at(
            "Mop the hallway. The floor is wet. Restock the gloves at Clinic B.",
            now(),
        );
        let tasks = tasks(&out);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].description, "Mop the hallway.");
        assert_eq!(tasks[1].facility.as_deref(), Some("Clinic B"));
        // facility named elsewhere in the message
        assert_eq!(tasks[0].facility.as_deref(), Some("Clinic B"));
    }

    #[test]
    fn test_confidence_always_in_unit_range() {
        let x = extractor();
        for text in [
            "Call the plumber tomorrow at 9am.",
            "We need to schedule a meeting next Friday.",
            "Send the report by end of day.",
            "Check it.",
        ] {
            for c in x.extract_at(text, now()) {
                assert!((0.0..=1.0).contains(&c.confidence), "{text}: {}", c.confidence);
            }
        }
    }

    #[test]
    fn test_event_proposed_for_scheduled_inspection() {
        let out = extractor().extract_at(
            "Schedule the fire inspection at Clinic A for tomorrow at 2pm.",
            now(),
        );
        let event = out
            .iter()
            .find(|a| a.kind == ActionKind::Event)
            .expect("event candidate");
        assert!(event.title.starts_with("Inspection At Clinic A"));
        let start = NaiveDate::from_ymd_opt(2026, 3, 12).unwrap().and_hms_opt(14, 0, 0);
        assert_eq!(event.proposed_start, start);
        assert_eq!(event.proposed_end, start.map(|s| s + Duration::minutes(60)));
        assert_eq!(event.facility.as_deref(), Some("Clinic A"));
        assert!((event.confidence - 0.7).abs() < 1e-6);
        assert_eq!(tasks(&out).len(), 1);
    }

    #[test]
    fn test_no_event_without_resolvable_date() {
        let out = extractor().extract_at("Schedule the fire inspection soon.", now());
        assert!(out.iter().all(|a| a.kind == ActionKind::Task));
    }

    #[test]
    fn test_no_event_without_indicator() {
        let out = extractor().extract_at("Mop the hallway tomorrow.", now());
        assert!(out.iter().all(|a| a.kind == ActionKind::Task));
    }

    #[test]
    fn test_event_title_falls_back_to_first_clause() {
        let x = extractor();
        assert_eq!(
            x.event_title("Reminder: payroll is due Friday. Thanks"),
            "Reminder: payroll is due Friday"
        );
        assert_eq!(x.event_title("Staff meeting, room 4."), "Meeting, Room 4");
    }

    #[test]
    fn test_long_sentence_title_is_truncated() {
        let sentence = format!("Clean {} now.", "the very dusty shelf ".repeat(10));
        let out = extractor().extract_at(&sentence, now());
        assert_eq!(out.len(), 1);
        assert!(out[0].title.ends_with("..."));
        assert_eq!(out[0].title.chars().count(), 103);
    }

    #[test]
    fn test_oversized_input_is_empty() {
        let config = NlpConfig {
            max_input_chars: 5,
            ..NlpConfig::default()
        };
        let pre = Arc::new(Preprocessor::load(&config).unwrap());
        let x = ActionExtractor::new(pre, ActionConfig::default(), FacilityMatcher::empty());
        assert!(x.extract("Clean the lobby.").is_empty());
    }
}
