//! DATE and TIME mention recognition.

use std::ops::Range;

use regex::Regex;

use crate::doc::EntityLabel;

const MONTHS: &str = r"jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";
const WEEKDAYS: &str = r"monday|tuesday|wednesday|thursday|friday|saturday|sunday";
const SMALL_NUMBERS: &str = r"\d+|a|an|one|two|three|four|five|six|seven|eight|nine|ten";

/// Finds date and time expressions with a fixed set of patterns.
///
/// Overlapping matches resolve to the leftmost, then the longest, so
/// "tomorrow morning" is one TIME rather than a DATE plus a TIME.
pub struct EntityRecognizer {
    patterns: Vec<(EntityLabel, Regex)>,
}

impl EntityRecognizer {
    /// Create a recognizer with pre-compiled patterns.
    pub fn new() -> Self {
        let date = [
            r"\b\d{4}-\d{2}-\d{2}\b".to_string(),
            r"\b\d{1,2}/\d{1,2}(?:/\d{2,4})?\b".to_string(),
            r"\b\d{1,2}-\d{1,2}-\d{2,4}\b".to_string(),
            r"\b(?:today|tomorrow|yesterday)\b".to_string(),
            format!(r"\b(?:(?:next|this|last|coming)\s+)?(?:{WEEKDAYS})\b"),
            r"\b(?:next|this|last|coming)\s+(?:week|month|year|weekend)\b".to_string(),
            r"\bend\s+of\s+(?:the\s+)?(?:day|week|month)\b".to_string(),
            r"\b(?:eod|eow|cob)\b".to_string(),
            format!(r"\b(?:{MONTHS})\.?\s+\d{{1,2}}(?:st|nd|rd|th)?(?:,?\s+\d{{4}})?\b"),
            format!(r"\b\d{{1,2}}(?:st|nd|rd|th)?\s+of\s+(?:{MONTHS})(?:,?\s+\d{{4}})?\b"),
            format!(r"\bin\s+(?:{SMALL_NUMBERS})\s+(?:days?|weeks?|months?)\b"),
        ];
        let time = [
            r"\b\d{1,2}(?::\d{2})?\s*(?:[ap]\.m|[ap]m)\b".to_string(),
            r"\b(?:[01]?\d|2[0-3]):[0-5]\d\b".to_string(),
            r"\b(?:noon|midnight|midday|tonight)\b".to_string(),
            r"\b(?:this|tomorrow|yesterday)\s+(?:morning|afternoon|evening|night)\b".to_string(),
            r"\bin\s+the\s+(?:morning|afternoon|evening)\b".to_string(),
            format!(r"\bin\s+(?:{SMALL_NUMBERS})\s+(?:minutes?|mins?|hours?|hrs?)\b"),
        ];

        let compile = |label: EntityLabel, pat: &str| {
            (
                label,
                Regex::new(&format!("(?i){pat}")).expect("Invalid entity regex"),
            )
        };
        let patterns = date
            .iter()
            .map(|p| compile(EntityLabel::Date, p))
            .chain(time.iter().map(|p| compile(EntityLabel::Time, p)))
            .collect();

        Self { patterns }
    }

    /// All non-overlapping DATE/TIME mentions as byte ranges, in text order.
    pub fn recognize(&self, text: &str) -> Vec<(EntityLabel, Range<usize>)> {
        let mut found: Vec<(EntityLabel, Range<usize>)> = self
            .patterns
            .iter()
            .flat_map(|(label, re)| re.find_iter(text).map(move |m| (*label, m.range())))
            .collect();
        found.sort_by(|a, b| {
            a.1.start
                .cmp(&b.1.start)
                .then((b.1.end - b.1.start).cmp(&(a.1.end - a.1.start)))
        });

        let mut kept: Vec<(EntityLabel, Range<usize>)> = Vec::with_capacity(found.len());
        for (label, span) in found {
            if kept.last().is_some_and(|(_, last)| span.start < last.end) {
                continue;
            }
            kept.push((label, span));
        }
        kept
    }
}

impl Default for EntityRecognizer {
    fn default() -> Self {
        Self::new()
    }
}
