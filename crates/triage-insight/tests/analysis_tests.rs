//! End-to-end tests for the analysis operations exposed by `Analyzer`.
//!
//! Every test builds its own analyzer from the default configuration, so no
//! cache state leaks between tests.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};

use triage_core::config::FacilityConfig;
use triage_core::{Message, MessageSource, PriorityLabel, Task, TriageConfig};
use triage_insight::{ActionKind, Analyzer};

// =============================================================================
// Helpers
// =============================================================================

const EMPTY_INPUTS: &[&str] = &["", " ", "\n\n", "\t  \r\n"];

fn analyzer() -> Analyzer {
    Analyzer::new(TriageConfig::default()).unwrap()
}

fn message(content: &str, minutes_ago: i64) -> Message {
    Message::new("front-desk@example.com", content, MessageSource::Email)
        .with_created_at(Utc::now() - Duration::minutes(minutes_ago))
}

/// Wednesday, 2026-03-11 08:00.
fn reference_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 11)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn corpus() -> Vec<Message> {
    vec![
        message("The lobby floor at Clinic A is wet and slippery", 50),
        message("Order more nitrile gloves for Clinic B", 40),
        message("Staff meeting moved to Thursday afternoon", 30),
        message("Freezer alarm going off at Clinic B", 20),
        message("The lobby floor at Clinic A is still wet", 10),
    ]
}

// =============================================================================
// Empty input
// =============================================================================

#[test]
fn test_empty_inputs_produce_defaults() {
    let a = analyzer();
    let corpus = corpus();
    for input in EMPTY_INPUTS {
        assert_eq!(a.score_priority(input), (PriorityLabel::Low, 0.0));
        assert!(a.extract_actions(input).is_empty());
        assert_eq!(a.summarize(input), "");
        assert!(a.find_similar(input, &corpus, 5).is_empty());
    }
}

#[test]
fn test_empty_task_list() {
    assert!(analyzer().analyze_dependencies(&[]).is_empty());
}

// =============================================================================
// Priority
// =============================================================================

#[test]
fn test_urgent_coverage_example() {
    let a = analyzer();
    let assessment = a.assess_priority("URGENT: need coverage at Clinic A by tomorrow 3pm");
    assert_eq!(assessment.label, PriorityLabel::High);
    assert!(assessment.signals.urgent > 0.0);
    assert!(assessment.signals.action > 0.0);
    assert!(assessment.signals.deadline > 0.0);
    assert!(assessment.signals.date > 0.0);
    assert_eq!(
        a.score_priority("URGENT: need coverage at Clinic A by tomorrow 3pm"),
        (assessment.label, assessment.score)
    );
}

#[test]
fn test_priority_is_monotonic_in_urgency_terms() {
    let a = analyzer();
    let bases = [
        "The HVAC at Clinic A is making a noise",
        "Please restock the paper towels",
        "Broken chair in the waiting room",
    ];
    for base in bases {
        let mut content = base.to_string();
        let mut previous = a.score_priority(&content).1;
        for term in ["urgent", "asap", "critical", "emergency", "important"] {
            content.push(' ');
            content.push_str(term);
            let score = a.score_priority(&content).1;
            assert!(score >= previous, "{content:?}: {score} < {previous}");
            previous = score;
        }
    }
}

#[test]
fn test_priority_labels_cover_all_bands() {
    let a = analyzer();
    assert_eq!(a.score_priority("Thanks for the flowers").0, PriorityLabel::Low);
    assert_eq!(
        a.score_priority("We need the report before Friday").0,
        PriorityLabel::Medium
    );
    assert_eq!(
        a.score_priority("Emergency: we must evacuate today").0,
        PriorityLabel::High
    );
}

// =============================================================================
// Actions
// =============================================================================

#[test]
fn test_clean_lobby_example() {
    let actions = analyzer().extract_actions("Please clean the lobby floor before noon.");
    assert!(actions
        .iter()
        .any(|c| c.kind == ActionKind::Task && c.confidence >= 0.6));
}

#[test]
fn test_action_confidence_is_bounded() {
    let a = analyzer();
    let texts = [
        "Call the plumber tomorrow at 9am about the leak.",
        "Send the invoice to accounting by end of day.",
        "We need to schedule a meeting next Friday at 2pm.",
        "Restock gloves. Mop the hallway tonight. Check the freezer in 2 hours.",
    ];
    for text in texts {
        for c in a.extract_actions_at(text, reference_time()) {
            assert!((0.0..=1.0).contains(&c.confidence), "{text}: {c:?}");
        }
    }
}

#[test]
fn test_event_and_facility_inference() {
    let mut config = TriageConfig::default();
    config.facilities = FacilityConfig {
        names: vec!["Clinic A".into(), "Clinic B".into()],
        ..Default::default()
    };
    let a = Analyzer::new(config).unwrap();

    let actions = a.extract_actions_at(
        "Book the annual fire inspection at Clinic B for next Monday at 10am.",
        reference_time(),
    );
    let event = actions
        .iter()
        .find(|c| c.kind == ActionKind::Event)
        .expect("event candidate");
    assert_eq!(event.facility.as_deref(), Some("Clinic B"));
    assert_eq!(
        event.proposed_start,
        NaiveDate::from_ymd_opt(2026, 3, 16).unwrap().and_hms_opt(10, 0, 0)
    );
    assert_eq!(
        event.proposed_end,
        NaiveDate::from_ymd_opt(2026, 3, 16).unwrap().and_hms_opt(11, 0, 0)
    );
    assert!(actions
        .iter()
        .filter(|c| c.kind == ActionKind::Task)
        .all(|c| c.facility.as_deref() == Some("Clinic B")));
}

// =============================================================================
// Similarity
// =============================================================================

#[test]
fn test_similarity_respects_limit_and_threshold() {
    let a = analyzer();
    let corpus = corpus();
    let min = a.config().similarity.min_similarity_score;

    for limit in [1, 2, 5] {
        let found = a.find_similar("The lobby floor at Clinic A is wet", &corpus, limit);
        assert!(found.len() <= limit);
        assert!(!found.is_empty());
        assert!(found.iter().all(|s| s.score > min));
        for pair in found.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}

#[test]
fn test_identical_corpus_entry_does_not_exceed_limit() {
    let a = analyzer();
    let mut corpus = corpus();
    let query = corpus[0].content.clone();
    corpus.push(message(&query, 1));
    let found = a.find_similar(&query, &corpus, 2);
    assert_eq!(found.len(), 2);
}

#[test]
fn test_find_similar_to_excludes_query_message() {
    let a = analyzer();
    let corpus = corpus();
    let query = corpus[4].clone();
    let found = a.find_similar_to(&query, &corpus, 5);
    assert!(found.iter().all(|s| s.message.id != query.id));
    assert_eq!(found[0].message.id, corpus[0].id);
}

// =============================================================================
// Summarization
// =============================================================================

#[test]
fn test_short_content_is_its_own_summary() {
    let a = analyzer();
    for content in [
        "Lobby floor is wet.",
        "Freezer alarm at Clinic B. Vaccines moved to backup.",
        "URGENT: need coverage at Clinic A by tomorrow 3pm",
    ] {
        assert_eq!(a.summarize(content), content);
    }
}

#[test]
fn test_summary_length_bound() {
    let a = analyzer();
    let max = a.config().summarization.max_length;
    let long_inputs = [
        "The freezer at Clinic B stopped working overnight. Vaccines need to move to the \
         backup freezer. Someone should check the backup freezer temperature every hour. \
         Facilities has been notified and a technician is on the way."
            .to_string(),
        "no punctuation at all just a very long run on stream of words ".repeat(8),
        "Short. ".repeat(60),
        "Alpha bravo charlie. Delta echo foxtrot. Golf hotel india. Juliet kilo lima. \
         Mike november oscar. Papa quebec romeo. Sierra tango uniform."
            .to_string(),
    ];
    for input in &long_inputs {
        let summary = a.summarize(input);
        assert!(!summary.is_empty());
        assert!(
            summary.chars().count() <= max + 3,
            "{} chars: {summary}",
            summary.chars().count()
        );
    }
}

#[test]
fn test_ranked_summary_keeps_connected_sentences_in_order() {
    let mut config = TriageConfig::default();
    config.summarization.target_words = 20;
    let a = Analyzer::new(config).unwrap();

    // only the first and third sentences share content words
    let content = "The lobby floor at Clinic A is wet. \
        Parking lot lights are flickering near the east entrance again tonight. \
        Put a wet floor sign in the lobby at Clinic A. \
        Order more printer paper for the front desk staff this week.";
    assert!(content.chars().count() > a.config().summarization.max_length);

    assert_eq!(
        a.summarize(content),
        "The lobby floor at Clinic A is wet. Put a wet floor sign in the lobby at Clinic A."
    );
}

// =============================================================================
// Dependencies
// =============================================================================

#[test]
fn test_dependencies_can_be_asymmetric() {
    let a = analyzer();
    let replace = Task::new("Order replacement ballasts")
        .with_description("Fix the parking lot lights");
    let fix = Task::new("Fix the parking lot lights");
    let map = a.analyze_dependencies(&[replace.clone(), fix.clone()]);

    assert!(map.get(&replace.id).is_some_and(|d| d.contains(&fix.id)));
    assert!(map.get(&fix.id).map_or(true, |d| !d.contains(&replace.id)));
}

// =============================================================================
// Merged analysis and concurrency
// =============================================================================

#[test]
fn test_analyze_merges_all_results() {
    let a = analyzer();
    let mut corpus = corpus();
    let msg = message(
        "URGENT: the lobby floor at Clinic A is wet again. Please mop it before noon.",
        0,
    );
    corpus.push(msg.clone());

    let result = a.analyze_at(&msg, &corpus, reference_time());
    assert_eq!(result.message_id, Some(msg.id));
    assert_eq!(result.priority, PriorityLabel::High);
    assert!(!result.actions.is_empty());
    assert!(result.similar.iter().all(|s| s.message.id != msg.id));
    assert!(!result.similar.is_empty());
    assert_eq!(result.summary, msg.content);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["priority"], "High");
}

#[test]
fn test_concurrent_analysis_shares_one_analyzer() {
    let a = Arc::new(analyzer());
    let corpus = Arc::new(corpus());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let a = Arc::clone(&a);
            let corpus = Arc::clone(&corpus);
            std::thread::spawn(move || {
                let text = if i % 2 == 0 {
                    "URGENT: need coverage at Clinic A by tomorrow 3pm"
                } else {
                    "Please clean the lobby floor before noon."
                };
                let msg = message(text, 0);
                a.analyze_at(&msg, &corpus, reference_time())
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for pair in results.chunks(2) {
        assert_eq!(pair[0].priority, PriorityLabel::High);
        assert_eq!(pair[0].priority_score, results[0].priority_score);
        assert_eq!(pair[1].actions.len(), results[1].actions.len());
    }
    let stats = a.preprocessor().cache_stats();
    assert!(stats.len <= stats.capacity);
    assert!(stats.hits > 0);
}
