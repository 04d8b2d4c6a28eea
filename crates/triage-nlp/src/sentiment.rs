//! Lexicon-based sentiment polarity.

use std::collections::HashMap;

use crate::doc::Token;

/// Opinion words and their polarity. Urgency vocabulary ("urgent", "asap",
/// "critical", ...) must stay out of this table.
const POLARITY: &[(&str, f32)] = &[
    ("good", 0.6),
    ("great", 0.8),
    ("excellent", 0.9),
    ("perfect", 0.9),
    ("nice", 0.5),
    ("fine", 0.3),
    ("happy", 0.7),
    ("glad", 0.6),
    ("thanks", 0.5),
    ("thank", 0.5),
    ("appreciate", 0.6),
    ("appreciated", 0.6),
    ("resolved", 0.5),
    ("fixed", 0.4),
    ("helpful", 0.6),
    ("love", 0.8),
    ("pleased", 0.7),
    ("bad", -0.6),
    ("terrible", -0.9),
    ("awful", -0.9),
    ("horrible", -0.9),
    ("disgusting", -0.9),
    ("unacceptable", -0.8),
    ("poor", -0.5),
    ("worse", -0.7),
    ("worst", -0.9),
    ("wrong", -0.5),
    ("broken", -0.6),
    ("broke", -0.5),
    ("damaged", -0.6),
    ("damage", -0.5),
    ("dirty", -0.5),
    ("mess", -0.5),
    ("messy", -0.5),
    ("leak", -0.5),
    ("leaking", -0.6),
    ("flooded", -0.7),
    ("flooding", -0.7),
    ("overflowing", -0.6),
    ("spill", -0.4),
    ("stuck", -0.4),
    ("problem", -0.5),
    ("issue", -0.3),
    ("complaint", -0.6),
    ("complained", -0.6),
    ("angry", -0.8),
    ("upset", -0.7),
    ("frustrated", -0.7),
    ("worried", -0.5),
    ("concerned", -0.4),
    ("unsafe", -0.7),
    ("dangerous", -0.8),
    ("hazard", -0.6),
    ("sick", -0.5),
    ("failed", -0.6),
    ("failure", -0.7),
    ("missing", -0.4),
    ("lost", -0.4),
    ("late", -0.3),
    ("sorry", -0.3),
    ("unfortunately", -0.5),
    ("slippery", -0.4),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "n't", "don't", "doesn't", "didn't", "isn't", "wasn't", "aren't",
    "won't", "can't", "cannot",
];
const INTENSIFIERS: &[&str] = &["very", "extremely", "really", "so", "super", "totally"];

/// How far back a negator still applies.
const NEGATION_WINDOW: usize = 3;
const NEGATION_FACTOR: f32 = -0.5;
const INTENSIFIER_FACTOR: f32 = 1.3;

/// Signed polarity estimator producing a score in `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct SentimentEstimator {
    polarity: HashMap<&'static str, f32>,
}

impl Default for SentimentEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentEstimator {
    pub fn new() -> Self {
        Self {
            polarity: POLARITY.iter().copied().collect(),
        }
    }

    /// Mean polarity of the opinion words in `tokens`; 0.0 when none match.
    pub fn polarity(&self, tokens: &[Token]) -> f32 {
        let mut total = 0.0f32;
        let mut matched = 0usize;

        for (i, tok) in tokens.iter().enumerate() {
            let Some(&base) = self.polarity.get(tok.lower.as_str()) else {
                continue;
            };
            let mut score = base;

            let window = tokens[i.saturating_sub(NEGATION_WINDOW)..i]
                .iter()
                .filter(|t| t.sent == tok.sent);
            if window.clone().any(|t| NEGATORS.contains(&t.lower.as_str())) {
                score *= NEGATION_FACTOR;
            }
            if window
                .last()
                .is_some_and(|t| INTENSIFIERS.contains(&t.lower.as_str()))
            {
                score *= INTENSIFIER_FACTOR;
            }

            total += score;
            matched += 1;
        }

        if matched == 0 {
            return 0.0;
        }
        (total / matched as f32).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{DepLabel, PartOfSpeech, Tag};

    fn tokens(text: &str) -> Vec<Token> {
        text.split_whitespace()
            .map(|w| Token {
                text: w.to_string(),
                lower: w.to_lowercase(),
                span: 0..0,
                pos: PartOfSpeech::X,
                tag: Tag::Other,
                dep: DepLabel::Dep,
                head: 0,
                sent: 0,
                is_stop: false,
            })
            .collect()
    }

    #[test]
    fn test_neutral_text() {
        let s = SentimentEstimator::new();
        assert_eq!(s.polarity(&tokens("clean the lobby floor")), 0.0);
        assert_eq!(s.polarity(&[]), 0.0);
    }

    #[test]
    fn test_negative_and_positive() {
        let s = SentimentEstimator::new();
        assert!(s.polarity(&tokens("the sink is broken and leaking")) < 0.0);
        assert!(s.polarity(&tokens("thanks , great job")) > 0.0);
    }

    #[test]
    fn test_negation_flips_and_damps() {
        let s = SentimentEstimator::new();
        let plain = s.polarity(&tokens("it is bad"));
        let negated = s.polarity(&tokens("it is not bad"));
        assert!((plain + 0.6).abs() < 1e-6);
        assert!((negated - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_intensifier_scales_and_clamps() {
        let s = SentimentEstimator::new();
        let v = s.polarity(&tokens("very bad"));
        assert!((v + 0.78).abs() < 1e-5);
        let v = s.polarity(&tokens("extremely terrible"));
        assert_eq!(v, -1.0);
    }

    #[test]
    fn test_urgency_words_are_neutral() {
        let s = SentimentEstimator::new();
        let base = s.polarity(&tokens("the pipe is leaking"));
        let urgent = s.polarity(&tokens("urgent asap critical the pipe is leaking"));
        assert_eq!(base, urgent);
    }
}
