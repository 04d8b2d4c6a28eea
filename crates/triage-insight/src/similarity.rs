//! TF-IDF duplicate / similar-message detection.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};
use triage_core::config::SimilarityConfig;
use triage_core::{preview, Message};
use triage_nlp::is_stop_word;

use crate::error::InsightError;
use crate::types::SimilarMessage;

/// Sparse row: `(term index, weight)` sorted by term index.
pub type SparseVector = Vec<(usize, f64)>;

fn token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("Invalid token regex"))
}

fn terms(document: &str) -> impl Iterator<Item = String> + '_ {
    token_pattern()
        .find_iter(document)
        .map(|m| m.as_str().to_lowercase())
        .filter(|t| !is_stop_word(t))
}

/// Term-frequency / inverse-document-frequency vectorizer fitted per call.
///
/// Terms are lowercase runs of two or more word characters with English stop
/// words removed. The vocabulary keeps the `max_features` most frequent terms
/// (ties broken alphabetically). Weights are raw counts times the smoothed
/// `ln((1 + n) / (1 + df)) + 1`, and every row is L2-normalized.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    max_features: usize,
}

impl TfIdfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self { max_features }
    }

    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<Vec<SparseVector>, InsightError> {
        let counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|d| {
                let mut tf = HashMap::new();
                for t in terms(d.as_ref()) {
                    *tf.entry(t).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let mut totals: HashMap<&str, (usize, usize)> = HashMap::new();
        for tf in &counts {
            for (term, n) in tf {
                let entry = totals.entry(term.as_str()).or_insert((0, 0));
                entry.0 += n;
                entry.1 += 1;
            }
        }
        if totals.is_empty() {
            return Err(InsightError::Vectorization(
                "empty vocabulary; documents contain only stop words".into(),
            ));
        }

        let mut ranked: Vec<(&str, usize, usize)> =
            totals.into_iter().map(|(t, (total, df))| (t, total, df)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features.max(1));
        ranked.sort_by(|a, b| a.0.cmp(b.0));

        let n = documents.len() as f64;
        let vocabulary: HashMap<&str, (usize, f64)> = ranked
            .iter()
            .enumerate()
            .map(|(i, (term, _, df))| (*term, (i, ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0)))
            .collect();

        Ok(counts
            .iter()
            .map(|tf| {
                let mut row: SparseVector = tf
                    .iter()
                    .filter_map(|(term, count)| {
                        vocabulary
                            .get(term.as_str())
                            .map(|(i, idf)| (*i, *count as f64 * idf))
                    })
                    .collect();
                row.sort_by_key(|(i, _)| *i);
                normalize(&mut row);
                row
            })
            .collect())
    }
}

fn normalize(row: &mut SparseVector) {
    let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        row.iter_mut().for_each(|(_, w)| *w /= norm);
    }
}

/// Dot product of two index-sorted sparse rows.
pub fn sparse_dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j, mut sum) = (0, 0, 0.0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

/// Ranks recent messages by lexical similarity to a query.
pub struct SimilarityEngine {
    config: SimilarityConfig,
    vectorizer: TfIdfVectorizer,
}

impl SimilarityEngine {
    pub fn new(config: SimilarityConfig) -> Self {
        Self {
            vectorizer: TfIdfVectorizer::new(config.max_features),
            config,
        }
    }

    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// Up to `limit` corpus messages scoring strictly above the configured
    /// minimum, best first. Only the `max_messages` most recent corpus
    /// entries are considered. Failures yield an empty list.
    pub fn find_similar(&self, content: &str, corpus: &[Message], limit: usize) -> Vec<SimilarMessage> {
        match self.try_find_similar(content, corpus, limit) {
            Ok(found) => found,
            Err(e) => {
                warn!(
                    error = %e,
                    content_len = content.len(),
                    content = %preview(content, 60),
                    corpus_len = corpus.len(),
                    "Similarity search failed"
                );
                Vec::new()
            }
        }
    }

    pub fn try_find_similar(
        &self,
        content: &str,
        corpus: &[Message],
        limit: usize,
    ) -> Result<Vec<SimilarMessage>, InsightError> {
        if content.trim().is_empty() || corpus.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut recent: Vec<&Message> = corpus.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(self.config.max_messages);

        let mut documents: Vec<&str> = recent.iter().map(|m| m.content.as_str()).collect();
        documents.push(content);
        let rows = self.vectorizer.fit_transform(&documents)?;
        let (query, rows) = rows
            .split_last()
            .ok_or_else(|| InsightError::Vectorization("no rows produced".into()))?;

        let mut scored: Vec<(usize, f64)> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (i, sparse_dot(query, row)))
            .filter(|(_, score)| *score > self.config.min_similarity_score)
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(limit);

        debug!(
            candidates = rows.len(),
            matched = scored.len(),
            "Similarity search complete"
        );
        Ok(scored
            .into_iter()
            .map(|(i, score)| SimilarMessage {
                message: recent[i].clone(),
                score,
            })
            .collect())
    }
}
