//! Extractive summarization.
//!
//! Tries, in order, stopping at the first that yields text:
//! 1. content already within `max_length` is returned as is;
//! 2. TextRank over sentences, targeting `target_words`;
//! 3. the first sentence, when there are fewer than `min_sentences`;
//! 4. k-means over sentence vectors, one representative per cluster;
//! 5. the first sentence, when clustering fails;
//! 6. the raw content, when anything else fails.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};
use triage_core::config::SummarizationConfig;
use triage_core::preview;
use triage_nlp::tokenize::{segment, tokenize};
use triage_nlp::{is_stop_word, Doc, Preprocessor};

use crate::cluster::KMeans;
use crate::error::InsightError;
use crate::text::{clip, truncate_marked};

const DAMPING: f64 = 0.85;
const CONVERGENCE: f64 = 1e-6;
const MAX_RANK_ITERATIONS: usize = 100;

pub struct Summarizer {
    pre: Arc<Preprocessor>,
    config: SummarizationConfig,
}

impl Summarizer {
    pub fn new(pre: Arc<Preprocessor>, config: SummarizationConfig) -> Self {
        Self { pre, config }
    }

    /// Never fails and never exceeds `max_length` plus the ellipsis.
    pub fn summarize(&self, content: &str) -> String {
        if content.trim().is_empty() {
            return String::new();
        }
        let max = self.config.max_length;
        if content.chars().count() <= max {
            return content.to_string();
        }

        match self.reduce(content) {
            Ok(summary) => summary,
            Err(e) => {
                warn!(
                    error = %e,
                    content_len = content.len(),
                    content = %preview(content, 60),
                    "Summarization failed, truncating content"
                );
                truncate_marked(content, max)
            }
        }
    }

    fn reduce(&self, content: &str) -> Result<String, InsightError> {
        let max = self.config.max_length;

        match self.text_rank(content) {
            Ok(summary) => return Ok(clip(&summary, max)),
            Err(e) => debug!(reason = %e, "TextRank produced no summary"),
        }

        let doc = self.pre.process(content)?;
        let sentences = doc.sentence_texts();
        let first = sentences
            .first()
            .copied()
            .ok_or_else(|| InsightError::InsufficientData("no sentences".into()))?;
        if sentences.len() < self.config.min_sentences {
            return Ok(clip(first, max));
        }

        match self.cluster_sentences(&doc) {
            Ok(summary) => Ok(clip(&summary, max)),
            Err(e) => {
                warn!(
                    error = %e,
                    sentences = sentences.len(),
                    "Sentence clustering failed, using first sentence"
                );
                Ok(truncate_marked(first, max))
            }
        }
    }

    /// Graph ranking of sentences by content-word overlap. Fails when the
    /// text has fewer than two sentences or no two sentences share a word.
    pub fn text_rank(&self, content: &str) -> Result<String, InsightError> {
        let tokens = tokenize(content);
        let sentences: Vec<&str> = segment(content, &tokens)
            .into_iter()
            .filter(|r| !r.is_empty())
            .map(|r| &content[tokens[r.start].span.start..tokens[r.end - 1].span.end])
            .collect();
        if sentences.len() < 2 {
            return Err(InsightError::InsufficientData(
                "at least two sentences are required".into(),
            ));
        }

        let words: Vec<HashSet<String>> = sentences.iter().map(|s| content_words(s)).collect();
        let n = sentences.len();
        let mut weights = vec![vec![0.0f64; n]; n];
        let mut edges = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                let w = overlap(&words[i], &words[j]);
                if w > 0.0 {
                    weights[i][j] = w;
                    weights[j][i] = w;
                    edges += 1;
                }
            }
        }
        if edges == 0 {
            return Err(InsightError::InsufficientData(
                "no sentences share content words".into(),
            ));
        }

        let scores = page_rank(&weights);
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));

        let target = self.config.target_words;
        let mut selected = Vec::new();
        let mut length = 0usize;
        for i in order {
            let count = sentences[i].split_whitespace().count();
            if !selected.is_empty() && target.abs_diff(length + count) > target.abs_diff(length) {
                break;
            }
            selected.push(i);
            length += count;
        }
        selected.sort_unstable();

        Ok(selected
            .into_iter()
            .map(|i| sentences[i])
            .collect::<Vec<_>>()
            .join(" "))
    }

    /// One sentence per cluster (nearest its centroid), in centroid order.
    /// A sentence nearest to several centroids is emitted once.
    fn cluster_sentences(&self, doc: &Doc) -> Result<String, InsightError> {
        let vectors: Vec<Vec<f32>> = doc.sentences.iter().map(|s| s.vector.clone()).collect();
        let k = self.config.max_clusters.min(vectors.len());
        let clustering = KMeans::new(k).fit(&vectors)?;

        let mut seen = HashSet::new();
        let picked: Vec<&str> = clustering
            .representatives(&vectors)
            .into_iter()
            .filter(|i| seen.insert(*i))
            .map(|i| doc.sentence_text(i))
            .collect();
        if picked.is_empty() {
            return Err(InsightError::Clustering("no representative sentences".into()));
        }
        Ok(picked.join(" "))
    }
}

fn content_words(sentence: &str) -> HashSet<String> {
    tokenize(sentence)
        .into_iter()
        .filter(|t| t.text.chars().any(char::is_alphanumeric))
        .map(|t| t.text.to_lowercase())
        .filter(|w| !is_stop_word(w))
        .collect()
}

/// `common / (ln|a| + ln|b|)`; zero when the denominator vanishes.
fn overlap(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let common = a.intersection(b).count();
    if common == 0 {
        return 0.0;
    }
    let denom = (a.len() as f64).ln() + (b.len() as f64).ln();
    if denom <= 0.0 {
        return 0.0;
    }
    common as f64 / denom
}

/// Weighted PageRank over a symmetric adjacency matrix.
fn page_rank(weights: &[Vec<f64>]) -> Vec<f64> {
    let n = weights.len();
    let out: Vec<f64> = weights.iter().map(|row| row.iter().sum()).collect();
    let mut scores = vec![1.0 / n as f64; n];

    for _ in 0..MAX_RANK_ITERATIONS {
        let next: Vec<f64> = (0..n)
            .map(|i| {
                let inbound: f64 = (0..n)
                    .filter(|&j| out[j] > 0.0)
                    .map(|j| weights[j][i] / out[j] * scores[j])
                    .sum();
                (1.0 - DAMPING) / n as f64 + DAMPING * inbound
            })
            .collect();
        let delta: f64 = next.iter().zip(&scores).map(|(a, b)| (a - b).abs()).sum();
        scores = next;
        if delta < CONVERGENCE {
            break;
        }
    }
    scores
}
