use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, TriageError};

/// Top-level configuration for the triage pipeline.
///
/// Loaded from `~/.triage/config.toml` by default. Each section corresponds
/// to one analysis component; every value can be overridden.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriageConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub nlp: NlpConfig,
    #[serde(default)]
    pub priority: PriorityConfig,
    #[serde(default)]
    pub similarity: SimilarityConfig,
    #[serde(default)]
    pub summarization: SummarizationConfig,
    #[serde(default)]
    pub task_dependencies: DependencyConfig,
    #[serde(default)]
    pub actions: ActionConfig,
    #[serde(default)]
    pub facilities: FacilityConfig,
}

impl TriageConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TriageConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check cross-field constraints.
    ///
    /// Hard errors are returned as `Err`; soft issues come back as warnings
    /// and are also logged.
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.priority.medium_threshold >= self.priority.high_threshold {
            errors.push(format!(
                "priority.medium_threshold ({}) must be below priority.high_threshold ({})",
                self.priority.medium_threshold, self.priority.high_threshold
            ));
        }
        if self.nlp.cache_capacity == 0 {
            errors.push("nlp.cache_capacity must be greater than zero".to_string());
        }
        if self.nlp.vector_dim == 0 {
            errors.push("nlp.vector_dim must be greater than zero".to_string());
        }
        if self.summarization.max_length == 0 {
            errors.push("summarization.max_length must be greater than zero".to_string());
        }
        if self.summarization.max_clusters == 0 {
            errors.push("summarization.max_clusters must be greater than zero".to_string());
        }
        if !(0.0..=1.0).contains(&self.similarity.min_similarity_score) {
            errors.push("similarity.min_similarity_score must be within [0, 1]".to_string());
        }
        if !(0.0..=1.0).contains(&self.task_dependencies.similarity_threshold) {
            errors.push("task_dependencies.similarity_threshold must be within [0, 1]".to_string());
        }
        if self.actions.default_start_hour > 23 {
            errors.push("actions.default_start_hour must be within 0-23".to_string());
        }

        if self.facilities.names.is_empty() {
            warnings.push("No facilities configured; facility inference disabled".to_string());
        }
        if self.nlp.encoder == EncoderKind::Onnx && self.nlp.model_dir.is_none() {
            warnings.push("nlp.encoder is onnx but nlp.model_dir is not set".to_string());
        }

        for w in &warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(TriageError::Config(errors.join("; ")))
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Which sentence encoder backs semantic vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderKind {
    /// Feature-hashed word and subword vectors. No model files required.
    #[default]
    Hashed,
    /// Sentence-transformer ONNX export (requires the `onnx` feature).
    Onnx,
}

/// Linguistic preprocessor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NlpConfig {
    /// Maximum number of annotated documents kept in the LRU cache.
    pub cache_capacity: usize,
    /// Dimension of hashed semantic vectors.
    pub vector_dim: usize,
    /// Inputs longer than this (in chars) are rejected by the preprocessor.
    pub max_input_chars: usize,
    /// Sentence encoder backend.
    pub encoder: EncoderKind,
    /// Directory holding `model.onnx` and `tokenizer.json` for the onnx encoder.
    pub model_dir: Option<String>,
    /// Optional TOML file adding words to the tagger lexicon.
    pub lexicon_path: Option<String>,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 1000,
            vector_dim: 128,
            max_input_chars: 20_000,
            encoder: EncoderKind::Hashed,
            model_dir: None,
            lexicon_path: None,
        }
    }
}

/// Priority scorer weights and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityConfig {
    pub high_threshold: f64,
    pub medium_threshold: f64,
    pub urgent_terms_weight: f64,
    pub deadline_terms_weight: f64,
    pub action_terms_weight: f64,
    pub date_weight: f64,
    pub sentiment_weight: f64,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            high_threshold: 0.5,
            medium_threshold: 0.3,
            urgent_terms_weight: 0.4,
            deadline_terms_weight: 0.2,
            action_terms_weight: 0.2,
            date_weight: 0.1,
            sentiment_weight: 0.1,
        }
    }
}

/// Similarity engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Most recent messages considered as the comparison corpus.
    pub max_messages: usize,
    /// Results must score strictly above this.
    pub min_similarity_score: f64,
    /// Result cap when the caller does not pass one.
    pub default_limit: usize,
    /// Vocabulary cap (top terms by corpus frequency).
    pub max_features: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            max_messages: 100,
            min_similarity_score: 0.3,
            default_limit: 5,
            max_features: 5000,
        }
    }
}

/// Summarizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizationConfig {
    /// Maximum summary length in chars, excluding the ellipsis marker.
    pub max_length: usize,
    /// Below this many sentences clustering is skipped.
    pub min_sentences: usize,
    pub max_clusters: usize,
    /// Word budget for the graph-ranked extractive pass.
    pub target_words: usize,
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            max_length: 150,
            min_sentences: 3,
            max_clusters: 3,
            target_words: 30,
        }
    }
}

/// Task dependency analyzer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    pub similarity_threshold: f64,
    /// Largest task batch analyzed in one call; extra tasks are ignored.
    pub max_tasks: usize,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.8,
            max_tasks: 50,
        }
    }
}

/// Action extraction and scheduling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// Length of proposed events.
    pub event_duration_minutes: i64,
    /// Hour used when a date is mentioned without a time.
    pub default_start_hour: u32,
    /// Confidence assigned to message-level event proposals.
    pub event_confidence: f32,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            event_duration_minutes: 60,
            default_start_hour: 9,
            event_confidence: 0.7,
        }
    }
}

/// Known facilities for location inference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityConfig {
    /// Canonical facility names, matched case-insensitively.
    pub names: Vec<String>,
    /// Extra keyword -> canonical name mappings (e.g. "main" -> "Bellevue Medical Center").
    pub aliases: BTreeMap<String, String>,
    /// Facility assumed when nothing matches.
    pub default: Option<String>,
}
