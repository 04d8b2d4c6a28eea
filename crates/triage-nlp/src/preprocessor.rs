//! The linguistic preprocessor: one long-lived object that turns raw text
//! into an annotated [`Doc`] and caches the result per distinct input.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};
use triage_core::config::{EncoderKind, NlpConfig};
use triage_core::preview;

use crate::cache::{CacheStats, DocCache};
use crate::doc::{cosine, Doc, EntitySpan, Sentence, Token};
use crate::embedding::{HashedEncoder, SentenceEncoder};
use crate::entity::EntityRecognizer;
use crate::error::NlpError;
use crate::lexicon::Lexicon;
use crate::parser;
use crate::stopwords::is_stop_word;
use crate::tagger::Tagger;
use crate::tokenize::{segment, tokenize};

/// Tokenizer, tagger, parser, entity recognizer and sentence encoder behind
/// a bounded LRU cache.
///
/// Construct once at startup and share by reference or `Arc`. Every method
/// takes `&self`; the cache is the only mutable state and is internally
/// synchronized.
pub struct Preprocessor {
    tagger: Tagger,
    entities: EntityRecognizer,
    encoder: Box<dyn SentenceEncoder>,
    cache: DocCache,
    max_input_chars: usize,
}

impl Preprocessor {
    /// Build the preprocessor described by `config`.
    ///
    /// Any failure here (unreadable lexicon extension, missing ONNX model,
    /// onnx requested in a build without the feature) is fatal for startup.
    pub fn load(config: &NlpConfig) -> Result<Self, NlpError> {
        let lexicon = match &config.lexicon_path {
            Some(path) => Lexicon::with_extension_file(Path::new(path))?,
            None => Lexicon::builtin(),
        };

        let encoder: Box<dyn SentenceEncoder> = match config.encoder {
            EncoderKind::Hashed => Box::new(HashedEncoder::new(config.vector_dim)),
            EncoderKind::Onnx => load_onnx(config.model_dir.as_deref())?,
        };

        info!(
            encoder = ?config.encoder,
            dimensions = encoder.dimensions(),
            cache_capacity = config.cache_capacity,
            "Linguistic preprocessor ready"
        );

        Ok(Self::with_parts(
            lexicon,
            encoder,
            config.cache_capacity,
            config.max_input_chars,
        ))
    }

    /// Assemble a preprocessor from explicit parts.
    pub fn with_parts(
        lexicon: Lexicon,
        encoder: Box<dyn SentenceEncoder>,
        cache_capacity: usize,
        max_input_chars: usize,
    ) -> Self {
        Self {
            tagger: Tagger::new(lexicon),
            entities: EntityRecognizer::new(),
            encoder,
            cache: DocCache::new(cache_capacity),
            max_input_chars,
        }
    }

    /// Annotate `text`, returning the cached document when this exact string
    /// has been seen recently.
    pub fn process(&self, text: &str) -> Result<Arc<Doc>, NlpError> {
        let size = text.chars().count();
        if size > self.max_input_chars {
            return Err(NlpError::InputTooLarge {
                size,
                limit: self.max_input_chars,
            });
        }
        self.cache.get_or_try_insert_with(text, || self.annotate(text))
    }

    /// Semantic vector of the whole text.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, NlpError> {
        Ok(self.process(text)?.vector.clone())
    }

    /// Cosine similarity between the document vectors of two texts.
    pub fn similarity(&self, a: &str, b: &str) -> Result<f32, NlpError> {
        let (da, db) = (self.process(a)?, self.process(b)?);
        Ok(cosine(&da.vector, &db.vector))
    }

    pub fn dimensions(&self) -> usize {
        self.encoder.dimensions()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn annotate(&self, text: &str) -> Result<Doc, NlpError> {
        let raw = tokenize(text);
        let ranges = segment(text, &raw);

        let mut tokens: Vec<Token> = Vec::with_capacity(raw.len());
        let mut sentences: Vec<Sentence> = Vec::with_capacity(ranges.len());

        for (sent, range) in ranges.into_iter().enumerate() {
            let slice = &raw[range.clone()];
            let words: Vec<&str> = slice.iter().map(|t| t.text).collect();
            let tags = self.tagger.tag(&words);
            let parse = parser::parse(&tags);
            let offset = range.start;

            for (k, (raw_tok, (pos, tag))) in slice.iter().zip(tags).enumerate() {
                let (dep, head) = parse.arcs[k];
                let lower = raw_tok.text.to_lowercase();
                tokens.push(Token {
                    text: raw_tok.text.to_string(),
                    is_stop: is_stop_word(&lower),
                    lower,
                    span: raw_tok.span.clone(),
                    pos,
                    tag,
                    dep,
                    head: head + offset,
                    sent,
                });
            }

            let span = match (slice.first(), slice.last()) {
                (Some(first), Some(last)) => first.span.start..last.span.end,
                _ => 0..0,
            };
            let vector = self.sentence_vector(&text[span.clone()]);
            sentences.push(Sentence {
                tokens: range,
                span,
                root: parse.root.map(|r| r + offset),
                vector,
            });
        }

        let entities = self
            .entities
            .recognize(text)
            .into_iter()
            .map(|(label, span)| EntitySpan {
                label,
                text: text[span.clone()].to_string(),
                sent: sentences
                    .iter()
                    .rposition(|s| s.span.start <= span.start)
                    .unwrap_or(0),
                span,
            })
            .collect();

        let vector = self.encoder.embed(text)?;
        debug!(
            tokens = tokens.len(),
            sentences = sentences.len(),
            "Annotated text"
        );

        Ok(Doc {
            text: text.to_string(),
            tokens,
            sentences,
            entities,
            vector,
        })
    }

    /// A sentence that cannot be encoded gets a zero vector so it still
    /// takes part in clustering.
    fn sentence_vector(&self, sentence: &str) -> Vec<f32> {
        match self.encoder.embed(sentence) {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    error = %e,
                    sentence = %preview(sentence, 40),
                    "Sentence encoding failed, using zero vector"
                );
                vec![0.0; self.encoder.dimensions()]
            }
        }
    }
}

impl std::fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preprocessor")
            .field("dimensions", &self.encoder.dimensions())
            .field("cache", &self.cache)
            .field("max_input_chars", &self.max_input_chars)
            .finish()
    }
}

#[cfg(feature = "onnx")]
fn load_onnx(model_dir: Option<&str>) -> Result<Box<dyn SentenceEncoder>, NlpError> {
    let dir = model_dir
        .ok_or_else(|| NlpError::ModelLoad("nlp.model_dir is required for the onnx encoder".into()))?;
    Ok(Box::new(crate::embedding::OnnxEncoder::from_directory(Path::new(dir))?))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(_model_dir: Option<&str>) -> Result<Box<dyn SentenceEncoder>, NlpError> {
    Err(NlpError::ModelLoad(
        "onnx encoder requested but this build lacks the `onnx` feature".into(),
    ))
}
