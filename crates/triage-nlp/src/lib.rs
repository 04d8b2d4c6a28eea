//! Triage NLP crate - linguistic preprocessing for message triage.
//!
//! Turns raw message text into an annotated [`Doc`]:
//! - Tokenization and sentence segmentation
//! - Part-of-speech tagging and a shallow dependency parse
//! - DATE / TIME entity recognition
//! - Sentence and document vectors (feature-hashed, or ONNX with the `onnx` feature)
//! - Lexicon-based sentiment polarity
//!
//! Annotated documents are cached in a bounded LRU keyed by input text.

pub mod cache;
pub mod doc;
pub mod embedding;
pub mod entity;
pub mod error;
pub mod lexicon;
pub mod parser;
pub mod preprocessor;
pub mod sentiment;
pub mod stopwords;
pub mod tagger;
pub mod tokenize;

pub use cache::{CacheStats, DocCache};
pub use doc::{cosine, DepLabel, Doc, EntityLabel, EntitySpan, PartOfSpeech, Sentence, Tag, Token};
pub use embedding::{HashedEncoder, SentenceEncoder};
pub use error::NlpError;
pub use lexicon::Lexicon;
pub use preprocessor::Preprocessor;
pub use sentiment::SentimentEstimator;
pub use stopwords::is_stop_word;
