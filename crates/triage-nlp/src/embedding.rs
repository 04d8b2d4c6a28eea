//! Sentence encoder trait and implementations.
//!
//! - `HashedEncoder` builds vectors from feature-hashed words and character
//!   trigrams. Deterministic, no model files, and words sharing subwords
//!   ("clean" / "cleaning") land close together.
//! - `OnnxEncoder` (feature `onnx`) loads a sentence-transformer ONNX export
//!   via ort and tokenizes with the HuggingFace tokenizers crate.

use crate::error::NlpError;
use crate::tokenize::tokenize;

/// Turns text into a fixed-dimensional semantic vector.
///
/// Text with nothing encodable yields a zero vector rather than an error.
pub trait SentenceEncoder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, NlpError>;

    /// Dimensionality of vectors produced by this encoder.
    fn dimensions(&self) -> usize;
}

/// Feature-hashing encoder.
///
/// A word vector is the L2-normalized sum of the hash vector of the word and
/// the hash vectors of its character trigrams (over `<word>`). Text vectors
/// are the mean of word vectors, skipping punctuation.
#[derive(Debug, Clone)]
pub struct HashedEncoder {
    dimensions: usize,
}

impl HashedEncoder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn feature_vector(&self, feature: &str, out: &mut [f32]) {
        let seed = fnv1a(feature.as_bytes());
        for (i, slot) in out.iter_mut().enumerate() {
            let h = splitmix64(seed ^ i as u64);
            *slot += (((h as f64) / (u64::MAX as f64)) * 2.0 - 1.0) as f32;
        }
    }

    /// Vector for a single lowercase word.
    pub fn word_vector(&self, word: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimensions];
        self.feature_vector(word, &mut v);

        let padded: Vec<char> = std::iter::once('<')
            .chain(word.chars())
            .chain(std::iter::once('>'))
            .collect();
        for tri in padded.windows(3) {
            let gram: String = tri.iter().collect();
            self.feature_vector(&gram, &mut v);
        }

        l2_normalize(&mut v);
        v
    }
}

impl Default for HashedEncoder {
    fn default() -> Self {
        Self::new(128)
    }
}

impl SentenceEncoder for HashedEncoder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, NlpError> {
        let mut sum = vec![0.0f32; self.dimensions];
        let mut count = 0usize;
        for tok in tokenize(text) {
            if !tok.text.chars().any(char::is_alphanumeric) {
                continue;
            }
            let wv = self.word_vector(&tok.text.to_lowercase());
            for (s, w) in sum.iter_mut().zip(&wv) {
                *s += w;
            }
            count += 1;
        }
        if count > 0 {
            for s in &mut sum {
                *s /= count as f32;
            }
        }
        Ok(sum)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a. Fixed so vectors stay the same across builds.
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(FNV_OFFSET, |h, &b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

/// SplitMix64 finalizer: spreads one seed over the vector dimensions.
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v {
            *x /= norm;
        }
    }
}

#[cfg(feature = "onnx")]
pub use onnx::OnnxEncoder;

#[cfg(feature = "onnx")]
mod onnx {
    use std::path::Path;
    use std::sync::Mutex;

    use ort::session::Session;
    use ort::value::TensorRef;
    use tokenizers::Tokenizer;
    use tracing::info;

    use super::{l2_normalize, SentenceEncoder};
    use crate::error::NlpError;

    /// ONNX Runtime-backed encoder using a sentence-transformer model.
    ///
    /// Expects a model directory containing:
    /// - `model.onnx` — the sentence-transformer ONNX export
    /// - `tokenizer.json` — the HuggingFace fast-tokenizer file
    ///
    /// Token embeddings are mean-pooled under the attention mask and
    /// L2-normalized.
    pub struct OnnxEncoder {
        session: Mutex<Session>,
        tokenizer: Tokenizer,
        dimensions: usize,
    }

    impl std::fmt::Debug for OnnxEncoder {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("OnnxEncoder")
                .field("dimensions", &self.dimensions)
                .finish()
        }
    }

    impl OnnxEncoder {
        /// Load a sentence-transformer model from the given directory.
        pub fn from_directory(model_dir: &Path) -> Result<Self, NlpError> {
            Self::from_files(
                &model_dir.join("model.onnx"),
                &model_dir.join("tokenizer.json"),
            )
        }

        pub fn from_files(model_path: &Path, tokenizer_path: &Path) -> Result<Self, NlpError> {
            if !model_path.exists() {
                return Err(NlpError::ModelLoad(format!(
                    "ONNX model not found at {}",
                    model_path.display()
                )));
            }
            if !tokenizer_path.exists() {
                return Err(NlpError::ModelLoad(format!(
                    "Tokenizer not found at {}",
                    tokenizer_path.display()
                )));
            }

            let session = Session::builder()
                .map_err(|e| NlpError::ModelLoad(format!("ONNX session builder: {}", e)))?
                .with_intra_threads(1)
                .map_err(|e| NlpError::ModelLoad(format!("ONNX set threads: {}", e)))?
                .commit_from_file(model_path)
                .map_err(|e| NlpError::ModelLoad(format!("ONNX load model: {}", e)))?;

            // Output is [batch, seq_len, hidden_dim].
            let dimensions = session
                .outputs()
                .first()
                .and_then(|out| out.dtype().tensor_shape())
                .and_then(|shape| shape.last().copied())
                .map(|d| if d > 0 { d as usize } else { 384 })
                .unwrap_or(384);

            let tokenizer = Tokenizer::from_file(tokenizer_path)
                .map_err(|e| NlpError::ModelLoad(format!("Failed to load tokenizer: {}", e)))?;

            info!(
                model = %model_path.display(),
                dimensions,
                "Loaded ONNX sentence encoder"
            );

            Ok(Self {
                session: Mutex::new(session),
                tokenizer,
                dimensions,
            })
        }
    }

    impl SentenceEncoder for OnnxEncoder {
        fn embed(&self, text: &str) -> Result<Vec<f32>, NlpError> {
            if text.trim().is_empty() {
                return Ok(vec![0.0; self.dimensions]);
            }

            let encoding = self
                .tokenizer
                .encode(text, true)
                .map_err(|e| NlpError::Encoder(format!("Tokenization failed: {}", e)))?;

            let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
            let attention_mask: Vec<i64> = encoding
                .get_attention_mask()
                .iter()
                .map(|&m| m as i64)
                .collect();
            let token_type_ids: Vec<i64> =
                encoding.get_type_ids().iter().map(|&t| t as i64).collect();
            let seq_len = input_ids.len();

            let array = |name: &str, data: Vec<i64>| {
                ndarray::Array2::from_shape_vec((1, seq_len), data)
                    .map_err(|e| NlpError::Encoder(format!("{} array: {}", name, e)))
            };
            let ids_array = array("input_ids", input_ids)?;
            let mask_array = array("attention_mask", attention_mask.clone())?;
            let type_array = array("token_type_ids", token_type_ids)?;

            let ids_ref = TensorRef::from_array_view(&ids_array)
                .map_err(|e| NlpError::Encoder(format!("TensorRef input_ids: {}", e)))?;
            let mask_ref = TensorRef::from_array_view(&mask_array)
                .map_err(|e| NlpError::Encoder(format!("TensorRef attention_mask: {}", e)))?;
            let type_ref = TensorRef::from_array_view(&type_array)
                .map_err(|e| NlpError::Encoder(format!("TensorRef token_type_ids: {}", e)))?;

            let mut session = self
                .session
                .lock()
                .map_err(|e| NlpError::Encoder(format!("Session lock poisoned: {}", e)))?;
            let outputs = session
                .run(ort::inputs![ids_ref, mask_ref, type_ref])
                .map_err(|e| NlpError::Encoder(format!("ONNX inference failed: {}", e)))?;

            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| NlpError::Encoder(format!("Extract embeddings: {}", e)))?;

            let hidden_dim = match shape.iter().copied().collect::<Vec<i64>>().as_slice() {
                [.., _, last] => *last as usize,
                dims => {
                    return Err(NlpError::Encoder(format!(
                        "Unexpected output shape: {:?}",
                        dims
                    )))
                }
            };

            let mut pooled = vec![0.0f32; hidden_dim];
            let mut count = 0.0f32;
            for (tok_idx, &mask_val) in attention_mask.iter().enumerate() {
                if mask_val > 0 {
                    let offset = tok_idx * hidden_dim;
                    for (dim, slot) in pooled.iter_mut().enumerate() {
                        *slot += data[offset + dim];
                    }
                    count += 1.0;
                }
            }
            if count > 0.0 {
                for val in &mut pooled {
                    *val /= count;
                }
            }
            l2_normalize(&mut pooled);
            Ok(pooled)
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }
    }

}
