//! Annotated document produced by the preprocessor.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Coarse part-of-speech (Universal Dependencies style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartOfSpeech {
    Noun,
    Propn,
    Verb,
    Aux,
    Adj,
    Adv,
    Adp,
    Det,
    Pron,
    Cconj,
    Sconj,
    Part,
    Num,
    Intj,
    Punct,
    Sym,
    X,
}

/// Fine-grained tag. Verb forms follow the Penn Treebank distinctions the
/// action extractor cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// Base form / infinitive / imperative ("clean").
    Vb,
    /// Past tense ("cleaned").
    Vbd,
    /// Gerund or present participle ("cleaning").
    Vbg,
    /// Past participle ("broken").
    Vbn,
    /// Non-3rd person singular present ("need").
    Vbp,
    /// 3rd person singular present ("needs").
    Vbz,
    /// Modal ("must").
    Md,
    Nn,
    Nns,
    Nnp,
    Jj,
    Rb,
    In,
    Dt,
    Prp,
    /// Possessive pronoun ("our").
    PrpS,
    Cc,
    Cd,
    To,
    Uh,
    Wh,
    Punct,
    Other,
}

impl Tag {
    pub fn is_verb_form(&self) -> bool {
        matches!(
            self,
            Tag::Vb | Tag::Vbd | Tag::Vbg | Tag::Vbn | Tag::Vbp | Tag::Vbz
        )
    }
}

/// Syntactic dependency relation to the token's head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepLabel {
    Root,
    Nsubj,
    Dobj,
    Pobj,
    Prep,
    Aux,
    Neg,
    Det,
    Poss,
    Amod,
    Compound,
    Nummod,
    Advmod,
    Xcomp,
    Advcl,
    Conj,
    Cc,
    Mark,
    Intj,
    Punct,
    Dep,
}

/// Named-entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    Date,
    Time,
}

impl EntityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityLabel::Date => "DATE",
            EntityLabel::Time => "TIME",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub lower: String,
    /// Byte range in [`Doc::text`].
    pub span: Range<usize>,
    pub pos: PartOfSpeech,
    pub tag: Tag,
    pub dep: DepLabel,
    /// Index of the head token; the root points at itself.
    pub head: usize,
    /// Index of the containing sentence.
    pub sent: usize,
    pub is_stop: bool,
}

impl Token {
    pub fn is_punct(&self) -> bool {
        self.pos == PartOfSpeech::Punct
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    /// Token index range.
    pub tokens: Range<usize>,
    /// Byte range in [`Doc::text`].
    pub span: Range<usize>,
    /// Syntactic root, `None` only for sentences without tokens.
    pub root: Option<usize>,
    /// Semantic vector; all zeros when nothing in the sentence could be encoded.
    pub vector: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub label: EntityLabel,
    pub text: String,
    /// Byte range in [`Doc::text`].
    pub span: Range<usize>,
    /// Sentence the entity starts in.
    pub sent: usize,
}

/// Fully annotated text. Immutable once built and shared through the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doc {
    pub text: String,
    pub tokens: Vec<Token>,
    pub sentences: Vec<Sentence>,
    pub entities: Vec<EntitySpan>,
    pub vector: Vec<f32>,
}

impl Doc {
    pub fn sentence_text(&self, index: usize) -> &str {
        self.sentences
            .get(index)
            .and_then(|s| self.text.get(s.span.clone()))
            .map(str::trim)
            .unwrap_or("")
    }

    pub fn sentence_texts(&self) -> Vec<&str> {
        (0..self.sentences.len()).map(|i| self.sentence_text(i)).collect()
    }

    pub fn sentence_tokens(&self, index: usize) -> &[Token] {
        self.sentences
            .get(index)
            .map(|s| &self.tokens[s.tokens.clone()])
            .unwrap_or(&[])
    }

    pub fn sentence_entities(&self, index: usize) -> impl Iterator<Item = &EntitySpan> {
        self.entities.iter().filter(move |e| e.sent == index)
    }

    /// Indices of tokens whose head is `index` (excluding the root's self-loop).
    pub fn children(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .filter(move |(i, t)| t.head == index && *i != index)
            .map(|(i, _)| i)
    }

    pub fn has_entity(&self, labels: &[EntityLabel]) -> bool {
        self.entities.iter().any(|e| labels.contains(&e.label))
    }

    pub fn vector_norm(&self) -> f32 {
        norm(&self.vector)
    }

    /// Cosine similarity of the document vectors; 0.0 when either is empty.
    pub fn similarity(&self, other: &Doc) -> f32 {
        cosine(&self.vector, &other.vector)
    }
}

pub fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity; zero vectors and length mismatches compare as 0.0.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let (na, nb) = (norm(a), norm(b));
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (na * nb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical() {
        let v = vec![0.3, 0.4, 0.5];
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_cosine_length_mismatch() {
        assert_eq!(cosine(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_tag_is_verb_form() {
        assert!(Tag::Vb.is_verb_form());
        assert!(Tag::Vbz.is_verb_form());
        assert!(!Tag::Md.is_verb_form());
        assert!(!Tag::Nn.is_verb_form());
    }

    #[test]
    fn test_entity_label_as_str() {
        assert_eq!(EntityLabel::Date.as_str(), "DATE");
        assert_eq!(EntityLabel::Time.as_str(), "TIME");
    }
}
