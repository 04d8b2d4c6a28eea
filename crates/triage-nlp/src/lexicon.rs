//! Word lists backing the part-of-speech tagger.
//!
//! The built-in lexicon covers closed-class words plus the open-class
//! vocabulary that shows up in facility operations traffic (cleaning,
//! staffing, maintenance, scheduling). It can be extended at startup from a
//! TOML file:
//!
//! ```toml
//! verbs = ["restock", "sanitize"]
//! nouns = ["autoclave"]
//! adjectives = ["biohazardous"]
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::NlpError;

/// Closed-class categories recognized before any open-class lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedClass {
    Det,
    PossPron,
    Pron,
    Prep,
    To,
    Cconj,
    Sconj,
    Modal,
    /// Forms of "be".
    Be,
    /// Forms of "have".
    Have,
    /// Forms of "do".
    Do,
    Neg,
    Intj,
    Wh,
}

/// Inflection of a verb form found in the lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbForm {
    Base,
    Third,
    /// Past tense or past participle; context decides.
    Past,
    Participle,
    Gerund,
}

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "each", "every", "any", "some", "no",
    "all", "another", "both", "either", "neither", "several", "few", "many", "much", "more",
    "most", "other", "such",
];

const POSSESSIVES: &[&str] = &["my", "your", "our", "their", "his", "her", "its", "whose"];

const PRONOUNS: &[&str] = &[
    "i", "you", "we", "they", "he", "she", "it", "me", "us", "them", "him", "myself",
    "yourself", "ourselves", "themselves", "someone", "somebody", "anyone", "anybody",
    "everyone", "everybody", "nobody", "something", "anything", "everything", "nothing",
    "mine", "yours", "ours", "theirs", "i'm", "we're", "you're", "they're", "it's", "i'll",
    "we'll", "you'll", "they'll", "i've", "we've", "you've", "they've",
];

const PREPOSITIONS: &[&str] = &[
    "at", "by", "before", "after", "for", "in", "on", "with", "from", "of", "about", "until",
    "till", "during", "into", "onto", "over", "under", "near", "around", "between", "through",
    "without", "within", "across", "behind", "per", "via", "toward", "towards", "against",
    "upon", "beside", "besides", "outside", "inside", "throughout", "along", "among", "above",
    "below", "beyond", "regarding", "re",
];

const COORDINATORS: &[&str] = &["and", "or", "but", "nor", "plus", "&"];

const SUBORDINATORS: &[&str] = &[
    "if", "because", "while", "although", "though", "unless", "once", "whether", "since", "as",
    "so", "than", "whereas",
];

const MODALS: &[&str] = &[
    "can", "could", "will", "would", "shall", "should", "may", "might", "must", "can't",
    "cannot", "won't", "wouldn't", "shouldn't", "couldn't", "mustn't",
];

const BE_FORMS: &[&str] = &[
    "be", "am", "is", "are", "was", "were", "been", "being", "isn't", "aren't", "wasn't",
    "weren't",
];

const HAVE_FORMS: &[&str] = &["have", "has", "had", "having", "haven't", "hasn't", "hadn't"];

const DO_FORMS: &[&str] = &["do", "does", "did", "don't", "doesn't", "didn't"];

const NEGATIONS: &[&str] = &["not", "n't", "never"];

const INTERJECTIONS: &[&str] = &[
    "please", "pls", "plz", "thanks", "thank", "hi", "hello", "hey", "ok", "okay", "yes",
    "fyi", "btw", "oh",
];

const WH_WORDS: &[&str] = &["what", "who", "whom", "where", "when", "why", "how", "which"];

const ADVERBS: &[&str] = &[
    "also", "asap", "now", "soon", "very", "really", "just", "still", "already", "again",
    "immediately", "quickly", "always", "never", "here", "there", "then", "too", "only",
    "back", "right", "later", "ever", "even", "well", "urgently", "promptly", "currently",
    "together", "away", "up", "down", "out", "off", "first", "directly", "probably", "maybe",
    "perhaps", "extremely", "completely",
    "fully", "somewhat", "almost", "instead", "otherwise", "overnight", "daily", "weekly",
];

const ADJECTIVES: &[&str] = &[
    "urgent", "important", "critical", "immediate", "necessary", "mandatory", "broken",
    "dirty", "clean", "new", "old", "full", "empty", "wet", "late", "early", "next", "last",
    "main", "high", "low", "available", "unavailable", "ready", "sick", "good", "bad", "great",
    "terrible", "awful", "big", "small", "large", "short", "long", "open", "closed", "free",
    "busy", "quick", "slow", "hot", "cold", "safe", "unsafe", "overdue", "due", "missing",
    "sticky", "slippery", "loud", "quiet", "same", "different", "whole", "entire", "extra",
    "additional", "current", "final", "daily", "weekly", "monthly", "annual", "other",
    "own", "sure", "able", "unable", "happy", "sorry", "fine", "okay", "clear", "left",
];

/// Words that are verbs in the lexicon but read as nouns when context is
/// inconclusive (e.g. after another verb).
const NOUN_PREFERRED: &[&str] = &[
    "order", "call", "check", "need", "schedule", "report", "request", "cover",
    "spill", "leak", "clean", "mop", "trash", "walk", "visit", "meeting", "training",
    "review", "update", "change", "shift", "delivery", "repair", "service", "help", "rush",
    "plan", "supply", "stock", "restock", "audit", "inspect", "test", "floor", "water",
    "place", "staff", "question", "issue", "problem", "note", "email", "text", "time", "work",
];

const VERBS: &[&str] = &[
    // staffing and coordination
    "need", "require", "cover", "assign", "reassign", "schedule", "reschedule", "staff",
    "call", "email", "text", "contact", "notify", "inform", "tell", "ask", "confirm",
    "cancel", "book", "arrange", "coordinate", "plan", "meet", "attend", "join", "host",
    "remind", "let", "make", "take", "give", "get", "send", "bring", "keep", "hold", "put",
    "set", "come", "go", "leave", "arrive", "start", "begin", "finish", "complete", "stop",
    "continue", "help", "assist", "support", "handle", "manage", "run", "work", "train",
    "teach", "review", "approve", "sign", "submit", "file", "report", "respond", "reply",
    "answer", "follow", "update", "change", "move", "swap", "switch", "return", "pick",
    "drop", "deliver", "order", "reorder", "buy", "pay", "charge", "invoice", "track",
    "see", "look", "find", "know", "think", "want", "like", "try", "say", "speak", "talk",
    "discuss", "share", "show", "write", "read", "print", "post", "hear", "feel", "seem",
    "wait", "expect", "hope", "prepare", "organize", "prioritize", "escalate",
    // cleaning and maintenance
    "clean", "mop", "sweep", "vacuum", "wipe", "wash", "scrub", "dust", "polish", "disinfect",
    "sanitize", "sterilize", "empty", "refill", "restock", "stock", "supply", "replace",
    "repair", "fix", "service", "maintain", "inspect", "check", "test", "audit", "verify",
    "install", "remove", "paint", "unclog", "drain", "dispose", "collect",
    "haul", "lock", "unlock", "open", "close", "shut", "turn", "reset", "restart",
    "break", "leak", "spill", "flood", "overflow", "smell", "stain", "damage", "block",
    "clear", "secure", "label", "sort", "load", "unload", "carry", "lift", "store", "pack",
    "unpack", "setup", "prep", "walk", "visit", "note", "log", "record", "document",
    "measure", "count", "monitor", "investigate", "address", "resolve", "solve",
    "ensure", "allow", "provide", "include", "use", "apply", "add", "build", "cut",
    "hang", "lay", "fill", "spray", "treat", "rinse", "dry", "bag", "tag", "mark", "wax",
    "strip", "buff", "shampoo", "deep", "wear", "throw", "choose", "catch", "lose", "sell",
    "forget", "understand", "stand", "lead", "fall", "drive", "become", "grow", "pull",
    "push", "fit", "miss", "happen", "occur", "remain", "stay", "live", "die", "water",
    "remember",
];

/// Irregular past / participle forms: form -> (lemma, form).
const IRREGULAR: &[(&str, &str, VerbForm)] = &[
    ("went", "go", VerbForm::Past),
    ("gone", "go", VerbForm::Participle),
    ("made", "make", VerbForm::Past),
    ("took", "take", VerbForm::Past),
    ("taken", "take", VerbForm::Participle),
    ("got", "get", VerbForm::Past),
    ("gotten", "get", VerbForm::Participle),
    ("gave", "give", VerbForm::Past),
    ("given", "give", VerbForm::Participle),
    ("came", "come", VerbForm::Past),
    ("saw", "see", VerbForm::Past),
    ("seen", "see", VerbForm::Participle),
    ("knew", "know", VerbForm::Past),
    ("known", "know", VerbForm::Participle),
    ("sent", "send", VerbForm::Past),
    ("brought", "bring", VerbForm::Past),
    ("bought", "buy", VerbForm::Past),
    ("left", "leave", VerbForm::Past),
    ("met", "meet", VerbForm::Past),
    ("ran", "run", VerbForm::Past),
    ("found", "find", VerbForm::Past),
    ("told", "tell", VerbForm::Past),
    ("said", "say", VerbForm::Past),
    ("thought", "think", VerbForm::Past),
    ("kept", "keep", VerbForm::Past),
    ("held", "hold", VerbForm::Past),
    ("wrote", "write", VerbForm::Past),
    ("written", "write", VerbForm::Participle),
    ("broke", "break", VerbForm::Past),
    ("broken", "break", VerbForm::Participle),
    ("spoke", "speak", VerbForm::Past),
    ("spoken", "speak", VerbForm::Participle),
    ("fell", "fall", VerbForm::Past),
    ("fallen", "fall", VerbForm::Participle),
    ("felt", "feel", VerbForm::Past),
    ("paid", "pay", VerbForm::Past),
    ("lost", "lose", VerbForm::Past),
    ("began", "begin", VerbForm::Past),
    ("begun", "begin", VerbForm::Participle),
    ("drove", "drive", VerbForm::Past),
    ("driven", "drive", VerbForm::Participle),
    ("swept", "sweep", VerbForm::Past),
    ("built", "build", VerbForm::Past),
    ("hung", "hang", VerbForm::Past),
    ("forgot", "forget", VerbForm::Past),
    ("forgotten", "forget", VerbForm::Participle),
    ("stood", "stand", VerbForm::Past),
    ("understood", "understand", VerbForm::Past),
    ("led", "lead", VerbForm::Past),
    ("laid", "lay", VerbForm::Past),
    ("sold", "sell", VerbForm::Past),
    ("caught", "catch", VerbForm::Past),
    ("taught", "teach", VerbForm::Past),
    ("chose", "choose", VerbForm::Past),
    ("chosen", "choose", VerbForm::Participle),
    ("wore", "wear", VerbForm::Past),
    ("worn", "wear", VerbForm::Participle),
    ("threw", "throw", VerbForm::Past),
    ("thrown", "throw", VerbForm::Participle),
    ("became", "become", VerbForm::Past),
    ("grew", "grow", VerbForm::Past),
    ("grown", "grow", VerbForm::Participle),
    ("read", "read", VerbForm::Base),
    ("heard", "hear", VerbForm::Past),
    ("spilt", "spill", VerbForm::Past),
    ("shut", "shut", VerbForm::Base),
    ("put", "put", VerbForm::Base),
    ("set", "set", VerbForm::Base),
    ("cut", "cut", VerbForm::Base),
    ("let", "let", VerbForm::Base),
];

/// Extra entries loaded from a lexicon file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LexiconExtension {
    verbs: Vec<String>,
    nouns: Vec<String>,
    adjectives: Vec<String>,
}

/// Open-class vocabulary plus closed-class lookup.
#[derive(Debug, Clone)]
pub struct Lexicon {
    closed: HashMap<&'static str, ClosedClass>,
    verbs: HashSet<String>,
    irregular: HashMap<&'static str, (&'static str, VerbForm)>,
    noun_preferred: HashSet<String>,
    adjectives: HashSet<String>,
    adverbs: HashSet<&'static str>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Lexicon {
    /// The compiled-in lexicon.
    pub fn builtin() -> Self {
        let mut closed = HashMap::new();
        // Later groups win on overlap ("that" stays a determiner, "so" a subordinator).
        let groups: [(&[&'static str], ClosedClass); 14] = [
            (PREPOSITIONS, ClosedClass::Prep),
            (SUBORDINATORS, ClosedClass::Sconj),
            (DETERMINERS, ClosedClass::Det),
            (POSSESSIVES, ClosedClass::PossPron),
            (PRONOUNS, ClosedClass::Pron),
            (COORDINATORS, ClosedClass::Cconj),
            (MODALS, ClosedClass::Modal),
            (BE_FORMS, ClosedClass::Be),
            (HAVE_FORMS, ClosedClass::Have),
            (DO_FORMS, ClosedClass::Do),
            (NEGATIONS, ClosedClass::Neg),
            (INTERJECTIONS, ClosedClass::Intj),
            (WH_WORDS, ClosedClass::Wh),
            (&["to"][..], ClosedClass::To),
        ];
        for (words, class) in groups {
            for w in words {
                closed.insert(*w, class);
            }
        }

        Self {
            closed,
            verbs: VERBS.iter().map(|s| s.to_string()).collect(),
            irregular: IRREGULAR
                .iter()
                .map(|(form, lemma, vf)| (*form, (*lemma, *vf)))
                .collect(),
            noun_preferred: NOUN_PREFERRED.iter().map(|s| s.to_string()).collect(),
            adjectives: ADJECTIVES.iter().map(|s| s.to_string()).collect(),
            adverbs: ADVERBS.iter().copied().collect(),
        }
    }

    /// Built-in lexicon extended with entries from a TOML file.
    ///
    /// A missing or malformed file is an error: the tagger is a hard
    /// dependency and must not silently start with a partial vocabulary.
    pub fn with_extension_file(path: &Path) -> Result<Self, NlpError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NlpError::Lexicon(format!("cannot read {}: {}", path.display(), e))
        })?;
        let ext: LexiconExtension = toml::from_str(&content)
            .map_err(|e| NlpError::Lexicon(format!("{}: {}", path.display(), e)))?;

        let mut lexicon = Self::builtin();
        let added = ext.verbs.len() + ext.nouns.len() + ext.adjectives.len();
        lexicon
            .verbs
            .extend(ext.verbs.into_iter().map(|w| w.to_lowercase()));
        lexicon
            .noun_preferred
            .extend(ext.nouns.into_iter().map(|w| w.to_lowercase()));
        lexicon
            .adjectives
            .extend(ext.adjectives.into_iter().map(|w| w.to_lowercase()));
        info!(path = %path.display(), added, "Lexicon extension loaded");
        Ok(lexicon)
    }

    pub fn closed_class(&self, lower: &str) -> Option<ClosedClass> {
        self.closed.get(lower).copied()
    }

    pub fn is_adjective(&self, lower: &str) -> bool {
        self.adjectives.contains(lower)
    }

    pub fn is_adverb(&self, lower: &str) -> bool {
        self.adverbs.contains(lower)
    }

    pub fn prefers_noun(&self, lower: &str) -> bool {
        self.noun_preferred.contains(lower)
    }

    /// Whether the word is a known noun that is not also a verb.
    pub fn is_plain_noun(&self, lower: &str) -> bool {
        self.noun_preferred.contains(lower) && !self.verbs.contains(lower)
    }

    /// Analyse a lowercase word as a verb form, if it is one.
    pub fn verb_form(&self, lower: &str) -> Option<(String, VerbForm)> {
        if let Some((lemma, form)) = self.irregular.get(lower) {
            return Some((lemma.to_string(), *form));
        }
        if self.verbs.contains(lower) {
            return Some((lower.to_string(), VerbForm::Base));
        }
        if let Some(stem) = lower.strip_suffix("ing") {
            if let Some(lemma) = self.match_stem(stem) {
                return Some((lemma, VerbForm::Gerund));
            }
        }
        if let Some(stem) = lower.strip_suffix("ied") {
            let lemma = format!("{}y", stem);
            if self.verbs.contains(&lemma) {
                return Some((lemma, VerbForm::Past));
            }
        }
        if let Some(stem) = lower.strip_suffix("ed") {
            if let Some(lemma) = self.match_stem(stem) {
                return Some((lemma, VerbForm::Past));
            }
        }
        if let Some(stem) = lower.strip_suffix("ies") {
            let lemma = format!("{}y", stem);
            if self.verbs.contains(&lemma) {
                return Some((lemma, VerbForm::Third));
            }
        }
        if let Some(stem) = lower.strip_suffix("es") {
            if self.verbs.contains(stem) {
                return Some((stem.to_string(), VerbForm::Third));
            }
        }
        if let Some(stem) = lower.strip_suffix('s') {
            if self.verbs.contains(stem) {
                return Some((stem.to_string(), VerbForm::Third));
            }
        }
        None
    }

    /// Recover a verb lemma from an `-ing` / `-ed` stem: as-is, with a
    /// restored silent `e`, or with a doubled final consonant undone.
    fn match_stem(&self, stem: &str) -> Option<String> {
        if stem.len() < 2 {
            return None;
        }
        if self.verbs.contains(stem) {
            return Some(stem.to_string());
        }
        let with_e = format!("{}e", stem);
        if self.verbs.contains(&with_e) {
            return Some(with_e);
        }
        let bytes = stem.as_bytes();
        let n = bytes.len();
        if n >= 3 && bytes[n - 1] == bytes[n - 2] {
            let undoubled = &stem[..n - 1];
            if self.verbs.contains(undoubled) {
                return Some(undoubled.to_string());
            }
        }
        None
    }
}
