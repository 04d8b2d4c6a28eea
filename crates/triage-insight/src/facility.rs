use regex::Regex;
use tracing::warn;
use triage_core::config::FacilityConfig;

/// A compiled whole-word, case-insensitive pattern and the facility it names.
struct Pattern {
    re: Regex,
    facility: String,
}

impl Pattern {
    fn compile(keyword: &str, facility: &str) -> Option<Self> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return None;
        }
        match Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword))) {
            Ok(re) => Some(Self {
                re,
                facility: facility.to_string(),
            }),
            Err(e) => {
                warn!(keyword, error = %e, "Skipping facility keyword");
                None
            }
        }
    }
}

/// Infers which configured facility a piece of text refers to.
pub struct FacilityMatcher {
    names: Vec<Pattern>,
    aliases: Vec<Pattern>,
    default: Option<String>,
}

impl FacilityMatcher {
    pub fn from_config(config: &FacilityConfig) -> Self {
        Self {
            names: config
                .names
                .iter()
                .filter_map(|n| Pattern::compile(n, n))
                .collect(),
            aliases: config
                .aliases
                .iter()
                .filter_map(|(k, v)| Pattern::compile(k, v))
                .collect(),
            default: config.default.clone(),
        }
    }

    /// A matcher that never infers anything.
    pub fn empty() -> Self {
        Self::from_config(&FacilityConfig::default())
    }

    /// Facility for `sentence`, searched in order: configured names in the
    /// sentence, names in the whole message, aliases in the message, then the
    /// configured default.
    pub fn infer(&self, sentence: &str, message: &str) -> Option<String> {
        Self::first_match(&self.names, sentence)
            .or_else(|| Self::first_match(&self.names, message))
            .or_else(|| Self::first_match(&self.aliases, message))
            .or_else(|| self.default.clone())
    }

    fn first_match(patterns: &[Pattern], text: &str) -> Option<String> {
        patterns
            .iter()
            .find(|p| p.re.is_match(text))
            .map(|p| p.facility.clone())
    }
}

impl Default for FacilityMatcher {
    fn default() -> Self {
        Self::empty()
    }
}
