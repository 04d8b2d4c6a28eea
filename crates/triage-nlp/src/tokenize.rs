//! Word tokenization and sentence segmentation.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

/// A token before tagging: a slice of the source text and its byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken<'a> {
    pub text: &'a str,
    pub span: Range<usize>,
}

/// Abbreviations whose trailing period never ends a sentence.
const TITLES: &[&str] = &[
    "mr", "mrs", "ms", "dr", "st", "prof", "no", "vs", "etc", "e.g", "i.e", "approx", "dept",
    "bldg", "rm", "ste", "jr", "sr", "ext", "apt",
];

/// Clock suffixes: a period after these ends the sentence only when the
/// next word is capitalized ("at 3 p.m. Then ..." vs "at 3 p.m. tomorrow").
const CLOCK_SUFFIXES: &[&str] = &["a.m", "p.m"];

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"[\p{L}\p{N}]+(?:['’]\p{L}+)*(?:[:./\-][\p{L}\p{N}]+)*(?:['’]\p{L}+)*|[.!?]+|[^\s\p{L}\p{N}]",
        )
        .expect("Invalid token regex")
    })
}

/// Split text into word, number and punctuation tokens.
///
/// Internal periods, colons, slashes and hyphens stay inside a token so that
/// "3:30", "12/05/2026", "p.m" and "follow-up" survive intact.
pub fn tokenize(text: &str) -> Vec<RawToken<'_>> {
    token_regex()
        .find_iter(text)
        .map(|m| RawToken {
            text: m.as_str(),
            span: m.start()..m.end(),
        })
        .collect()
}

fn is_terminal(tok: &str) -> bool {
    !tok.is_empty() && tok.chars().all(|c| matches!(c, '.' | '!' | '?'))
}

fn is_closer(tok: &str) -> bool {
    matches!(tok, "\"" | "'" | ")" | "]" | "”" | "’")
}

fn starts_uppercase(tok: &str) -> bool {
    tok.chars().next().is_some_and(|c| c.is_uppercase())
}

/// Group tokens into sentences, returning token index ranges.
///
/// A sentence ends after `.`, `!` or `?` (plus any closing quotes or
/// brackets) unless the period belongs to a known abbreviation, and at any
/// line break between tokens.
pub fn segment(text: &str, tokens: &[RawToken<'_>]) -> Vec<Range<usize>> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < tokens.len() {
        let tok = &tokens[i];
        let mut end = i + 1;

        let mut boundary = false;
        if is_terminal(tok.text) {
            let prev = i
                .checked_sub(1)
                .filter(|p| tokens[*p].span.end == tok.span.start)
                .map(|p| tokens[p].text.to_lowercase());
            let next = tokens.get(i + 1);
            boundary = match prev.as_deref() {
                Some(p) if tok.text == "." && TITLES.contains(&p) => false,
                Some(p) if tok.text == "." && CLOCK_SUFFIXES.contains(&p) => {
                    next.map_or(true, |n| starts_uppercase(n.text))
                }
                _ => true,
            };
            if boundary {
                while end < tokens.len() && is_closer(tokens[end].text) {
                    end += 1;
                }
            }
        }

        if !boundary {
            if let Some(next) = tokens.get(i + 1) {
                boundary = text[tok.span.end..next.span.start].contains('\n');
            }
        }

        if boundary && end < tokens.len() {
            sentences.push(start..end);
            start = end;
        }
        i = end;
    }

    if start < tokens.len() {
        sentences.push(start..tokens.len());
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(tokens: &[RawToken<'a>]) -> Vec<&'a str> {
        tokens.iter().map(|t| t.text).collect()
    }

    fn sentence_strings(text: &str) -> Vec<String> {
        let tokens = tokenize(text);
        segment(text, &tokens)
            .into_iter()
            .map(|r| {
                let s = tokens[r.start].span.start;
                let e = tokens[r.end - 1].span.end;
                text[s..e].to_string()
            })
            .collect()
    }

    #[test]
    fn test_tokenize_words_and_punct() {
        let tokens = tokenize("Please clean the lobby floor before noon.");
        assert_eq!(
            texts(&tokens),
            vec!["Please", "clean", "the", "lobby", "floor", "before", "noon", "."]
        );
        assert_eq!(tokens[1].span, 7..12);
    }

    #[test]
    fn test_tokenize_keeps_times_and_dates() {
        let tokens = tokenize("Meet at 3:30 on 12/05/2026, not 3pm.");
        let t = texts(&tokens);
        assert!(t.contains(&"3:30"));
        assert!(t.contains(&"12/05/2026"));
        assert!(t.contains(&"3pm"));
        assert!(t.contains(&","));
    }

    #[test]
    fn test_tokenize_contractions_and_hyphens() {
        let t = texts(&tokenize("Don't skip the follow-up"));
        assert_eq!(t, vec!["Don't", "skip", "the", "follow-up"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n ").is_empty());
    }

    #[test]
    fn test_segment_basic() {
        let s = sentence_strings("First sentence. Second sentence! Third sentence? Remainder");
        assert_eq!(
            s,
            vec!["First sentence.", "Second sentence!", "Third sentence?", "Remainder"]
        );
    }

    #[test]
    fn test_segment_abbreviations() {
        let s = sentence_strings("Dr. Patel called. Room 4 is ready.");
        assert_eq!(s, vec!["Dr. Patel called.", "Room 4 is ready."]);
    }

    #[test]
    fn test_segment_clock_suffix() {
        let s = sentence_strings("Meet at 3 p.m. tomorrow in the lobby.");
        assert_eq!(s.len(), 1);
        let s = sentence_strings("Meet at 3 p.m. Bring the keys.");
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_segment_newlines() {
        let s = sentence_strings("URGENT: spill in hallway\ncall facilities");
        assert_eq!(s, vec!["URGENT: spill in hallway", "call facilities"]);
    }

    #[test]
    fn test_segment_closing_quote() {
        let s = sentence_strings("He said \"done.\" Then left.");
        assert_eq!(s.len(), 2);
        assert!(s[0].ends_with('"'));
    }

    #[test]
    fn test_segment_ellipsis_and_mixed() {
        let s = sentence_strings("Wait... what?! Okay.");
        assert_eq!(s.len(), 3);
    }
}
