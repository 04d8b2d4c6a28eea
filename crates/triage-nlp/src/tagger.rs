//! Lexicon-driven part-of-speech tagger with left-to-right context rules.

use crate::doc::{PartOfSpeech, Tag};
use crate::lexicon::{ClosedClass, Lexicon, VerbForm};

/// Object pronouns: a base verb right after one of these is an infinitive
/// ("let me know"), not a finite verb.
const OBJECT_PRONOUNS: &[&str] = &["me", "us", "them", "him"];

/// Adverbs that modify the next word rather than the clause ("very clean").
const DEGREE_ADVERBS: &[&str] = &[
    "very", "really", "extremely", "completely", "fully", "somewhat", "almost", "too", "so",
];

const SYMBOLS: &[char] = &['$', '#', '%', '@', '+', '=', '<', '>', '*', '~', '^', '|'];

type Tagged = (PartOfSpeech, Tag);

/// Assigns a coarse and a fine tag to every token of a sentence.
#[derive(Debug, Clone, Default)]
pub struct Tagger {
    lexicon: Lexicon,
}

impl Tagger {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Tag one sentence given its surface words.
    pub fn tag(&self, words: &[&str]) -> Vec<Tagged> {
        let lowers: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let mut out: Vec<Tagged> = Vec::with_capacity(words.len());
        for i in 0..words.len() {
            let tagged = self.tag_one(words, &lowers, &out, i);
            out.push(tagged);
        }
        self.promote_main_aux(&lowers, &mut out);
        out
    }

    fn tag_one(&self, words: &[&str], lowers: &[String], out: &[Tagged], i: usize) -> Tagged {
        let word = words[i];
        let lower = lowers[i].as_str();
        let prev = i.checked_sub(1);
        let prev_tag = prev.map(|p| out[p].1);

        // "Clinic A": a lone capital letter after a proper noun is part of the name.
        if word == "A" && prev_tag == Some(Tag::Nnp) {
            return (PartOfSpeech::Propn, Tag::Nnp);
        }

        if let Some(class) = self.lexicon.closed_class(lower) {
            return self.tag_closed(class, lowers, out, i);
        }

        if !word.chars().any(char::is_alphanumeric) {
            return if word.chars().any(|c| SYMBOLS.contains(&c)) {
                (PartOfSpeech::Sym, Tag::Other)
            } else {
                (PartOfSpeech::Punct, Tag::Punct)
            };
        }

        if word.starts_with(|c: char| c.is_ascii_digit()) {
            return (PartOfSpeech::Num, Tag::Cd);
        }

        let form = self.lexicon.verb_form(lower).map(|(_, f)| f);
        let is_adj = self.lexicon.is_adjective(lower);
        let prefers_noun = self.lexicon.prefers_noun(lower);
        let next_lower = lowers.get(i + 1).map(String::as_str);

        // After a modal, "to", or an auxiliary.
        if let Some(f) = form {
            if let Some(p) = prev_skipping_adverbs(out, i) {
                match (self.lexicon.closed_class(&lowers[p]), f) {
                    (
                        Some(ClosedClass::Modal | ClosedClass::To | ClosedClass::Do),
                        VerbForm::Base,
                    ) => {
                        return (PartOfSpeech::Verb, Tag::Vb);
                    }
                    (Some(ClosedClass::Be), VerbForm::Gerund) => {
                        return (PartOfSpeech::Verb, Tag::Vbg);
                    }
                    (
                        Some(ClosedClass::Be | ClosedClass::Have),
                        VerbForm::Past | VerbForm::Participle,
                    ) => {
                        return (PartOfSpeech::Verb, Tag::Vbn);
                    }
                    _ => {}
                }
            }
        }

        // Inside a noun phrase: after a determiner, possessive, adjective or number.
        if matches!(prev_tag, Some(Tag::Dt | Tag::PrpS | Tag::Jj | Tag::Cd)) {
            if is_adj && (!prefers_noun || self.next_is_open_word(next_lower)) {
                return (PartOfSpeech::Adj, Tag::Jj);
            }
            return self.noun(word, lower, out, i);
        }

        // Clause-initial base verbs are imperatives unless the word is the
        // subject of a following finite verb ("Staff needs gloves").
        if self.is_clause_start(lowers, out, i) {
            if let Some(f) = form {
                let subject_of_next = self.next_is_finite(next_lower);
                let bare_noun = prefers_noun && self.next_ends_noun_phrase(next_lower);
                if !subject_of_next && !bare_noun {
                    match f {
                        VerbForm::Base => return (PartOfSpeech::Verb, Tag::Vb),
                        VerbForm::Gerund if !prefers_noun => {
                            return (PartOfSpeech::Verb, Tag::Vbg)
                        }
                        VerbForm::Past | VerbForm::Participle => {
                            return (PartOfSpeech::Verb, Tag::Vbd)
                        }
                        _ => {}
                    }
                }
            }
        }

        // After a subject.
        if let (Some(f), Some(p)) = (form, prev) {
            let prev_lower = lowers[p].as_str();
            let prev_is_pron = prev_tag == Some(Tag::Prp);
            if prev_is_pron && OBJECT_PRONOUNS.contains(&prev_lower) && f == VerbForm::Base {
                return (PartOfSpeech::Verb, Tag::Vb);
            }
            if prev_is_pron || matches!(prev_tag, Some(Tag::Nn | Tag::Nns | Tag::Nnp)) {
                match f {
                    VerbForm::Third => return (PartOfSpeech::Verb, Tag::Vbz),
                    VerbForm::Past | VerbForm::Participle => {
                        return (PartOfSpeech::Verb, Tag::Vbd)
                    }
                    VerbForm::Gerund if prev_is_pron || !prefers_noun => {
                        return (PartOfSpeech::Verb, Tag::Vbg)
                    }
                    VerbForm::Base
                        if prev_is_pron || !prefers_noun || self.next_starts_object(next_lower) =>
                    {
                        return (PartOfSpeech::Verb, Tag::Vbp)
                    }
                    _ => {}
                }
            }
        }

        // Coordinated verbs share the reading of the left conjunct.
        if let (Some(f), Some(Tag::Cc)) = (form, prev_tag) {
            let left = prev.and_then(|p| p.checked_sub(1)).map(|l| out[l].1);
            if let Some(left) = left.filter(Tag::is_verb_form) {
                let tag = match f {
                    VerbForm::Base if matches!(left, Tag::Vb | Tag::Vbp) => Some(left),
                    VerbForm::Third => Some(Tag::Vbz),
                    VerbForm::Past | VerbForm::Participle => Some(Tag::Vbd),
                    VerbForm::Gerund => Some(Tag::Vbg),
                    _ => None,
                };
                if let Some(tag) = tag {
                    return (PartOfSpeech::Verb, tag);
                }
            }
        }

        if self.lexicon.is_adverb(lower) {
            return (PartOfSpeech::Adv, Tag::Rb);
        }
        if is_adj {
            return (PartOfSpeech::Adj, Tag::Jj);
        }

        match form {
            Some(VerbForm::Gerund) if !prefers_noun => (PartOfSpeech::Verb, Tag::Vbg),
            Some(VerbForm::Past | VerbForm::Participle) if !prefers_noun => {
                (PartOfSpeech::Verb, Tag::Vbn)
            }
            Some(VerbForm::Base)
                if !prefers_noun && prev_tag.as_ref().is_some_and(Tag::is_verb_form) =>
            {
                (PartOfSpeech::Verb, Tag::Vb)
            }
            _ => {
                if lower.len() > 3 && lower.ends_with("ly") {
                    (PartOfSpeech::Adv, Tag::Rb)
                } else {
                    self.noun(word, lower, out, i)
                }
            }
        }
    }

    fn tag_closed(&self, class: ClosedClass, lowers: &[String], out: &[Tagged], i: usize) -> Tagged {
        let lower = lowers[i].as_str();
        match class {
            ClosedClass::Det => (PartOfSpeech::Det, Tag::Dt),
            ClosedClass::PossPron => (PartOfSpeech::Pron, Tag::PrpS),
            ClosedClass::Pron => (PartOfSpeech::Pron, Tag::Prp),
            ClosedClass::Prep => (PartOfSpeech::Adp, Tag::In),
            ClosedClass::To => {
                let before_verb = lowers
                    .get(i + 1)
                    .and_then(|n| self.lexicon.verb_form(n))
                    .is_some_and(|(_, f)| f == VerbForm::Base);
                if before_verb {
                    (PartOfSpeech::Part, Tag::To)
                } else {
                    (PartOfSpeech::Adp, Tag::To)
                }
            }
            ClosedClass::Cconj => (PartOfSpeech::Cconj, Tag::Cc),
            ClosedClass::Sconj => (PartOfSpeech::Sconj, Tag::In),
            ClosedClass::Modal => (PartOfSpeech::Aux, Tag::Md),
            ClosedClass::Be => {
                let tag = match lower {
                    "is" | "isn't" => Tag::Vbz,
                    "am" | "are" | "aren't" => Tag::Vbp,
                    "was" | "were" | "wasn't" | "weren't" => Tag::Vbd,
                    "been" => Tag::Vbn,
                    "being" => Tag::Vbg,
                    _ => Tag::Vb,
                };
                (PartOfSpeech::Aux, tag)
            }
            ClosedClass::Have => {
                let tag = match lower {
                    "has" | "hasn't" => Tag::Vbz,
                    "had" | "hadn't" => Tag::Vbd,
                    "having" => Tag::Vbg,
                    _ => {
                        let after_modal = prev_skipping_adverbs(out, i)
                            .is_some_and(|p| matches!(out[p].1, Tag::Md | Tag::To));
                        if after_modal {
                            Tag::Vb
                        } else {
                            Tag::Vbp
                        }
                    }
                };
                (PartOfSpeech::Aux, tag)
            }
            ClosedClass::Do => {
                let tag = match lower {
                    "does" | "doesn't" => Tag::Vbz,
                    "did" | "didn't" => Tag::Vbd,
                    _ => Tag::Vbp,
                };
                (PartOfSpeech::Aux, tag)
            }
            ClosedClass::Neg => (PartOfSpeech::Part, Tag::Rb),
            ClosedClass::Intj => (PartOfSpeech::Intj, Tag::Uh),
            ClosedClass::Wh => match lower {
                "what" | "who" | "whom" | "which" => (PartOfSpeech::Pron, Tag::Wh),
                _ => (PartOfSpeech::Adv, Tag::Wh),
            },
        }
    }

    fn noun(&self, word: &str, lower: &str, out: &[Tagged], i: usize) -> Tagged {
        let capitalized = word.starts_with(char::is_uppercase);
        let sentence_initial = prev_significant(out, i).is_none();
        if capitalized && !sentence_initial && !self.lexicon.is_plain_noun(lower) {
            return (PartOfSpeech::Propn, Tag::Nnp);
        }
        let plural = lower.len() > 3
            && lower.ends_with('s')
            && !["ss", "us", "is"].iter().any(|s| lower.ends_with(s));
        if plural {
            (PartOfSpeech::Noun, Tag::Nns)
        } else {
            (PartOfSpeech::Noun, Tag::Nn)
        }
    }

    /// Start of a clause: sentence start, right after `:`/`;`/`(`, after a
    /// comma ending a subordinate clause, or after an interjection such as
    /// "please". Other commas and clause adverbs ("kindly", "also") in
    /// between are skipped.
    fn is_clause_start(&self, lowers: &[String], out: &[Tagged], i: usize) -> bool {
        let mut j = i;
        while j > 0 {
            j -= 1;
            match lowers[j].as_str() {
                // a comma closing a subordinate clause ("If it leaks, call ...")
                "," if out[..j].iter().any(|(p, _)| *p == PartOfSpeech::Sconj) => return true,
                "," => continue,
                ":" | ";" | "(" | "-" => return true,
                w if out[j].1 == Tag::Rb && !DEGREE_ADVERBS.contains(&w) => continue,
                _ => return out[j].1 == Tag::Uh,
            }
        }
        true
    }

    /// The next word looks like a finite verb, making the current word its subject.
    fn next_is_finite(&self, next: Option<&str>) -> bool {
        let Some(next) = next else { return false };
        match self.lexicon.closed_class(next) {
            Some(ClosedClass::Be | ClosedClass::Have | ClosedClass::Modal | ClosedClass::Do) => {
                true
            }
            Some(_) => false,
            None => matches!(
                self.lexicon.verb_form(next),
                Some((_, VerbForm::Third | VerbForm::Past))
            ),
        }
    }

    /// Nothing that could be an object follows: a preposition, punctuation,
    /// or the end of the sentence.
    fn next_ends_noun_phrase(&self, next: Option<&str>) -> bool {
        match next {
            None => true,
            Some(n) if !n.chars().any(char::is_alphanumeric) => true,
            Some(n) => self.lexicon.closed_class(n) == Some(ClosedClass::Prep),
        }
    }

    fn next_starts_object(&self, next: Option<&str>) -> bool {
        next.and_then(|n| self.lexicon.closed_class(n)).is_some_and(|c| {
            matches!(
                c,
                ClosedClass::Det | ClosedClass::PossPron | ClosedClass::Pron | ClosedClass::To
            )
        })
    }

    fn next_is_open_word(&self, next: Option<&str>) -> bool {
        next.is_some_and(|n| {
            n.chars().any(char::is_alphabetic) && self.lexicon.closed_class(n).is_none()
        })
    }

    /// "have"/"do" with no verb after them in the sentence are main verbs.
    fn promote_main_aux(&self, lowers: &[String], out: &mut [Tagged]) {
        for i in 0..out.len() {
            if out[i].0 != PartOfSpeech::Aux {
                continue;
            }
            let class = self.lexicon.closed_class(&lowers[i]);
            if !matches!(class, Some(ClosedClass::Have | ClosedClass::Do)) {
                continue;
            }
            let verb_follows = out[i + 1..]
                .iter()
                .any(|(pos, _)| *pos == PartOfSpeech::Verb);
            if !verb_follows {
                out[i].0 = PartOfSpeech::Verb;
            }
        }
    }
}

fn prev_significant(out: &[Tagged], i: usize) -> Option<usize> {
    (0..i).rev().find(|&j| out[j].1 != Tag::Punct)
}

fn prev_skipping_adverbs(out: &[Tagged], i: usize) -> Option<usize> {
    (0..i)
        .rev()
        .find(|&j| !matches!(out[j].1, Tag::Punct | Tag::Rb))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(sentence: &str) -> Vec<(String, PartOfSpeech, Tag)> {
        let words: Vec<&str> = crate::tokenize::tokenize(sentence)
            .into_iter()
            .map(|t| t.text)
            .collect();
        let tagged = Tagger::default().tag(&words);
        words
            .iter()
            .zip(tagged)
            .map(|(w, (p, t))| (w.to_string(), p, t))
            .collect()
    }

    fn tag_of(sentence: &str, word: &str) -> (PartOfSpeech, Tag) {
        tags(sentence)
            .into_iter()
            .find(|(w, _, _)| w == word)
            .map(|(_, p, t)| (p, t))
            .unwrap()
    }

    #[test]
    fn test_imperative_after_please() {
        let s = "Please clean the lobby floor before noon.";
        assert_eq!(tag_of(s, "Please"), (PartOfSpeech::Intj, Tag::Uh));
        assert_eq!(tag_of(s, "clean"), (PartOfSpeech::Verb, Tag::Vb));
        assert_eq!(tag_of(s, "the"), (PartOfSpeech::Det, Tag::Dt));
        assert_eq!(tag_of(s, "lobby"), (PartOfSpeech::Noun, Tag::Nn));
        assert_eq!(tag_of(s, "floor"), (PartOfSpeech::Noun, Tag::Nn));
        assert_eq!(tag_of(s, "before"), (PartOfSpeech::Adp, Tag::In));
        assert_eq!(tag_of(s, "noon"), (PartOfSpeech::Noun, Tag::Nn));
        assert_eq!(tag_of(s, "."), (PartOfSpeech::Punct, Tag::Punct));
    }

    #[test]
    fn test_imperative_after_colon() {
        let s = "URGENT: need coverage at Clinic A by tomorrow 3pm";
        assert_eq!(tag_of(s, "URGENT"), (PartOfSpeech::Adj, Tag::Jj));
        assert_eq!(tag_of(s, "need"), (PartOfSpeech::Verb, Tag::Vb));
        assert_eq!(tag_of(s, "coverage"), (PartOfSpeech::Noun, Tag::Nn));
        assert_eq!(tag_of(s, "Clinic"), (PartOfSpeech::Propn, Tag::Nnp));
        assert_eq!(tag_of(s, "A"), (PartOfSpeech::Propn, Tag::Nnp));
        assert_eq!(tag_of(s, "3pm"), (PartOfSpeech::Num, Tag::Cd));
    }

    #[test]
    fn test_subject_then_finite_verb() {
        let s = "The staff needs more gloves";
        assert_eq!(tag_of(s, "staff"), (PartOfSpeech::Noun, Tag::Nn));
        assert_eq!(tag_of(s, "needs"), (PartOfSpeech::Verb, Tag::Vbz));
        assert_eq!(tag_of(s, "gloves"), (PartOfSpeech::Noun, Tag::Nns));

        let s = "Staff needs gloves";
        assert_eq!(tag_of(s, "Staff"), (PartOfSpeech::Noun, Tag::Nn));
        assert_eq!(tag_of(s, "needs"), (PartOfSpeech::Verb, Tag::Vbz));
    }

    #[test]
    fn test_pronoun_subject_and_infinitive() {
        let s = "We need to schedule a meeting";
        assert_eq!(tag_of(s, "We"), (PartOfSpeech::Pron, Tag::Prp));
        assert_eq!(tag_of(s, "need"), (PartOfSpeech::Verb, Tag::Vbp));
        assert_eq!(tag_of(s, "to"), (PartOfSpeech::Part, Tag::To));
        assert_eq!(tag_of(s, "schedule"), (PartOfSpeech::Verb, Tag::Vb));
        assert_eq!(tag_of(s, "meeting"), (PartOfSpeech::Noun, Tag::Nn));
    }

    #[test]
    fn test_modal_and_passive() {
        let s = "You must fix it";
        assert_eq!(tag_of(s, "must"), (PartOfSpeech::Aux, Tag::Md));
        assert_eq!(tag_of(s, "fix"), (PartOfSpeech::Verb, Tag::Vb));

        let s = "The sink was cleaned";
        assert_eq!(tag_of(s, "was"), (PartOfSpeech::Aux, Tag::Vbd));
        assert_eq!(tag_of(s, "cleaned"), (PartOfSpeech::Verb, Tag::Vbn));
    }

    #[test]
    fn test_object_pronoun_then_base_verb() {
        assert_eq!(tag_of("Let me know", "know"), (PartOfSpeech::Verb, Tag::Vb));
    }

    #[test]
    fn test_coordinated_imperatives() {
        let s = "Mop and sweep the hallway";
        assert_eq!(tag_of(s, "Mop"), (PartOfSpeech::Verb, Tag::Vb));
        assert_eq!(tag_of(s, "and"), (PartOfSpeech::Cconj, Tag::Cc));
        assert_eq!(tag_of(s, "sweep"), (PartOfSpeech::Verb, Tag::Vb));
    }

    #[test]
    fn test_noun_headline() {
        let s = "Leak in the basement";
        assert_eq!(tag_of(s, "Leak"), (PartOfSpeech::Noun, Tag::Nn));
        let s = "Meeting tomorrow at 3";
        assert_eq!(tag_of(s, "Meeting"), (PartOfSpeech::Noun, Tag::Nn));
    }

    #[test]
    fn test_imperative_after_leading_adverb() {
        let s = "Kindly restock the gloves in room 4";
        assert_eq!(tag_of(s, "Kindly"), (PartOfSpeech::Adv, Tag::Rb));
        assert_eq!(tag_of(s, "restock"), (PartOfSpeech::Verb, Tag::Vb));
        assert_eq!(tag_of(s, "gloves"), (PartOfSpeech::Noun, Tag::Nns));

        assert_eq!(tag_of("Kindly clean the lobby.", "clean"), (PartOfSpeech::Verb, Tag::Vb));
        assert_eq!(tag_of("Also please mop the stairs", "mop"), (PartOfSpeech::Verb, Tag::Vb));
        assert_eq!(tag_of("Never mop the stairs wet", "mop"), (PartOfSpeech::Verb, Tag::Vb));
    }

    #[test]
    fn test_degree_adverb_keeps_adjective() {
        assert_eq!(tag_of("Very clean floors today", "clean"), (PartOfSpeech::Adj, Tag::Jj));
    }

    #[test]
    fn test_noun_verb_word_before_determiner_is_imperative() {
        let s = "Water the plants.";
        assert_eq!(tag_of(s, "Water"), (PartOfSpeech::Verb, Tag::Vb));
        assert_eq!(tag_of(s, "plants"), (PartOfSpeech::Noun, Tag::Nns));

        let s = "Remember to lock the doors tonight.";
        assert_eq!(tag_of(s, "Remember"), (PartOfSpeech::Verb, Tag::Vb));
        assert_eq!(tag_of(s, "to"), (PartOfSpeech::Part, Tag::To));
        assert_eq!(tag_of(s, "lock"), (PartOfSpeech::Verb, Tag::Vb));

        // still a noun when it is the subject
        assert_eq!(tag_of("Water is leaking", "Water"), (PartOfSpeech::Noun, Tag::Nn));
    }

    #[test]
    fn test_have_as_main_verb() {
        assert_eq!(tag_of("We have a leak", "have"), (PartOfSpeech::Verb, Tag::Vbp));
        assert_eq!(tag_of("We have cleaned it", "have"), (PartOfSpeech::Aux, Tag::Vbp));
    }

    #[test]
    fn test_unknown_words() {
        assert_eq!(tag_of("Check the HVAC quickly", "quickly"), (PartOfSpeech::Adv, Tag::Rb));
        assert_eq!(tag_of("Check the HVAC quickly", "HVAC"), (PartOfSpeech::Propn, Tag::Nnp));
        assert_eq!(tag_of("Order extra towels", "towels"), (PartOfSpeech::Noun, Tag::Nns));
    }
}
