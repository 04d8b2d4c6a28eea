//! Shallow rule-based dependency parser.
//!
//! Works on one tagged sentence at a time: picks a root (the first main
//! verb outside a subordinate clause), groups nominal chunks, and attaches
//! everything else to the nearest plausible governor. Indices in the result
//! are local to the sentence.

use crate::doc::{DepLabel, PartOfSpeech, Tag};

type Tagged = (PartOfSpeech, Tag);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    /// `None` only for an empty sentence.
    pub root: Option<usize>,
    /// `(label, head)` per token; the root is its own head.
    pub arcs: Vec<(DepLabel, usize)>,
}

pub fn parse(tags: &[Tagged]) -> Parse {
    if tags.is_empty() {
        return Parse {
            root: None,
            arcs: Vec::new(),
        };
    }

    let sub = subordinate_mask(tags);
    let root = find_root(tags, &sub);
    let mut arcs = vec![(DepLabel::Dep, root); tags.len()];
    arcs[root] = (DepLabel::Root, root);

    attach_verbs(tags, &sub, root, &mut arcs);
    attach_function_words(tags, &sub, root, &mut arcs);
    attach_chunks(tags, &sub, root, &mut arcs);

    Parse {
        root: Some(root),
        arcs,
    }
}

/// Tokens from a subordinating conjunction up to the next punctuation mark.
fn subordinate_mask(tags: &[Tagged]) -> Vec<bool> {
    let mut mask = vec![false; tags.len()];
    let mut inside = false;
    for (i, (pos, _)) in tags.iter().enumerate() {
        match pos {
            PartOfSpeech::Sconj => inside = true,
            PartOfSpeech::Punct => inside = false,
            _ => {}
        }
        mask[i] = inside;
    }
    mask
}

/// First main verb outside a subordinate clause; failing that a copula or
/// auxiliary, any verb, a noun, and finally the first non-punctuation token.
fn find_root(tags: &[Tagged], sub: &[bool]) -> usize {
    let first = |pred: &dyn Fn(usize) -> bool| (0..tags.len()).find(|&i| pred(i));
    let pos = |i: usize| tags[i].0;
    first(&|i| pos(i) == PartOfSpeech::Verb && !sub[i])
        .or_else(|| first(&|i| pos(i) == PartOfSpeech::Aux && tags[i].1 != Tag::Md && !sub[i]))
        .or_else(|| first(&|i| pos(i) == PartOfSpeech::Verb))
        .or_else(|| first(&|i| matches!(pos(i), PartOfSpeech::Noun | PartOfSpeech::Propn)))
        .or_else(|| first(&|i| pos(i) != PartOfSpeech::Punct))
        .unwrap_or(0)
}

/// Nearest preceding main verb in the same clause region, else the root.
fn governor(tags: &[Tagged], sub: &[bool], root: usize, i: usize) -> usize {
    (0..i)
        .rev()
        .find(|&j| tags[j].0 == PartOfSpeech::Verb && sub[j] == sub[i])
        .unwrap_or(root)
}

/// Nearest preceding token that is neither punctuation nor a conjunction.
fn prev_word(tags: &[Tagged], i: usize) -> Option<usize> {
    (0..i)
        .rev()
        .find(|&j| !matches!(tags[j].1, Tag::Punct | Tag::Cc))
}

fn is_nominal(tag: &Tagged) -> bool {
    matches!(
        tag.0,
        PartOfSpeech::Noun | PartOfSpeech::Propn | PartOfSpeech::Pron
    )
}

fn attach_verbs(tags: &[Tagged], sub: &[bool], root: usize, arcs: &mut [(DepLabel, usize)]) {
    for i in 0..tags.len() {
        if i == root || tags[i].0 != PartOfSpeech::Verb {
            continue;
        }

        let prev_tag = i.checked_sub(1).map(|p| tags[p]);

        // Coordination: "clean and mop", "clean, mop".
        if matches!(prev_tag, Some((_, Tag::Cc | Tag::Punct))) {
            let left = prev_word(tags, i);
            if let Some(left) = left.filter(|&l| tags[l].0 == PartOfSpeech::Verb) {
                let first = if arcs[left].0 == DepLabel::Conj {
                    arcs[left].1
                } else {
                    left
                };
                arcs[i] = (DepLabel::Conj, first);
                continue;
            }
        }

        let first_in_region = !(0..i).any(|j| tags[j].0 == PartOfSpeech::Verb && sub[j]);
        if sub[i] && first_in_region {
            arcs[i] = (DepLabel::Advcl, root);
            continue;
        }

        if matches!(prev_tag, Some((PartOfSpeech::Part, Tag::To))) {
            arcs[i] = (DepLabel::Xcomp, governor(tags, sub, root, i));
            continue;
        }

        // A verb with its own subject starts a coordinated clause.
        let before = (0..i).rev().find(|&j| {
            !matches!(
                tags[j].0,
                PartOfSpeech::Aux | PartOfSpeech::Adv | PartOfSpeech::Part
            )
        });
        let has_subject = before.is_some_and(|b| is_nominal(&tags[b]));
        let gov = governor(tags, sub, root, i);
        arcs[i] = if has_subject || gov > i {
            (DepLabel::Conj, gov)
        } else {
            (DepLabel::Xcomp, gov)
        };
    }
}

fn attach_function_words(
    tags: &[Tagged],
    sub: &[bool],
    root: usize,
    arcs: &mut [(DepLabel, usize)],
) {
    let next_verb = |i: usize| {
        (i + 1..tags.len())
            .take_while(|&j| tags[j].0 != PartOfSpeech::Punct)
            .find(|&j| tags[j].0 == PartOfSpeech::Verb)
    };

    for i in 0..tags.len() {
        if i == root {
            continue;
        }
        let (pos, tag) = tags[i];
        arcs[i] = match (pos, tag) {
            (PartOfSpeech::Aux, _) | (PartOfSpeech::Part, Tag::To) => {
                (DepLabel::Aux, next_verb(i).unwrap_or(root))
            }
            (PartOfSpeech::Part, Tag::Rb) => (DepLabel::Neg, next_verb(i).unwrap_or(root)),
            (PartOfSpeech::Intj, _) => (DepLabel::Intj, root),
            (PartOfSpeech::Punct, _) => (DepLabel::Punct, root),
            (PartOfSpeech::Sconj, _) => {
                let verb = (i + 1..tags.len())
                    .find(|&j| sub[j] && tags[j].0 == PartOfSpeech::Verb);
                (DepLabel::Mark, verb.unwrap_or(root))
            }
            (PartOfSpeech::Cconj, _) => (DepLabel::Cc, prev_word(tags, i).unwrap_or(root)),
            (PartOfSpeech::Adv, _) => {
                let verb = (0..i)
                    .rev()
                    .find(|&j| tags[j].0 == PartOfSpeech::Verb)
                    .or_else(|| next_verb(i));
                (DepLabel::Advmod, verb.unwrap_or(root))
            }
            (PartOfSpeech::Adp, _) => (DepLabel::Prep, governor(tags, sub, root, i)),
            _ => continue,
        };
    }
}

fn chunk_member(tag: &Tagged) -> bool {
    matches!(
        tag.0,
        PartOfSpeech::Det
            | PartOfSpeech::Adj
            | PartOfSpeech::Num
            | PartOfSpeech::Noun
            | PartOfSpeech::Propn
    ) || tag.1 == Tag::PrpS
}

/// Split into nominal chunks: runs of determiners, possessives, adjectives,
/// numbers and nouns, with a new chunk at every determiner. Standalone
/// pronouns form their own chunk.
fn chunks(tags: &[Tagged]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < tags.len() {
        if tags[i].0 == PartOfSpeech::Pron && tags[i].1 != Tag::PrpS {
            out.push((i, i));
            i += 1;
            continue;
        }
        if !chunk_member(&tags[i]) {
            i += 1;
            continue;
        }
        let start = i;
        i += 1;
        while i < tags.len()
            && chunk_member(&tags[i])
            && !matches!(tags[i].1, Tag::Dt | Tag::PrpS)
        {
            i += 1;
        }
        out.push((start, i - 1));
    }
    out
}

fn attach_chunks(tags: &[Tagged], sub: &[bool], root: usize, arcs: &mut [(DepLabel, usize)]) {
    let mut has_object = vec![false; tags.len()];

    for (start, end) in chunks(tags) {
        let head = (start..=end)
            .rev()
            .find(|&j| is_nominal(&tags[j]))
            .or_else(|| (start..=end).rev().find(|&j| tags[j].0 == PartOfSpeech::Num))
            .unwrap_or(end);

        for j in start..=end {
            if j == head || j == root {
                continue;
            }
            let label = match tags[j] {
                (_, Tag::PrpS) => DepLabel::Poss,
                (PartOfSpeech::Det, _) => DepLabel::Det,
                (PartOfSpeech::Adj, _) => DepLabel::Amod,
                (PartOfSpeech::Num, _) => DepLabel::Nummod,
                _ => DepLabel::Compound,
            };
            arcs[j] = (label, head);
        }

        if head == root {
            continue;
        }

        let before = start.checked_sub(1);
        if let Some(b) = before.filter(|&b| matches!(tags[b], (PartOfSpeech::Adp, _))) {
            arcs[head] = (DepLabel::Pobj, b);
            continue;
        }

        let gov = (0..start)
            .rev()
            .find(|&j| tags[j].0 == PartOfSpeech::Verb && sub[j] == sub[start])
            .or_else(|| (root < start).then_some(root));
        if let Some(g) = gov.filter(|&g| tags[g].0 == PartOfSpeech::Verb && !has_object[g]) {
            has_object[g] = true;
            arcs[head] = (DepLabel::Dobj, g);
            continue;
        }

        // A chunk before its verb is the subject; skip past auxiliaries to the main verb.
        let next = (end + 1..tags.len())
            .take_while(|&j| tags[j].1 != Tag::Cc)
            .find(|&j| matches!(tags[j].0, PartOfSpeech::Verb | PartOfSpeech::Aux));
        if let Some(n) = next {
            let main = (n..tags.len())
                .take_while(|&j| {
                    matches!(
                        tags[j].0,
                        PartOfSpeech::Verb
                            | PartOfSpeech::Aux
                            | PartOfSpeech::Adv
                            | PartOfSpeech::Part
                    )
                })
                .find(|&j| tags[j].0 == PartOfSpeech::Verb)
                .unwrap_or(n);
            arcs[head] = (DepLabel::Nsubj, main);
            continue;
        }

        arcs[head] = (DepLabel::Dep, gov.unwrap_or(root));
    }
}
