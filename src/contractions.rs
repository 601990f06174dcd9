//! English contraction expansion over lowercased text.

use ahash::AHashMap;
use regex::Regex;
use std::sync::OnceLock;

/// Whole-word forms that suffix rules get wrong or cannot see.
const IRREGULAR: &[(&str, &str)] = &[
    ("can't", "can not"),
    ("won't", "will not"),
    ("shan't", "shall not"),
    ("ain't", "are not"),
    ("y'all", "you all"),
    ("let's", "let us"),
    ("ma'am", "madam"),
    ("o'clock", "of the clock"),
    ("'cause", "because"),
    ("'em", "them"),
    ("it's", "it is"),
    ("that's", "that is"),
    ("what's", "what is"),
    ("there's", "there is"),
    ("here's", "here is"),
    ("he's", "he is"),
    ("she's", "she is"),
    ("who's", "who is"),
    ("where's", "where is"),
    ("when's", "when is"),
    ("why's", "why is"),
    ("how's", "how is"),
    ("everyone's", "everyone is"),
    ("somebody's", "somebody is"),
    ("someone's", "someone is"),
    ("nobody's", "nobody is"),
];

/// Apostrophe-free informal contractions.
const SLANG: &[(&str, &str)] = &[
    ("gonna", "going to"),
    ("wanna", "want to"),
    ("gotta", "got to"),
    ("gimme", "give me"),
    ("lemme", "let me"),
];

/// Peeled right to left, so stacked forms like "wouldn't've" expand fully.
const SUFFIXES: &[(&str, &str)] = &[
    ("n't", " not"),
    ("'re", " are"),
    ("'ll", " will"),
    ("'ve", " have"),
    ("'d", " would"),
    ("'m", " am"),
];

fn irregular() -> &'static AHashMap<&'static str, &'static str> {
    static MAP: OnceLock<AHashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| IRREGULAR.iter().chain(SLANG.iter()).copied().collect())
}

fn apostrophe_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:\b[a-z]+)?'[a-z]+(?:'[a-z]+)*").expect("static regex"))
}

fn slang_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:gonna|wanna|gotta|gimme|lemme)\b").expect("static regex"))
}

fn expand_word(word: &str) -> Option<String> {
    if let Some(full) = irregular().get(word) {
        return Some((*full).to_string());
    }
    for (suffix, replacement) in SUFFIXES {
        if let Some(stem) = word.strip_suffix(suffix) {
            if stem.is_empty() || stem.ends_with('\'') {
                continue;
            }
            let stem = expand_word(stem).unwrap_or_else(|| stem.to_string());
            return Some(format!("{stem}{replacement}"));
        }
    }
    None
}

/// Expand contractions in already-lowercased text. Typographic apostrophes are
/// folded to `'` first; unknown apostrophe words (possessives) pass through.
pub fn expand_contractions(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| match c {
            '\u{2019}' | '\u{2018}' | '\u{02BC}' => '\'',
            other => other,
        })
        .collect();

    let expanded = apostrophe_word_re().replace_all(&folded, |caps: &regex::Captures<'_>| {
        let word = &caps[0];
        expand_word(word).unwrap_or_else(|| word.to_string())
    });
    slang_re()
        .replace_all(&expanded, |caps: &regex::Captures<'_>| {
            let word = &caps[0];
            irregular().get(word).map_or_else(|| word.to_string(), |s| (*s).to_string())
        })
        .into_owned()
}
