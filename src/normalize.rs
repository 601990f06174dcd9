//! Deterministic, order-sensitive cleaning chain that produces `clean_text`.
//!
//! Step order matters: contractions are expanded before punctuation is stripped,
//! markup is removed before entities are decoded, and elongation is collapsed
//! before whitespace so a run of spaces is handled by the final step.

use crate::contractions::expand_contractions;
use regex::Regex;
use std::sync::OnceLock;

/// Phrases dropped from comments as promotional noise.
pub const SPAM_PHRASES: [&str; 4] = ["buy now", "click here", "subscribe", "free offer"];

/// Passes always allowed before the length-based bound applies.
const MIN_PASSES: usize = 4;

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("static regex"))
}

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"http\S+").expect("static regex"))
}

fn mention_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@\w+").expect("static regex"))
}

#[derive(Clone, Debug)]
pub struct TextNormalizer {
    spam_phrases: Vec<String>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self { spam_phrases: SPAM_PHRASES.iter().map(|s| s.to_string()).collect() }
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the spam list. Phrases are lowercased since they are matched
    /// after case folding.
    pub fn with_spam_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.spam_phrases = phrases
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    /// Clean `text`. Never fails; blank input gives an empty string.
    ///
    /// The chain is re-applied until it stops changing the text. A single pass can
    /// expose new matches (stripping punctuation from "sub!scribe" leaves a spam
    /// phrase, removing "subscribe" from "clicksubscribe here" leaves "click here"),
    /// and iterating makes `normalize(normalize(t)) == normalize(t)` hold.
    ///
    /// Passes can lengthen the text (slang expansion), so the loop is bounded by
    /// the input's character count: every extra pass needs at least one removed
    /// character to have exposed the new match.
    pub fn normalize(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        let max_passes = MIN_PASSES + text.chars().count();
        let mut current = self.normalize_once(text);
        for _ in 1..max_passes {
            let next = self.normalize_once(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn normalize_once(&self, text: &str) -> String {
        // 1-2. case fold, contractions
        let s = expand_contractions(&text.to_lowercase());
        // 3. markup, then entities
        let s = tag_re().replace_all(&s, "");
        let s = html_escape::decode_html_entities(&s).into_owned();
        // 4-5. urls, mentions
        let s = url_re().replace_all(&s, "");
        let s = mention_re().replace_all(&s, "").into_owned();
        // 6. spam
        let mut s = self.remove_spam(s);
        // 7. punctuation
        s.retain(|c| !c.is_ascii_punctuation());
        // 8-9. elongation, whitespace
        collapse_whitespace(&collapse_elongation(&s))
    }

    /// Removes phrases until none is left; a removal can join two fragments
    /// into another phrase ("subsubscribescribe").
    fn remove_spam(&self, mut s: String) -> String {
        loop {
            let mut changed = false;
            for phrase in &self.spam_phrases {
                while s.contains(phrase.as_str()) {
                    s = s.replace(phrase.as_str(), "");
                    changed = true;
                }
            }
            if !changed {
                return s;
            }
        }
    }
}

/// Clean with the default spam list.
pub fn normalize_text(text: &str) -> String {
    TextNormalizer::default().normalize(text)
}

/// Collapse every run of 3+ identical characters to one ("sooo" -> "so").
/// Lossy for words with a legitimate triple letter; runs of two are kept.
pub fn collapse_elongation(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        let mut run = 1usize;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }
        let keep = if run >= 3 { 1 } else { run };
        out.extend(std::iter::repeat(c).take(keep));
    }
    out
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
