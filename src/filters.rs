//! Emoji strip applied after normalization to build topic-model input.

use crate::normalize::collapse_whitespace;

/// Emoji blocks removed from `clean_text` to build `clean_no_emoji`.
/// The last range is wide: it also swallows CJK and Hangul.
pub const EMOJI_RANGES: [(char, char); 6] = [
    ('\u{1F600}', '\u{1F64F}'), // emoticons
    ('\u{1F300}', '\u{1F5FF}'), // symbols & pictographs
    ('\u{1F680}', '\u{1F6FF}'), // transport & map
    ('\u{1F1E0}', '\u{1F1FF}'), // flags
    ('\u{2702}', '\u{27B0}'),   // dingbats
    ('\u{24C2}', '\u{1F251}'),  // enclosed characters
];

#[inline]
pub fn is_emoji(c: char) -> bool {
    EMOJI_RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&c))
}

/// Remove emoji from already-normalized text. Whitespace is re-collapsed so the
/// gap an emoji leaves behind does not survive as a double or trailing space.
pub fn strip_emoji(clean_text: &str) -> String {
    let kept: String = clean_text.chars().filter(|&c| !is_emoji(c)).collect();
    collapse_whitespace(&kept)
}

