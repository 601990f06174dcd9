//! Language tagging through an external identifier.

/// Tag written when detection fails or the text is blank.
pub const UNKNOWN_LANG: &str = "unknown";

/// An external probabilistic language identifier.
///
/// Returns a short tag (ISO 639-1 where one exists) or `None` when the text
/// could not be classified.
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Option<String>;
}

/// Tag `raw_text`, downgrading any failure to [`UNKNOWN_LANG`]. Detector tags
/// are trimmed and lowercased so `" EN"` and `"en"` filter the same way.
pub fn detect_language(detector: &dyn LanguageDetector, raw_text: &str) -> String {
    if raw_text.trim().is_empty() {
        return UNKNOWN_LANG.to_string();
    }
    match detector.detect(raw_text) {
        Some(tag) if !tag.trim().is_empty() => normalize_tag(&tag),
        _ => UNKNOWN_LANG.to_string(),
    }
}

/// Canonical form of a language tag: trimmed, ASCII-lowercased.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}

/// `whatlang`-backed detector. Always reports its best guess, reliable or not.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text)?;
        Some(iso639_1(info.lang().code()).to_string())
    }
}

/// Map whatlang's ISO 639-3 codes onto the two-letter tags downstream filters use.
/// Codes without a mapping pass through unchanged.
fn iso639_1(code: &'static str) -> &'static str {
    match code {
        "eng" => "en",
        "spa" => "es",
        "fra" => "fr",
        "deu" => "de",
        "ita" => "it",
        "por" => "pt",
        "nld" => "nl",
        "rus" => "ru",
        "ukr" => "uk",
        "pol" => "pl",
        "tur" => "tr",
        "ara" => "ar",
        "hin" => "hi",
        "jpn" => "ja",
        "kor" => "ko",
        "cmn" => "zh",
        "ind" => "id",
        "vie" => "vi",
        "swe" => "sv",
        "dan" => "da",
        "fin" => "fi",
        "ces" => "cs",
        "ron" => "ro",
        "hun" => "hu",
        "ell" => "el",
        "heb" => "he",
        "tha" => "th",
        "pes" => "fa",
        other => other,
    }
}
