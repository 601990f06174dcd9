//! Preprocessing: harvested records -> clean, English-only, de-duplicated corpus.
//!
//! Stage order is fixed: timestamps are validated up front, then every record is
//! normalized and language-tagged, then the language filter runs, then exact-text
//! dedup, then the emoji strip for topic-model input.

use crate::date::{published_parts, PublishedParts};
use crate::dedupe::dedupe_first_by;
use crate::error::PreprocessError;
use crate::filters::strip_emoji;
use crate::lang::{detect_language, normalize_tag, LanguageDetector};
use crate::normalize::TextNormalizer;
use crate::record::CommentRecord;
use crate::sizing::{select_params, ClusterParams};
use rayon::prelude::*;
use serde::Serialize;

/// A harvested record plus the fields each preprocessing stage owns.
///
/// Derived fields are written once, when the record is built, and are read-only
/// afterwards. `sentiment` and `topic` belong to the external analytic services
/// and are written only through [`Corpus`] handoff methods.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CorpusRecord {
    #[serde(flatten)]
    raw: CommentRecord,
    #[serde(flatten)]
    published: PublishedParts,
    clean_text: String,
    lang: String,
    clean_no_emoji: String,
    pub(crate) sentiment: Option<String>,
    pub(crate) topic: Option<i64>,
}

impl CorpusRecord {
    pub fn raw(&self) -> &CommentRecord { &self.raw }
    pub fn text(&self) -> &str { &self.raw.text }
    pub fn video_id(&self) -> &str { &self.raw.video_id }
    pub fn comment_id(&self) -> &str { &self.raw.comment_id }
    pub fn published(&self) -> PublishedParts { self.published }
    pub fn clean_text(&self) -> &str { &self.clean_text }
    pub fn lang(&self) -> &str { &self.lang }
    pub fn clean_no_emoji(&self) -> &str { &self.clean_no_emoji }
    pub fn sentiment(&self) -> Option<&str> { self.sentiment.as_deref() }
    pub fn topic(&self) -> Option<i64> { self.topic }
}

/// Counters describing what preprocessing kept and dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub harvested: usize,
    pub language_dropped: usize,
    pub duplicates_dropped: usize,
    pub retained: usize,
}

/// The clean corpus handed to the analytic services.
#[derive(Clone, Debug)]
pub struct Corpus {
    pub(crate) records: Vec<CorpusRecord>,
    stats: CorpusStats,
}

impl Corpus {
    pub fn records(&self) -> &[CorpusRecord] { &self.records }
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
    pub fn stats(&self) -> CorpusStats { self.stats }

    /// Clustering hyperparameters for the whole corpus.
    pub fn cluster_params(&self) -> ClusterParams {
        select_params(self.records.len())
    }
}

/// Turn a harvest into a clean corpus.
///
/// Fails (rather than defaulting) when there is nothing to process or when any
/// `published_at` cannot be parsed, since the date-derived columns depend on it.
pub fn preprocess(
    records: Vec<CommentRecord>,
    normalizer: &TextNormalizer,
    detector: &dyn LanguageDetector,
    target_language: &str,
) -> Result<Corpus, PreprocessError> {
    if records.is_empty() {
        return Err(PreprocessError::EmptyHarvest);
    }
    let harvested = records.len();

    let mut parts = Vec::with_capacity(harvested);
    for rec in &records {
        match published_parts(&rec.published_at) {
            Some(p) => parts.push(p),
            None => {
                return Err(PreprocessError::MalformedTimestamp {
                    comment_id: rec.comment_id.clone(),
                    value: rec.published_at.clone(),
                })
            }
        }
    }

    // Pure per-record work; indexed collect keeps harvest order.
    let mut tagged: Vec<CorpusRecord> = records
        .into_par_iter()
        .zip(parts.into_par_iter())
        .map(|(raw, published)| {
            let clean_text = normalizer.normalize(&raw.text);
            let lang = detect_language(detector, &raw.text);
            CorpusRecord {
                raw,
                published,
                clean_text,
                lang,
                clean_no_emoji: String::new(),
                sentiment: None,
                topic: None,
            }
        })
        .collect();

    let target = normalize_tag(target_language);
    let before_lang = tagged.len();
    tagged.retain(|r| r.lang == target);
    let language_dropped = before_lang - tagged.len();

    let duplicates_dropped = dedupe_first_by(&mut tagged, |r| r.raw.text.as_str());

    for r in tagged.iter_mut() {
        r.clean_no_emoji = strip_emoji(&r.clean_text);
    }

    let stats = CorpusStats {
        harvested,
        language_dropped,
        duplicates_dropped,
        retained: tagged.len(),
    };
    tracing::info!(
        "English comments: {} (harvested {}, other-language {}, duplicates {})",
        stats.retained,
        stats.harvested,
        stats.language_dropped,
        stats.duplicates_dropped
    );
    Ok(Corpus { records: tagged, stats })
}
