//! Handoff to the external analytic services and the tabular summaries built
//! from their labels. Nothing here trains a model or draws a chart.

use crate::corpus::Corpus;
use crate::sizing::{select_params, ClusterParams};
use ahash::AHashMap;
use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Topic id the clusterer uses for documents it assigns to no cluster.
pub const OUTLIER_TOPIC: i64 = -1;

/// Extra stop-words for the topic vectorizer: channel chatter that would
/// otherwise dominate every cluster.
pub const TOPIC_STOPWORDS: [&str; 20] = [
    "video", "channel", "subscribe", "like", "watch", "good", "great", "nice", "love", "thanks",
    "thank", "misha", "togg", "car", "cool", "amazing", "awesome", "bro", "dude", "wow",
];

/// Stop-words added to the English list for n-gram counts.
pub const NGRAM_EXTRA_STOPWORDS: [&str; 7] = ["video", "channel", "subscribe", "like", "watch", "togg", "car"];

const QUESTION_LEADS: &str = "what|how|why|where|when|who|can|is|does|are|should|do|will|could";

/// One label from the sentiment classifier.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sentiment {
    pub label: String,
    pub score: f32,
}

/// External sentiment classification model.
pub trait SentimentClassifier {
    fn classify(&self, text: &str) -> Result<Sentiment>;
}

/// Per-document output of the topic clusterer, aligned with its input.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TopicAssignment {
    pub topics: Vec<i64>,
    pub probabilities: Vec<f32>,
}

/// External topic-clustering service (embedding, reduction, density clustering).
pub trait TopicModel {
    fn fit(&mut self, documents: &[&str], params: ClusterParams) -> Result<TopicAssignment>;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopicSummary {
    pub documents: usize,
    pub params: ClusterParams,
    pub topics_found: usize,
    pub outliers: usize,
    pub outlier_ratio_pct: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuestionReport {
    pub questions: usize,
    pub ratio_pct: f64,
    /// Up to ten (topic, question count) pairs, most questions first, outliers excluded.
    pub top_topics: Vec<(i64, usize)>,
}

fn question_lead_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"^(?:{QUESTION_LEADS})\b")).expect("static regex"))
}

/// A question ends with (or contains) `?`, or opens with an interrogative/auxiliary.
pub fn is_question(raw_text: &str) -> bool {
    raw_text.contains('?') || question_lead_re().is_match(&raw_text.to_lowercase())
}

impl Corpus {
    /// Label every record's `clean_text`. Any classifier error aborts the pass
    /// and leaves earlier labels in place.
    pub fn apply_sentiment(&mut self, classifier: &dyn SentimentClassifier) -> Result<()> {
        for rec in self.records.iter_mut() {
            let s = classifier
                .classify(rec.clean_text())
                .with_context(|| format!("classifying comment {}", rec.comment_id()))?;
            rec.sentiment = Some(s.label);
        }
        Ok(())
    }

    /// Label counts, most frequent first (ties by label).
    pub fn sentiment_distribution(&self) -> Vec<(String, usize)> {
        let mut counts: AHashMap<&str, usize> = AHashMap::new();
        for s in self.records.iter().filter_map(|r| r.sentiment()) {
            *counts.entry(s).or_default() += 1;
        }
        let mut out: Vec<(String, usize)> = counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out
    }

    /// Send `clean_no_emoji` of every non-blank record to the clusterer and write
    /// back its topic ids. Parameters are chosen from the number of documents sent.
    pub fn apply_topics(&mut self, model: &mut dyn TopicModel) -> Result<TopicSummary> {
        let idx: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.clean_no_emoji().trim().is_empty())
            .map(|(i, _)| i)
            .collect();
        if idx.is_empty() {
            bail!("no non-empty documents to cluster");
        }
        let docs: Vec<&str> = idx.iter().map(|&i| self.records[i].clean_no_emoji()).collect();
        let params = select_params(docs.len());
        tracing::info!(
            "Topic modeling {} documents (min_cluster_size={}, min_samples={})",
            docs.len(),
            params.min_cluster_size,
            params.min_samples
        );
        let assignment = model.fit(&docs, params).context("topic model fit")?;
        let n_docs = docs.len();
        drop(docs);
        if assignment.topics.len() != n_docs {
            bail!(
                "topic model returned {} assignments for {} documents",
                assignment.topics.len(),
                n_docs
            );
        }

        for (&i, &t) in idx.iter().zip(assignment.topics.iter()) {
            self.records[i].topic = Some(t);
        }

        let mut distinct: Vec<i64> = assignment.topics.clone();
        distinct.sort_unstable();
        distinct.dedup();
        let outliers = assignment.topics.iter().filter(|&&t| t == OUTLIER_TOPIC).count();
        let summary = TopicSummary {
            documents: n_docs,
            params,
            topics_found: distinct.len(),
            outliers,
            outlier_ratio_pct: outliers as f64 / n_docs as f64 * 100.0,
        };
        tracing::info!("Topics found: {}", summary.topics_found);
        tracing::info!("Outlier ratio: {:.1}%", summary.outlier_ratio_pct);
        Ok(summary)
    }

    /// For each topic, the share of each sentiment label among its records.
    /// Only records carrying both labels count; each row sums to 1.
    pub fn topic_sentiment_shares(&self) -> BTreeMap<i64, BTreeMap<String, f64>> {
        let mut counts: BTreeMap<i64, BTreeMap<String, usize>> = BTreeMap::new();
        for r in &self.records {
            if let (Some(t), Some(s)) = (r.topic(), r.sentiment()) {
                *counts.entry(t).or_default().entry(s.to_string()).or_default() += 1;
            }
        }
        counts
            .into_iter()
            .map(|(topic, row)| {
                let total: usize = row.values().sum();
                let shares = row.into_iter().map(|(label, n)| (label, n as f64 / total as f64)).collect();
                (topic, shares)
            })
            .collect()
    }

    pub fn question_report(&self) -> QuestionReport {
        let questions: Vec<_> = self.records.iter().filter(|r| is_question(r.text())).collect();
        let ratio_pct = if self.records.is_empty() {
            0.0
        } else {
            questions.len() as f64 / self.records.len() as f64 * 100.0
        };

        let mut per_topic: AHashMap<i64, usize> = AHashMap::new();
        for t in questions.iter().filter_map(|r| r.topic()).filter(|&t| t != OUTLIER_TOPIC) {
            *per_topic.entry(t).or_default() += 1;
        }
        let mut top_topics: Vec<(i64, usize)> = per_topic.into_iter().collect();
        top_topics.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_topics.truncate(10);

        tracing::info!("Question ratio: {:.2}%", ratio_pct);
        QuestionReport { questions: questions.len(), ratio_pct, top_topics }
    }

    /// Most common `n`-grams over `clean_text`, stop-words removed before grouping.
    pub fn top_ngrams(&self, n: usize, top_n: usize) -> Vec<(Vec<String>, usize)> {
        top_ngrams(self.records.iter().map(|r| r.clean_text()), n, top_n)
    }
}

pub fn top_ngrams<'a>(
    texts: impl IntoIterator<Item = &'a str>,
    n: usize,
    top_n: usize,
) -> Vec<(Vec<String>, usize)> {
    if n == 0 {
        return Vec::new();
    }
    let mut counts: AHashMap<Vec<String>, (usize, usize)> = AHashMap::new(); // gram -> (count, first seen)
    let mut order = 0usize;
    for text in texts {
        let words: Vec<String> = text
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|w| !is_ngram_stopword(w))
            .collect();
        for gram in words.windows(n) {
            let e = counts.entry(gram.to_vec()).or_insert((0, order));
            e.0 += 1;
            order += 1;
        }
    }
    let mut out: Vec<(Vec<String>, (usize, usize))> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then_with(|| a.1 .1.cmp(&b.1 .1)));
    out.into_iter().take(top_n).map(|(g, (c, _))| (g, c)).collect()
}

fn is_ngram_stopword(w: &str) -> bool {
    ENGLISH_STOPWORDS.binary_search(&w).is_ok() || NGRAM_EXTRA_STOPWORDS.contains(&w)
}

/// Common English function words, sorted for binary search.
const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "done", "down",
    "due", "during", "each", "eg", "either", "else", "elsewhere", "enough", "etc", "even", "ever",
    "every", "everyone", "everything", "everywhere", "except", "few", "for", "former",
    "formerly", "from", "further", "get", "give", "go", "had", "has", "have", "he", "hence",
    "her", "here", "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him",
    "himself", "his", "how", "however", "i", "ie", "if", "in", "indeed", "into", "is", "it",
    "its", "itself", "just", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mine", "more", "moreover", "most",
    "mostly", "much", "must", "my", "myself", "namely", "neither", "never", "nevertheless",
    "next", "no", "nobody", "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of",
    "off", "often", "on", "once", "one", "only", "onto", "or", "other", "others", "otherwise",
    "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps", "please", "put",
    "rather", "re", "same", "see", "seem", "seemed", "seeming", "seems", "several", "she",
    "should", "since", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "than", "that", "the", "their", "them",
    "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore", "therein",
    "thereupon", "these", "they", "this", "those", "though", "through", "throughout", "thru",
    "thus", "to", "together", "too", "toward", "towards", "under", "until", "up", "upon", "us",
    "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon",
    "wherever", "whether", "which", "while", "whither", "who", "whoever", "whole", "whom",
    "whose", "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours",
    "yourself", "yourselves",
];
