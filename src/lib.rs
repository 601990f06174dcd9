mod config;
mod date;
mod error;
mod record;
mod source;

mod fetch;
mod rate_limit;
mod harvest;
mod progress;
mod youtube;

mod contractions;
mod normalize;
mod lang;
mod filters;
mod dedupe;
mod sizing;
mod corpus;
mod analysis;

mod util;
mod ndjson;
mod export;
mod pipeline;

pub use crate::config::{HarvestOptions, API_KEY_ENV};
pub use crate::date::{parse_published, published_parts, PublishedParts};
pub use crate::error::{FetchError, PreprocessError};
pub use crate::record::{CommentRecord, ReplyItem, ReplyPage, ThreadItem, ThreadPage};
pub use crate::source::{CommentSource, MAX_PAGE_SIZE};

// Harvest state machine and its collaborators.
pub use crate::fetch::{PageFetcher, ReplyExpander};
pub use crate::rate_limit::RateLimiter;
pub use crate::harvest::{CommentHarvester, HarvestReport, VideoOutcome, VideoStatus};
pub use crate::youtube::{YouTubeApi, DEFAULT_BASE_URL};

// Text cleaning, language tagging, filtering.
pub use crate::contractions::expand_contractions;
pub use crate::normalize::{collapse_elongation, normalize_text, TextNormalizer, SPAM_PHRASES};
pub use crate::lang::{detect_language, normalize_tag, LanguageDetector, WhatlangDetector, UNKNOWN_LANG};
pub use crate::filters::{is_emoji, strip_emoji, EMOJI_RANGES};
pub use crate::dedupe::dedupe_first_by;
pub use crate::sizing::{select_params, ClusterParams};
pub use crate::corpus::{preprocess, Corpus, CorpusRecord, CorpusStats};

// Handoff to external analytic services.
pub use crate::analysis::{
    is_question, top_ngrams, QuestionReport, Sentiment, SentimentClassifier, TopicAssignment,
    TopicModel, TopicSummary, OUTLIER_TOPIC, TOPIC_STOPWORDS,
};

// Snapshots/exports and progress.
pub use crate::export::{load_raw, save_raw, ExportFormat};
pub use crate::ndjson::{NdjsonReader, NdjsonWriter};
pub use crate::progress::set_global_multiprogress;
pub use crate::util::init_tracing_once;

pub use crate::pipeline::{CommentETL, PipelineOutput};
