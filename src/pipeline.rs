use crate::config::HarvestOptions;
use crate::corpus::{preprocess, Corpus};
use crate::export::ExportFormat;
use crate::harvest::{CommentHarvester, HarvestReport, VideoOutcome};
use crate::lang::LanguageDetector;
use crate::normalize::TextNormalizer;
use crate::rate_limit::RateLimiter;
use crate::record::CommentRecord;
use crate::sizing::ClusterParams;
use crate::source::CommentSource;
use crate::util::init_tracing_once;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

/// Builder-style entry point: harvest, preprocess, export.
#[derive(Clone, Default)]
pub struct CommentETL {
    pub(crate) opts: HarvestOptions,
    normalizer: TextNormalizer,
}

/// What the core hands to the analytic services. The raw records live on only
/// inside the corpus; call [`CommentETL::harvest`] directly to keep a snapshot.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub videos: Vec<VideoOutcome>,
    pub corpus: Corpus,
    pub params: ClusterParams,
}

impl CommentETL {
    pub fn new() -> Self {
        Self::default()
    }

    // -------- Builder methods --------
    pub fn comment_limit(mut self, n: usize) -> Self { self.opts = self.opts.with_comment_limit(n); self }
    pub fn page_size(mut self, n: u32) -> Self { self.opts = self.opts.with_page_size(n); self }
    pub fn video_delay(mut self, d: Duration) -> Self { self.opts = self.opts.with_video_delay(d); self }
    pub fn target_language(mut self, tag: impl AsRef<str>) -> Self { self.opts = self.opts.with_target_language(tag); self }
    pub fn parallelism(mut self, threads: usize) -> Self { self.opts = self.opts.with_parallelism(threads); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self { self.opts = self.opts.with_io_buffers(read_bytes, write_bytes); self }
    pub fn spam_phrases<I, S>(mut self, phrases: I) -> Self where I: IntoIterator<Item = S>, S: AsRef<str> {
        self.normalizer = self.normalizer.with_spam_phrases(phrases); self
    }

    pub fn options(&self) -> &HarvestOptions {
        &self.opts
    }

    fn init_runtime(&self) {
        init_tracing_once();
        if let Some(n) = self.opts.parallelism {
            if n > 0 { rayon::ThreadPoolBuilder::new().num_threads(n).build_global().ok(); }
        }
    }

    /// Harvest `video_ids` in order. Per-video failures are absorbed into the report.
    pub fn harvest<S: AsRef<str>>(&self, source: &mut dyn CommentSource, video_ids: &[S]) -> HarvestReport {
        self.init_runtime();
        let mut harvester = CommentHarvester::new(source)
            .page_size(self.opts.page_size)
            .comment_limit(self.opts.comment_limit)
            .rate_limiter(RateLimiter::new(self.opts.video_delay))
            .progress(self.opts.progress);
        if let Some(label) = &self.opts.progress_label {
            harvester = harvester.progress_label(label.clone());
        }
        harvester.harvest_all(video_ids)
    }

    /// Normalize, tag, filter and dedup a harvest.
    pub fn preprocess(&self, records: Vec<CommentRecord>, detector: &dyn LanguageDetector) -> Result<Corpus> {
        self.init_runtime();
        let corpus = preprocess(records, &self.normalizer, detector, &self.opts.target_language)
            .context("preprocessing harvested comments")?;
        Ok(corpus)
    }

    /// Harvest then preprocess, and pick clustering parameters for the result.
    pub fn run<S: AsRef<str>>(
        &self,
        source: &mut dyn CommentSource,
        detector: &dyn LanguageDetector,
        video_ids: &[S],
    ) -> Result<PipelineOutput> {
        let HarvestReport { records, videos } = self.harvest(source, video_ids);
        let corpus = self.preprocess(records, detector)?;
        let params = corpus.cluster_params();
        Ok(PipelineOutput { videos, corpus, params })
    }

    pub fn save_raw(&self, records: &[CommentRecord], path: &Path) -> Result<usize> {
        crate::export::save_raw(records, path, self.opts.write_buffer_bytes)
    }

    pub fn load_raw(&self, path: &Path) -> Result<Vec<CommentRecord>> {
        crate::export::load_raw(path, self.opts.read_buffer_bytes)
    }

    pub fn export_corpus(&self, corpus: &Corpus, path: &Path, format: ExportFormat) -> Result<usize> {
        corpus.export(path, format, self.opts.write_buffer_bytes)
    }
}
