//! Per-video cursor loop with bounded reply expansion, plus the multi-video driver.
//!
//! Each video is harvested into its own accumulator. The accumulator moves through
//! the state machine by value and is appended to the run's record list only once
//! the video reaches `Done` or `Aborted`, so per-video output is never interleaved.

use crate::error::FetchError;
use crate::fetch::{PageFetcher, ReplyExpander};
use crate::progress::make_count_progress;
use crate::rate_limit::RateLimiter;
use crate::record::{CommentRecord, ThreadItem};
use crate::source::CommentSource;
use ahash::AHashSet;
use std::vec::IntoIter;

/// How a single video's harvest ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VideoStatus {
    /// Cursor stream exhausted before the cap.
    Exhausted,
    /// Per-video cap reached; remaining threads/replies were discarded.
    CapReached,
    /// A fetch failed; records emitted before the failure are kept.
    Aborted(FetchError),
}

/// Per-video bookkeeping reported alongside the records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoOutcome {
    pub video_id: String,
    pub records: usize,
    pub pages_fetched: usize,
    pub reply_expansions: usize,
    /// Items whose id was already emitted for this video.
    pub repeats_skipped: usize,
    pub status: VideoStatus,
}

impl VideoOutcome {
    pub fn is_aborted(&self) -> bool {
        matches!(self.status, VideoStatus::Aborted(_))
    }
}

/// Result of a multi-video harvest: one flat, ordered record list plus outcomes.
#[derive(Clone, Debug, Default)]
pub struct HarvestReport {
    pub records: Vec<CommentRecord>,
    pub videos: Vec<VideoOutcome>,
}

impl HarvestReport {
    pub fn aborted_videos(&self) -> impl Iterator<Item = &VideoOutcome> {
        self.videos.iter().filter(|v| v.is_aborted())
    }
}

enum State {
    AwaitingPage { cursor: Option<String> },
    ProcessingPage { threads: IntoIter<ThreadItem>, next_cursor: Option<String> },
    ExpandingReplies { parent_id: String, threads: IntoIter<ThreadItem>, next_cursor: Option<String> },
    Done,
    Aborted(FetchError),
}

struct VideoAccumulator {
    video_id: String,
    limit: usize,
    records: Vec<CommentRecord>,
    seen_ids: AHashSet<String>,
    pages_fetched: usize,
    reply_expansions: usize,
    repeats_skipped: usize,
}

impl VideoAccumulator {
    fn new(video_id: &str, limit: usize) -> Self {
        Self {
            video_id: video_id.to_string(),
            limit,
            records: Vec::new(),
            seen_ids: AHashSet::new(),
            pages_fetched: 0,
            reply_expansions: 0,
            repeats_skipped: 0,
        }
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.records.len() >= self.limit
    }

    /// Append unless the id was already emitted for this video. Listings can
    /// repeat an item across a page boundary when comments arrive mid-harvest;
    /// repeats are skipped and do not count against the cap.
    fn push(&mut self, rec: CommentRecord) -> bool {
        debug_assert!(!self.is_full());
        if self.seen_ids.contains(&rec.comment_id) {
            tracing::debug!("{}: skipping repeated comment {}", self.video_id, rec.comment_id);
            self.repeats_skipped += 1;
            return false;
        }
        self.seen_ids.insert(rec.comment_id.clone());
        self.records.push(rec);
        true
    }

    fn finish(self, status: VideoStatus) -> (Vec<CommentRecord>, VideoOutcome) {
        let outcome = VideoOutcome {
            records: self.records.len(),
            video_id: self.video_id,
            pages_fetched: self.pages_fetched,
            reply_expansions: self.reply_expansions,
            repeats_skipped: self.repeats_skipped,
            status,
        };
        (self.records, outcome)
    }
}

/// Drives PageFetcher + ReplyExpander over a list of videos.
pub struct CommentHarvester<'a> {
    source: &'a mut dyn CommentSource,
    fetcher: PageFetcher,
    expander: ReplyExpander,
    limiter: RateLimiter,
    comment_limit: usize,
    progress: bool,
    label: String,
}

impl<'a> CommentHarvester<'a> {
    pub fn new(source: &'a mut dyn CommentSource) -> Self {
        Self {
            source,
            fetcher: PageFetcher::new(crate::source::MAX_PAGE_SIZE),
            expander: ReplyExpander::new(crate::source::MAX_PAGE_SIZE),
            limiter: RateLimiter::default(),
            comment_limit: 5000,
            progress: false,
            label: "Harvesting videos".to_string(),
        }
    }

    pub fn page_size(mut self, n: u32) -> Self {
        self.fetcher = PageFetcher::new(n);
        self.expander = ReplyExpander::new(n);
        self
    }
    pub fn comment_limit(mut self, n: usize) -> Self { self.comment_limit = n; self }
    pub fn rate_limiter(mut self, limiter: RateLimiter) -> Self { self.limiter = limiter; self }
    pub fn progress(mut self, yes: bool) -> Self { self.progress = yes; self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.label = label.into(); self }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Harvest every video in order. Never fails as a whole: a failing video is
    /// logged, kept up to its failure point, and the run moves on.
    pub fn harvest_all<S: AsRef<str>>(&mut self, video_ids: &[S]) -> HarvestReport {
        let pb = if self.progress {
            Some(make_count_progress(video_ids.len() as u64, &self.label))
        } else {
            None
        };

        let mut report = HarvestReport::default();
        for (i, vid) in video_ids.iter().enumerate() {
            if i > 0 {
                self.limiter.pause();
            }
            let vid = vid.as_ref();
            tracing::info!("Fetching comments for: {}", vid);
            let (mut records, outcome) = self.harvest_video(vid);
            match &outcome.status {
                VideoStatus::Aborted(e) => tracing::warn!(
                    "Error fetching comments for {}: {} (kept {} records, retryable: {})",
                    vid,
                    e,
                    outcome.records,
                    e.is_retryable()
                ),
                status => tracing::debug!("{}: {} records ({:?})", vid, outcome.records, status),
            }
            report.records.append(&mut records);
            report.videos.push(outcome);
            if let Some(pb) = &pb { pb.inc(1); }
        }
        if let Some(pb) = pb {
            pb.finish_with_message("harvest done");
        }
        tracing::info!("Total comments collected: {}", report.records.len());
        report
    }

    /// Run the per-video state machine to a terminal state.
    pub fn harvest_video(&mut self, video_id: &str) -> (Vec<CommentRecord>, VideoOutcome) {
        let mut acc = VideoAccumulator::new(video_id, self.comment_limit);
        let mut state = if acc.is_full() {
            State::Done
        } else {
            State::AwaitingPage { cursor: None }
        };

        loop {
            state = match state {
                State::AwaitingPage { cursor } => {
                    match self.fetcher.fetch(&mut *self.source, video_id, cursor.as_deref()) {
                        Ok(page) => {
                            acc.pages_fetched += 1;
                            State::ProcessingPage {
                                threads: page.items.into_iter(),
                                next_cursor: page.next_cursor,
                            }
                        }
                        Err(e) => State::Aborted(e),
                    }
                }
                State::ProcessingPage { mut threads, next_cursor } => match threads.next() {
                    Some(thread) => {
                        let replies = thread.reply_count;
                        let rec = CommentRecord::top_level(video_id, thread);
                        let parent_id = rec.comment_id.clone();
                        // a repeated thread's replies were expanded the first time
                        let fresh = acc.push(rec);
                        if acc.is_full() {
                            State::Done
                        } else if fresh && replies > 0 {
                            State::ExpandingReplies { parent_id, threads, next_cursor }
                        } else {
                            State::ProcessingPage { threads, next_cursor }
                        }
                    }
                    None => match next_cursor {
                        Some(cursor) if !acc.is_full() => State::AwaitingPage { cursor: Some(cursor) },
                        _ => State::Done,
                    },
                },
                State::ExpandingReplies { parent_id, threads, next_cursor } => {
                    match self.expander.expand(&mut *self.source, &parent_id) {
                        Ok(replies) => {
                            acc.reply_expansions += 1;
                            for reply in replies {
                                if acc.is_full() {
                                    break;
                                }
                                acc.push(CommentRecord::reply(video_id, &parent_id, reply));
                            }
                            if acc.is_full() {
                                State::Done
                            } else {
                                State::ProcessingPage { threads, next_cursor }
                            }
                        }
                        Err(e) => State::Aborted(e),
                    }
                }
                State::Done => {
                    let status = if acc.is_full() { VideoStatus::CapReached } else { VideoStatus::Exhausted };
                    return acc.finish(status);
                }
                State::Aborted(e) => return acc.finish(VideoStatus::Aborted(e)),
            };
        }
    }
}
