use crate::lang::normalize_tag;
use crate::source::MAX_PAGE_SIZE;
use std::time::Duration;

/// Environment variable the binary reads the platform API key from.
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct HarvestOptions {
    pub comment_limit: usize,         // per-video cap on records (threads + replies)
    pub page_size: u32,               // 1..=100 items per listing request
    pub video_delay: Duration,        // fixed pause between consecutive videos
    pub target_language: String,      // corpus keeps only this tag
    pub parallelism: Option<usize>,   // Some(N) to set rayon threads, None to use default
    pub progress: bool,               // show progress bar
    pub progress_label: Option<String>,

    // IO tuning for snapshots/exports
    pub read_buffer_bytes: usize,
    pub write_buffer_bytes: usize,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            comment_limit: 5000,
            page_size: MAX_PAGE_SIZE,
            video_delay: Duration::from_secs(1),
            target_language: "en".to_string(),
            parallelism: None,
            progress: true,
            progress_label: None,

            read_buffer_bytes: 256 * 1024,
            write_buffer_bytes: 256 * 1024,
        }
    }
}

impl HarvestOptions {
    pub fn with_comment_limit(mut self, n: usize) -> Self {
        self.comment_limit = n;
        self
    }
    pub fn with_page_size(mut self, n: u32) -> Self {
        self.page_size = n.clamp(1, MAX_PAGE_SIZE);
        self
    }
    pub fn with_video_delay(mut self, delay: Duration) -> Self {
        self.video_delay = delay;
        self
    }
    pub fn with_target_language(mut self, tag: impl AsRef<str>) -> Self {
        self.target_language = normalize_tag(tag.as_ref());
        self
    }
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }
}
