#![allow(dead_code)]

use cetl::{
    CommentRecord, CommentSource, FetchError, LanguageDetector, ReplyItem, ReplyPage, ThreadItem,
    ThreadPage,
};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub const TS: &str = "2023-05-01T12:34:56Z";

pub fn thread(id: &str, text: &str, reply_count: u64) -> ThreadItem {
    ThreadItem {
        id: id.to_string(),
        published_at: TS.to_string(),
        like_count: 1,
        text: text.to_string(),
        reply_count,
    }
}

pub fn reply(id: &str, parent: &str, text: &str) -> ReplyItem {
    ReplyItem {
        id: id.to_string(),
        parent_id: Some(parent.to_string()),
        published_at: TS.to_string(),
        like_count: 0,
        text: text.to_string(),
    }
}

/// `n` top-level threads `{prefix}-{i}` with no replies.
pub fn threads(prefix: &str, n: usize) -> Vec<ThreadItem> {
    (0..n).map(|i| thread(&format!("{prefix}-{i}"), &format!("{prefix} comment {i}"), 0)).collect()
}

/// In-memory comment platform: each video's threads are served in pages of the
/// requested size, cursors are stringified offsets. Failures can be scripted per
/// (video, page index) and per reply parent.
#[derive(Default)]
pub struct ScriptedSource {
    pub videos: HashMap<String, Vec<ThreadItem>>,
    pub replies: HashMap<String, Vec<ReplyItem>>,
    pub fail_pages: HashMap<(String, usize), FetchError>,
    pub fail_replies: HashMap<String, FetchError>,
    pub thread_calls: Vec<(String, Option<String>)>,
    pub reply_calls: Vec<String>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video(mut self, video_id: &str, items: Vec<ThreadItem>) -> Self {
        self.videos.insert(video_id.to_string(), items);
        self
    }

    pub fn with_replies(mut self, parent: &str, items: Vec<ReplyItem>) -> Self {
        self.replies.insert(parent.to_string(), items);
        self
    }

    pub fn fail_page(mut self, video_id: &str, page_index: usize, err: FetchError) -> Self {
        self.fail_pages.insert((video_id.to_string(), page_index), err);
        self
    }

    pub fn fail_replies_for(mut self, parent: &str, err: FetchError) -> Self {
        self.fail_replies.insert(parent.to_string(), err);
        self
    }

    pub fn thread_calls_for(&self, video_id: &str) -> usize {
        self.thread_calls.iter().filter(|(v, _)| v == video_id).count()
    }
}

impl CommentSource for ScriptedSource {
    fn list_threads(
        &mut self,
        video_id: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<ThreadPage, FetchError> {
        self.thread_calls.push((video_id.to_string(), cursor.map(str::to_string)));
        let offset: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let page_index = offset / page_size as usize;
        if let Some(err) = self.fail_pages.get(&(video_id.to_string(), page_index)) {
            return Err(err.clone());
        }
        let all = self
            .videos
            .get(video_id)
            .ok_or_else(|| FetchError::Http { status: 404, message: format!("no video {video_id}") })?;
        let end = (offset + page_size as usize).min(all.len());
        let items = all[offset..end].to_vec();
        let next_cursor = if end < all.len() { Some(end.to_string()) } else { None };
        Ok(ThreadPage { items, next_cursor })
    }

    fn list_replies(&mut self, parent_id: &str, page_size: u32) -> Result<ReplyPage, FetchError> {
        self.reply_calls.push(parent_id.to_string());
        if let Some(err) = self.fail_replies.get(parent_id) {
            return Err(err.clone());
        }
        let items = self
            .replies
            .get(parent_id)
            .map(|r| r.iter().take(page_size as usize).cloned().collect())
            .unwrap_or_default();
        Ok(ReplyPage { items })
    }
}

/// Detector that tags by exact text, falling back to `default` (None = failure).
pub struct MapDetector {
    pub tags: HashMap<String, String>,
    pub default: Option<String>,
}

impl MapDetector {
    pub fn all(tag: &str) -> Self {
        Self { tags: HashMap::new(), default: Some(tag.to_string()) }
    }

    pub fn tag(mut self, text: &str, tag: &str) -> Self {
        self.tags.insert(text.to_string(), tag.to_string());
        self
    }
}

impl LanguageDetector for MapDetector {
    fn detect(&self, text: &str) -> Option<String> {
        self.tags.get(text).cloned().or_else(|| self.default.clone())
    }
}

pub fn record(video: &str, id: &str, parent: Option<&str>, text: &str) -> CommentRecord {
    CommentRecord {
        video_id: video.to_string(),
        comment_id: id.to_string(),
        parent_id: parent.map(str::to_string),
        published_at: TS.to_string(),
        like_count: 3,
        text: text.to_string(),
    }
}

/// Read a text file line-by-line (skips empty lines).
pub fn read_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    BufReader::new(f).lines().map(|l| l.unwrap()).filter(|s| !s.is_empty()).collect()
}

/// Decompress a `.zst` file and collect its non-empty lines.
pub fn decompress_zst_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    let dec = zstd::stream::read::Decoder::new(f).unwrap();
    BufReader::new(dec).lines().map(|l| l.unwrap()).filter(|s| !s.is_empty()).collect()
}
