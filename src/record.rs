//! Harvested comment records and the wire-level items they are built from.

use serde::{Deserialize, Serialize};

/// One top-level thread as returned by a thread listing page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreadItem {
    pub id: String,
    pub published_at: String,
    pub like_count: u64,
    pub text: String,
    pub reply_count: u64,
}

/// One reply as returned by a reply listing page.
/// `parent_id` is whatever the payload reported; the expander checks it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyItem {
    pub id: String,
    pub parent_id: Option<String>,
    pub published_at: String,
    pub like_count: u64,
    pub text: String,
}

/// One page of top-level threads. `next_cursor == None` means end of stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThreadPage {
    pub items: Vec<ThreadItem>,
    pub next_cursor: Option<String>,
}

/// The single page of replies fetched for a parent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplyPage {
    pub items: Vec<ReplyItem>,
}

/// A harvested comment or reply, exactly as the source reported it.
///
/// Reply-ness is derived from `parent_id`, so the two can never disagree.
/// On the wire (snapshots, exports) an explicit `is_reply` column is written
/// and checked against `parent_id` when read back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RawRow", try_from = "RawRow")]
pub struct CommentRecord {
    pub video_id: String,
    pub comment_id: String,
    pub parent_id: Option<String>,
    pub published_at: String,
    pub like_count: u64,
    pub text: String,
}

impl CommentRecord {
    pub fn top_level(video_id: &str, item: ThreadItem) -> Self {
        Self {
            video_id: video_id.to_string(),
            comment_id: item.id,
            parent_id: None,
            published_at: item.published_at,
            like_count: item.like_count,
            text: item.text,
        }
    }

    pub fn reply(video_id: &str, parent_id: &str, item: ReplyItem) -> Self {
        Self {
            video_id: video_id.to_string(),
            comment_id: item.id,
            parent_id: Some(parent_id.to_string()),
            published_at: item.published_at,
            like_count: item.like_count,
            text: item.text,
        }
    }

    #[inline]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

#[derive(Serialize, Deserialize)]
struct RawRow {
    video_id: String,
    comment_id: String,
    parent_id: Option<String>,
    is_reply: bool,
    published_at: String,
    like_count: u64,
    text: String,
}

impl From<CommentRecord> for RawRow {
    fn from(r: CommentRecord) -> Self {
        Self {
            is_reply: r.is_reply(),
            video_id: r.video_id,
            comment_id: r.comment_id,
            parent_id: r.parent_id,
            published_at: r.published_at,
            like_count: r.like_count,
            text: r.text,
        }
    }
}

impl TryFrom<RawRow> for CommentRecord {
    type Error = String;

    fn try_from(row: RawRow) -> Result<Self, Self::Error> {
        if row.is_reply != row.parent_id.is_some() {
            return Err(format!(
                "comment {}: is_reply={} disagrees with parent_id={:?}",
                row.comment_id, row.is_reply, row.parent_id
            ));
        }
        Ok(Self {
            video_id: row.video_id,
            comment_id: row.comment_id,
            parent_id: row.parent_id,
            published_at: row.published_at,
            like_count: row.like_count,
            text: row.text,
        })
    }
}
