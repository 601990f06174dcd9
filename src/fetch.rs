//! PageFetcher and ReplyExpander: one request each, validated, no retries.

use crate::error::FetchError;
use crate::record::{ReplyItem, ThreadPage};
use crate::source::{CommentSource, MAX_PAGE_SIZE};

/// Wraps one thread-listing call.
#[derive(Clone, Copy, Debug)]
pub struct PageFetcher {
    page_size: u32,
}

impl PageFetcher {
    pub fn new(page_size: u32) -> Self {
        Self { page_size: page_size.clamp(1, MAX_PAGE_SIZE) }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Fetch the page after `cursor` (or the first page when `None`).
    /// An empty `next_cursor` string is treated the same as an absent one.
    pub fn fetch(
        &self,
        source: &mut dyn CommentSource,
        video_id: &str,
        cursor: Option<&str>,
    ) -> Result<ThreadPage, FetchError> {
        let mut page = source.list_threads(video_id, self.page_size, cursor)?;
        if page.items.len() > self.page_size as usize {
            return Err(FetchError::Malformed(format!(
                "thread page for {video_id} has {} items, page size is {}",
                page.items.len(),
                self.page_size
            )));
        }
        if page.next_cursor.as_deref().is_some_and(str::is_empty) {
            page.next_cursor = None;
        }
        tracing::debug!(
            "fetched {} threads for {} (more: {})",
            page.items.len(),
            video_id,
            page.next_cursor.is_some()
        );
        Ok(page)
    }
}

/// Fetches a single bounded page of replies for a parent thread.
/// Further reply pages are never followed.
#[derive(Clone, Copy, Debug)]
pub struct ReplyExpander {
    page_size: u32,
}

impl ReplyExpander {
    pub fn new(page_size: u32) -> Self {
        Self { page_size: page_size.clamp(1, MAX_PAGE_SIZE) }
    }

    /// Returned replies always carry `parent_id == Some(parent_id)`.
    pub fn expand(
        &self,
        source: &mut dyn CommentSource,
        parent_id: &str,
    ) -> Result<Vec<ReplyItem>, FetchError> {
        let page = source.list_replies(parent_id, self.page_size)?;
        if page.items.len() > self.page_size as usize {
            return Err(FetchError::Malformed(format!(
                "reply page for {parent_id} has {} items, page size is {}",
                page.items.len(),
                self.page_size
            )));
        }
        let mut items = page.items;
        for reply in items.iter_mut() {
            match reply.parent_id.as_deref() {
                None => reply.parent_id = Some(parent_id.to_string()),
                Some(p) if p == parent_id => {}
                Some(other) => {
                    return Err(FetchError::Malformed(format!(
                        "reply {} reports parent {other}, expected {parent_id}",
                        reply.id
                    )));
                }
            }
        }
        Ok(items)
    }
}
