//! The narrow seam to the commenting platform.

use crate::error::FetchError;
use crate::record::{ReplyPage, ThreadPage};

/// Hard ceiling the platform applies to one listing request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A paginated comment listing service.
///
/// Implementations perform exactly one request per call and never retry;
/// retry policy, if any, belongs to the caller.
pub trait CommentSource {
    /// List top-level threads for `video_id`, resuming after `cursor` when given.
    fn list_threads(
        &mut self,
        video_id: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<ThreadPage, FetchError>;

    /// List the first page of replies under `parent_id`.
    fn list_replies(&mut self, parent_id: &str, page_size: u32) -> Result<ReplyPage, FetchError>;
}
