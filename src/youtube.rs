//! Blocking client for the YouTube Data API v3 comment listings.

use crate::error::FetchError;
use crate::record::{ReplyItem, ReplyPage, ThreadItem, ThreadPage};
use crate::source::CommentSource;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

// ---------------------------------------------------------------- wire types

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadListResponse {
    #[serde(default)]
    items: Vec<ApiThread>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiThread {
    snippet: ApiThreadSnippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiThreadSnippet {
    top_level_comment: ApiComment,
    #[serde(default)]
    total_reply_count: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentListResponse {
    #[serde(default)]
    items: Vec<ApiComment>,
}

#[derive(Deserialize)]
struct ApiComment {
    id: String,
    snippet: ApiCommentSnippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCommentSnippet {
    parent_id: Option<String>,
    published_at: String,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    text_display: String,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    reason: String,
}

const QUOTA_REASONS: [&str; 4] = ["quotaExceeded", "dailyLimitExceeded", "rateLimitExceeded", "userRateLimitExceeded"];

// ---------------------------------------------------------------- client

/// `CommentSource` over `commentThreads.list` and `comments.list`.
pub struct YouTubeApi {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeApi {
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client, api_key: api_key.into(), base_url: DEFAULT_BASE_URL.to_string() })
    }

    /// Point at another endpoint root (proxies, test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .map_err(|e| FetchError::Network(format!("GET {endpoint}: {e}")))?;
        if !resp.status().is_success() {
            return Err(classify_error(resp));
        }
        let body = resp.text().map_err(|e| FetchError::Network(format!("reading {endpoint} body: {e}")))?;
        serde_json::from_str(&body).map_err(|e| FetchError::Malformed(format!("{endpoint}: {e}")))
    }
}

fn classify_error(resp: Response) -> FetchError {
    let status = resp.status().as_u16();
    let body = resp.text().unwrap_or_default();
    match serde_json::from_str::<ApiErrorEnvelope>(&body) {
        Ok(env) => {
            if env.error.errors.iter().any(|d| QUOTA_REASONS.contains(&d.reason.as_str())) {
                FetchError::Quota(env.error.message)
            } else {
                FetchError::Http { status, message: env.error.message }
            }
        }
        Err(_) => FetchError::Http { status, message: body.chars().take(200).collect() },
    }
}

impl CommentSource for YouTubeApi {
    fn list_threads(
        &mut self,
        video_id: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<ThreadPage, FetchError> {
        let max = page_size.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("maxResults", max.as_str()),
            ("textFormat", "html"),
        ];
        if let Some(c) = cursor {
            query.push(("pageToken", c));
        }
        let resp: ThreadListResponse = self.get("commentThreads", &query)?;
        let items = resp
            .items
            .into_iter()
            .map(|t| {
                let c = t.snippet.top_level_comment;
                ThreadItem {
                    id: c.id,
                    published_at: c.snippet.published_at,
                    like_count: c.snippet.like_count,
                    text: c.snippet.text_display,
                    reply_count: t.snippet.total_reply_count,
                }
            })
            .collect();
        Ok(ThreadPage { items, next_cursor: resp.next_page_token })
    }

    fn list_replies(&mut self, parent_id: &str, page_size: u32) -> Result<ReplyPage, FetchError> {
        let max = page_size.to_string();
        let query = [
            ("part", "snippet"),
            ("parentId", parent_id),
            ("maxResults", max.as_str()),
            ("textFormat", "html"),
        ];
        let resp: CommentListResponse = self.get("comments", &query)?;
        let items = resp
            .items
            .into_iter()
            .map(|c| ReplyItem {
                id: c.id,
                parent_id: c.snippet.parent_id,
                published_at: c.snippet.published_at,
                like_count: c.snippet.like_count,
                text: c.snippet.text_display,
            })
            .collect();
        Ok(ReplyPage { items })
    }
}
