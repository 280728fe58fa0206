use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::{
    ApiError, ChatMessage, ChatPage, CommentPage, CommentSource, FailureKind, JsonClient,
    LiveChatSource,
};

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
/// Largest `maxResults` the comment endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

const UNKNOWN_AUTHOR: &str = "unknown";

/// YouTube Data API v3 client for comment threads and live chat.
#[derive(Debug, Clone)]
pub struct YouTubeApi {
    http: JsonClient,
    base: Url,
    api_key: String,
    page_size: u32,
}

impl YouTubeApi {
    pub fn new(http: JsonClient, base: &str, api_key: impl Into<String>) -> Result<Self, ApiError> {
        let mut base = Url::parse(base)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http,
            base,
            api_key: api_key.into(),
            page_size: MAX_PAGE_SIZE,
        })
    }

    /// Sets `maxResults` for comment pages, clamped to `1..=100`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self
            .base
            .join(resource)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in params {
                query.append_pair(name, value);
            }
            query.append_pair("key", &self.api_key);
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl CommentSource for YouTubeApi {
    async fn comment_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> Result<CommentPage, ApiError> {
        let page_size = self.page_size.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("textFormat", "plainText"),
            ("maxResults", page_size.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        let url = self.endpoint("commentThreads", &params)?;

        let list: CommentThreadList = self.http.get_json(url).await?;
        let comments = list
            .items
            .into_iter()
            .filter_map(|thread| {
                thread
                    .snippet?
                    .top_level_comment?
                    .snippet?
                    .text_display
            })
            .collect();

        Ok(CommentPage {
            comments,
            next_page_token: list.next_page_token,
        })
    }
}

#[async_trait::async_trait]
impl LiveChatSource for YouTubeApi {
    async fn active_live_chat_id(&self, video_id: &str) -> Result<Option<String>, ApiError> {
        let url = self.endpoint(
            "videos",
            &[("part", "liveStreamingDetails"), ("id", video_id)],
        )?;
        let list: VideoList = self.http.get_json(url).await?;
        Ok(list
            .items
            .into_iter()
            .next()
            .and_then(|video| video.live_streaming_details)
            .and_then(|details| details.active_live_chat_id)
            .filter(|id| !id.is_empty()))
    }

    async fn poll_chat(
        &self,
        live_chat_id: &str,
        page_token: Option<&str>,
    ) -> Result<ChatPage, ApiError> {
        let mut params = vec![
            ("liveChatId", live_chat_id),
            ("part", "snippet,authorDetails"),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        let url = self.endpoint("liveChat/messages", &params)?;

        let list: LiveChatMessageList = self.http.get_json(url).await?;
        let messages = list
            .items
            .into_iter()
            .filter_map(|item| {
                let text = item.snippet.and_then(LiveChatSnippet::into_text)?;
                let author = item
                    .author_details
                    .and_then(|details| details.display_name)
                    .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
                Some(ChatMessage { author, text })
            })
            .collect();

        Ok(ChatPage {
            messages,
            next_page_token: list.next_page_token,
            polling_interval: list.polling_interval_millis.map(Duration::from_millis),
        })
    }
}

// Wire shapes. Every field is optional so a partial response degrades to
// "no data" instead of a decode failure.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadList {
    #[serde(default)]
    items: Vec<CommentThread>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThread {
    snippet: Option<CommentThreadSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: Option<TopLevelComment>,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: Option<CommentSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    text_display: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Video {
    live_streaming_details: Option<LiveStreamingDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveStreamingDetails {
    active_live_chat_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveChatMessageList {
    #[serde(default)]
    items: Vec<LiveChatMessage>,
    next_page_token: Option<String>,
    polling_interval_millis: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveChatMessage {
    snippet: Option<LiveChatSnippet>,
    author_details: Option<AuthorDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveChatSnippet {
    display_message: Option<String>,
    text_message_details: Option<TextMessageDetails>,
}

impl LiveChatSnippet {
    fn into_text(self) -> Option<String> {
        self.display_message
            .or_else(|| self.text_message_details.and_then(|d| d.message_text))
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextMessageDetails {
    message_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorDetails {
    display_name: Option<String>,
}
