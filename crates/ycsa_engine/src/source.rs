use std::collections::HashSet;

use ycsa_core::Comment;
use ycsa_logging::{ycsa_debug, ycsa_info, ycsa_warn};

use crate::{ApiError, ChatPage, CommentPage};

/// Paginated comment retrieval for one video.
#[async_trait::async_trait]
pub trait CommentSource: Send + Sync {
    async fn comment_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> Result<CommentPage, ApiError>;
}

/// Live-chat lookup and polling.
#[async_trait::async_trait]
pub trait LiveChatSource: Send + Sync {
    /// Returns `Ok(None)` when the video has no active live chat.
    async fn active_live_chat_id(&self, video_id: &str) -> Result<Option<String>, ApiError>;

    async fn poll_chat(
        &self,
        live_chat_id: &str,
        page_token: Option<&str>,
    ) -> Result<ChatPage, ApiError>;
}

/// Follows the continuation-token chain and concatenates every page in order.
///
/// Stops early on a repeated token or when `max_pages` pages have been read.
pub async fn fetch_all_comments(
    source: &dyn CommentSource,
    video_id: &str,
    max_pages: Option<usize>,
) -> Result<Vec<Comment>, ApiError> {
    let mut comments = Vec::new();
    let mut seen_tokens = HashSet::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = source.comment_page(video_id, page_token.as_deref()).await?;
        pages += 1;
        ycsa_debug!(
            "Comment page {} for {}: {} items, more={}",
            pages,
            video_id,
            page.comments.len(),
            page.next_page_token.is_some()
        );
        comments.extend(page.comments);

        match page.next_page_token {
            None => break,
            Some(token) if token.is_empty() => break,
            Some(_) if max_pages.is_some_and(|max| pages >= max) => {
                ycsa_info!("Stopping comment fetch for {} at page cap {}", video_id, pages);
                break;
            }
            Some(token) if !seen_tokens.insert(token.clone()) => {
                ycsa_warn!("Repeated page token for {}; stopping pagination", video_id);
                break;
            }
            Some(token) => page_token = Some(token),
        }
    }

    ycsa_info!(
        "Fetched {} comments for {} across {} pages",
        comments.len(),
        video_id,
        pages
    );
    Ok(comments)
}
