use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use ycsa_core::{ChatLine, Classify};
use ycsa_logging::{ycsa_debug, ycsa_info, ycsa_warn};

use crate::{ApiError, LiveChatSource};

#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    /// Result of the live-chat-id lookup. `None` means no active chat.
    Resolved { live_chat_id: Option<String> },
    Batch(Vec<ChatLine>),
    /// The loop gave up on its own.
    Ended { reason: String },
}

pub trait MonitorSink: Send + Sync {
    fn emit(&self, event: MonitorEvent);
}

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Lower bound on the pause between successful polls.
    pub min_poll_interval: Duration,
    /// Wait at least as long as the platform's `pollingIntervalMillis`.
    pub respect_server_interval: bool,
    pub error_backoff: Duration,
    pub max_consecutive_failures: u32,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            min_poll_interval: Duration::ZERO,
            respect_server_interval: true,
            error_backoff: Duration::from_secs(2),
            max_consecutive_failures: 5,
        }
    }
}

/// Session-scoped monitoring flag.
///
/// The only transitions are [`MonitorSession::start`] and
/// [`MonitorSession::stop`]. Once stopped, a session never becomes active
/// again; a new run needs a new session.
#[derive(Debug, Clone, Default)]
pub struct MonitorSession {
    inner: Arc<SessionInner>,
}

#[derive(Debug, Default)]
struct SessionInner {
    started: AtomicBool,
    stop: CancellationToken,
}

impl MonitorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the session was stopped before it could start.
    pub fn start(&self) -> bool {
        if self.inner.stop.is_cancelled() {
            return false;
        }
        self.inner.started.store(true, Ordering::SeqCst);
        !self.inner.stop.is_cancelled()
    }

    pub fn stop(&self) {
        self.inner.stop.cancel();
    }

    pub fn is_active(&self) -> bool {
        self.inner.started.load(Ordering::SeqCst) && !self.inner.stop.is_cancelled()
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stop.is_cancelled()
    }

    async fn stopped(&self) {
        self.inner.stop.cancelled().await;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MonitorOutcome {
    NoActiveChat,
    LookupFailed(ApiError),
    Stopped { polls: u64 },
    Failed { polls: u64, error: ApiError },
}

/// Looks up the video's live chat and polls it until `session` is stopped.
///
/// No poll is made when the lookup finds no active chat. The session flag is
/// checked before every poll, so a stop takes effect once the in-flight poll
/// returns.
pub async fn run_monitor(
    source: &dyn LiveChatSource,
    classifier: &dyn Classify,
    video_id: &str,
    session: &MonitorSession,
    settings: &MonitorSettings,
    sink: &dyn MonitorSink,
) -> MonitorOutcome {
    if session.is_stopped() {
        return MonitorOutcome::Stopped { polls: 0 };
    }

    let live_chat_id = match source.active_live_chat_id(video_id).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            ycsa_info!("No active live chat for {}", video_id);
            sink.emit(MonitorEvent::Resolved { live_chat_id: None });
            return MonitorOutcome::NoActiveChat;
        }
        Err(err) => {
            ycsa_warn!("Live chat lookup for {} failed: {}", video_id, err);
            sink.emit(MonitorEvent::Ended {
                reason: format!("live chat lookup failed: {err}"),
            });
            return MonitorOutcome::LookupFailed(err);
        }
    };

    if !session.start() {
        return MonitorOutcome::Stopped { polls: 0 };
    }
    ycsa_info!("Monitoring live chat {} for {}", live_chat_id, video_id);
    sink.emit(MonitorEvent::Resolved {
        live_chat_id: Some(live_chat_id.clone()),
    });

    let mut page_token: Option<String> = None;
    let mut polls: u64 = 0;
    let mut failures: u32 = 0;

    while session.is_active() {
        let result = source.poll_chat(&live_chat_id, page_token.as_deref()).await;
        polls += 1;

        let delay = match result {
            Ok(page) => {
                failures = 0;
                if page.next_page_token.is_some() {
                    page_token = page.next_page_token;
                }
                ycsa_debug!(
                    "Poll {} of {}: {} messages",
                    polls,
                    live_chat_id,
                    page.messages.len()
                );
                let lines: Vec<ChatLine> = page
                    .messages
                    .into_iter()
                    .map(|message| ChatLine {
                        label: classifier.classify(&message.text),
                        author: message.author,
                        message: message.text,
                    })
                    .collect();
                if !lines.is_empty() {
                    sink.emit(MonitorEvent::Batch(lines));
                }
                match page.polling_interval {
                    Some(server) if settings.respect_server_interval => {
                        server.max(settings.min_poll_interval)
                    }
                    _ => settings.min_poll_interval,
                }
            }
            Err(err) => {
                failures += 1;
                ycsa_warn!(
                    "Poll {} of {} failed ({} in a row): {}",
                    polls,
                    live_chat_id,
                    failures,
                    err
                );
                if failures >= settings.max_consecutive_failures {
                    sink.emit(MonitorEvent::Ended {
                        reason: format!("{failures} consecutive poll failures, last: {err}"),
                    });
                    return MonitorOutcome::Failed { polls, error: err };
                }
                settings.error_backoff
            }
        };

        if !session.is_active() {
            break;
        }
        if !delay.is_zero() {
            tokio::select! {
                _ = session.stopped() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    ycsa_info!("Stopped monitoring {} after {} polls", live_chat_id, polls);
    MonitorOutcome::Stopped { polls }
}
