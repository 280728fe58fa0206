use std::sync::Arc;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use ycsa_core::{CategorizedComments, Classify, ReportSection, SentimentLabel};
use ycsa_engine::{
    ApiError, ChatMessage, ChatPage, CommentPage, CommentSource, EngineConfig, EngineEvent,
    EngineHandle, LiveChatSource, MonitorEvent, MonitorSettings,
};

struct LoveHate;

impl Classify for LoveHate {
    fn classify(&self, text: &str) -> SentimentLabel {
        if text.contains("love") {
            SentimentLabel::Good
        } else if text.contains("hate") {
            SentimentLabel::Bad
        } else {
            SentimentLabel::Neutral
        }
    }
}

struct OnePage;

#[async_trait::async_trait]
impl CommentSource for OnePage {
    async fn comment_page(
        &self,
        _video_id: &str,
        _page_token: Option<&str>,
    ) -> Result<CommentPage, ApiError> {
        Ok(CommentPage {
            comments: vec!["love it".into(), "hate it".into(), "first".into()],
            next_page_token: None,
        })
    }
}

/// Every poll returns the same single message.
struct EndlessChat;

#[async_trait::async_trait]
impl LiveChatSource for EndlessChat {
    async fn active_live_chat_id(&self, video_id: &str) -> Result<Option<String>, ApiError> {
        Ok((video_id == "live").then(|| "chat-1".to_string()))
    }

    async fn poll_chat(
        &self,
        _live_chat_id: &str,
        _page_token: Option<&str>,
    ) -> Result<ChatPage, ApiError> {
        Ok(ChatPage {
            messages: vec![ChatMessage {
                author: "ana".into(),
                text: "love".into(),
            }],
            next_page_token: Some("t".into()),
            polling_interval: Some(Duration::from_millis(20)),
        })
    }
}

fn engine(output: &TempDir) -> EngineHandle {
    EngineHandle::new(EngineConfig {
        comment_source: Arc::new(OnePage),
        chat_source: Arc::new(EndlessChat),
        classifier: Arc::new(LoveHate),
        monitor: MonitorSettings::default(),
        max_comment_pages: None,
        output_dir: output.path().to_path_buf(),
        generated_utc: Arc::new(|| "2026-01-01T00:00:00+00:00".to_string()),
    })
    .unwrap()
}

fn next_event(engine: &EngineHandle) -> EngineEvent {
    engine
        .recv_timeout(Duration::from_secs(5))
        .expect("engine event")
}

#[test]
fn fetch_categorizes_and_tags_request_id() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);
    engine.fetch_comments(7, "abc");

    match next_event(&engine) {
        EngineEvent::CommentsFetched { request_id, result } => {
            assert_eq!(request_id, 7);
            let buckets = result.unwrap();
            assert_eq!(buckets.bucket(SentimentLabel::Good), ["love it".to_string()]);
            assert_eq!(buckets.bucket(SentimentLabel::Bad), ["hate it".to_string()]);
            assert_eq!(buckets.bucket(SentimentLabel::Neutral), ["first".to_string()]);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn monitor_streams_batches_until_stopped() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);
    engine.start_monitor(3, "live");

    assert_eq!(
        next_event(&engine),
        EngineEvent::Monitor {
            request_id: 3,
            event: MonitorEvent::Resolved {
                live_chat_id: Some("chat-1".into())
            }
        }
    );
    assert!(matches!(
        next_event(&engine),
        EngineEvent::Monitor {
            request_id: 3,
            event: MonitorEvent::Batch(_)
        }
    ));

    engine.stop_monitor(3);
    // Drain whatever was in flight, then expect silence.
    let deadline = Instant::now() + Duration::from_millis(300);
    while Instant::now() < deadline {
        let _ = engine.recv_timeout(Duration::from_millis(50));
    }
    assert_eq!(engine.recv_timeout(Duration::from_millis(200)), None);
}

#[test]
fn monitor_without_live_chat_resolves_none() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);
    engine.start_monitor(1, "vod");

    assert_eq!(
        next_event(&engine),
        EngineEvent::Monitor {
            request_id: 1,
            event: MonitorEvent::Resolved { live_chat_id: None }
        }
    );
}

#[test]
fn export_writes_into_output_dir() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);
    let mut buckets = CategorizedComments::new();
    buckets.push(SentimentLabel::Good, "love");
    let comments = ReportSection {
        video_id: "abc".into(),
        buckets,
    };
    engine.export_report(Some(comments), None);

    match next_event(&engine) {
        EngineEvent::ReportWritten { result } => {
            let summary = result.unwrap();
            assert_eq!(summary.json_path, dir.path().join("abc-report.json"));
            assert!(summary.json_path.exists());
        }
        other => panic!("unexpected event {other:?}"),
    }
}
