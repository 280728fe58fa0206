use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use ycsa_core::{categorize, Classify, ReportSection, RequestId};
use ycsa_logging::{ycsa_debug, ycsa_info, ycsa_warn};

use crate::monitor::{run_monitor, MonitorEvent, MonitorSession, MonitorSettings, MonitorSink};
use crate::report::{write_report, ReportRequest};
use crate::source::{fetch_all_comments, CommentSource, LiveChatSource};
use crate::EngineEvent;

/// Everything the engine thread needs; sources and classifier are injected so
/// tests can drive the engine with fakes.
#[derive(Clone)]
pub struct EngineConfig {
    pub comment_source: Arc<dyn CommentSource>,
    pub chat_source: Arc<dyn LiveChatSource>,
    pub classifier: Arc<dyn Classify>,
    pub monitor: MonitorSettings,
    pub max_comment_pages: Option<usize>,
    pub output_dir: PathBuf,
    pub generated_utc: Arc<dyn Fn() -> String + Send + Sync>,
}

enum EngineCommand {
    FetchComments {
        request_id: RequestId,
        video_id: String,
    },
    StartMonitor {
        request_id: RequestId,
        video_id: String,
    },
    StopMonitor {
        request_id: RequestId,
    },
    ExportReport {
        comments: Option<ReportSection>,
        live: Option<ReportSection>,
    },
}

#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("ycsa-engine")
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("ycsa-engine-commands".to_string())
            .spawn(move || {
                let mut sessions: HashMap<RequestId, MonitorSession> = HashMap::new();
                while let Ok(command) = cmd_rx.recv() {
                    sessions.retain(|_, session| !session.is_stopped());
                    handle_command(&runtime, &config, &mut sessions, command, &event_tx);
                }
                for session in sessions.values() {
                    session.stop();
                }
                ycsa_debug!("Engine command loop finished");
            })?;

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn fetch_comments(&self, request_id: RequestId, video_id: impl Into<String>) {
        self.send(EngineCommand::FetchComments {
            request_id,
            video_id: video_id.into(),
        });
    }

    pub fn start_monitor(&self, request_id: RequestId, video_id: impl Into<String>) {
        self.send(EngineCommand::StartMonitor {
            request_id,
            video_id: video_id.into(),
        });
    }

    pub fn stop_monitor(&self, request_id: RequestId) {
        self.send(EngineCommand::StopMonitor { request_id });
    }

    pub fn export_report(&self, comments: Option<ReportSection>, live: Option<ReportSection>) {
        self.send(EngineCommand::ExportReport { comments, live });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            ycsa_warn!("Engine command loop is gone; dropping command");
        }
    }
}

struct ChannelMonitorSink {
    request_id: RequestId,
    tx: mpsc::Sender<EngineEvent>,
}

impl MonitorSink for ChannelMonitorSink {
    fn emit(&self, event: MonitorEvent) {
        let _ = self.tx.send(EngineEvent::Monitor {
            request_id: self.request_id,
            event,
        });
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    config: &EngineConfig,
    sessions: &mut HashMap<RequestId, MonitorSession>,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::FetchComments {
            request_id,
            video_id,
        } => {
            let source = config.comment_source.clone();
            let classifier = config.classifier.clone();
            let max_pages = config.max_comment_pages;
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                ycsa_info!("Fetching comments request_id={} video_id={}", request_id, video_id);
                let result = fetch_all_comments(source.as_ref(), &video_id, max_pages)
                    .await
                    .map(|comments| categorize(comments, classifier.as_ref()));
                if let Err(err) = &result {
                    ycsa_warn!("Comment fetch for {} failed: {}", video_id, err);
                }
                let _ = event_tx.send(EngineEvent::CommentsFetched { request_id, result });
            });
        }
        EngineCommand::StartMonitor {
            request_id,
            video_id,
        } => {
            let session = MonitorSession::new();
            sessions.insert(request_id, session.clone());
            let source = config.chat_source.clone();
            let classifier = config.classifier.clone();
            let settings = config.monitor.clone();
            let sink = ChannelMonitorSink {
                request_id,
                tx: event_tx.clone(),
            };
            runtime.spawn(async move {
                let outcome = run_monitor(
                    source.as_ref(),
                    classifier.as_ref(),
                    &video_id,
                    &session,
                    &settings,
                    &sink,
                )
                .await;
                session.stop();
                ycsa_info!("Monitor request_id={} finished: {:?}", request_id, outcome);
            });
        }
        EngineCommand::StopMonitor { request_id } => {
            if let Some(session) = sessions.remove(&request_id) {
                ycsa_info!("Stopping monitor request_id={}", request_id);
                session.stop();
            }
        }
        EngineCommand::ExportReport { comments, live } => {
            let request = ReportRequest {
                comments,
                live,
                generated_utc: (config.generated_utc)(),
            };
            let output_dir = config.output_dir.clone();
            let event_tx = event_tx.clone();
            runtime.spawn_blocking(move || {
                let result =
                    write_report(&output_dir, &request).map_err(|err| err.to_string());
                let _ = event_tx.send(EngineEvent::ReportWritten { result });
            });
        }
    }
}
