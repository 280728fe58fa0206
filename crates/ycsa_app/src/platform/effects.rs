use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use ycsa_core::{Effect, Msg};
use ycsa_engine::{EngineEvent, EngineHandle, MonitorEvent};
use ycsa_logging::{ycsa_info, ycsa_warn};

use super::app::AppEvent;

/// Forwards effects to the engine and engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, event_tx: mpsc::Sender<AppEvent>) -> Self {
        let runner = Self { engine };
        runner.spawn_event_loop(event_tx);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchComments {
                    request_id,
                    video_id,
                } => {
                    ycsa_info!("FetchComments request_id={} video_id={}", request_id, video_id);
                    self.engine.fetch_comments(request_id, video_id);
                }
                Effect::StartMonitor {
                    request_id,
                    video_id,
                } => {
                    ycsa_info!("StartMonitor request_id={} video_id={}", request_id, video_id);
                    self.engine.start_monitor(request_id, video_id);
                }
                Effect::StopMonitor { request_id } => {
                    ycsa_info!("StopMonitor request_id={}", request_id);
                    self.engine.stop_monitor(request_id);
                }
                Effect::ExportReport { comments, live } => {
                    self.engine.export_report(comments, live);
                }
            }
        }
    }

    fn spawn_event_loop(&self, event_tx: mpsc::Sender<AppEvent>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.recv_timeout(Duration::from_millis(100)) {
                if event_tx.send(AppEvent::Msg(map_event(event))).is_err() {
                    break;
                }
            }
        });
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::CommentsFetched { request_id, result } => Msg::CommentsFetched {
            request_id,
            result: result.map_err(|err| {
                ycsa_warn!("Request {} failed: {}", request_id, err);
                err.to_string()
            }),
        },
        EngineEvent::Monitor { request_id, event } => match event {
            MonitorEvent::Resolved { live_chat_id } => Msg::LiveChatResolved {
                request_id,
                live_chat_id,
            },
            MonitorEvent::Batch(lines) => Msg::ChatBatch { request_id, lines },
            MonitorEvent::Ended { reason } => Msg::MonitorEnded { request_id, reason },
        },
        EngineEvent::ReportWritten { result } => Msg::ReportExported {
            result: result.map(|summary| {
                summary
                    .json_path
                    .parent()
                    .unwrap_or(&summary.json_path)
                    .display()
                    .to_string()
            }),
        },
    }
}
