use crate::{AnalysisState, AppState, Effect, MonitorState, Msg, ReportSection};

const INVALID_INPUT_HINT: &str = "Enter a YouTube video URL or id first.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::AnalyzeClicked => {
            if let Some(loading) = state.loading_video_id() {
                let status = format!("Still fetching comments for {loading}...");
                state.set_status(status);
                return (state, Vec::new());
            }
            let Some(video_id) = state.video_id() else {
                state.set_status(INVALID_INPUT_HINT);
                return (state, Vec::new());
            };
            let request_id = state.next_request_id();
            state.set_analysis(AnalysisState::Loading {
                request_id,
                video_id: video_id.clone(),
            });
            state.set_status(format!("Fetching comments for {video_id}..."));
            vec![Effect::FetchComments {
                request_id,
                video_id,
            }]
        }
        Msg::CommentsFetched { request_id, result } => {
            if state.loading_request() != Some(request_id) {
                return (state, Vec::new());
            }
            let video_id = state.loading_video_id().unwrap_or_default().to_string();
            match result {
                Ok(comments) => {
                    state.set_status(format!(
                        "Classified {} comments for {video_id}.",
                        comments.total()
                    ));
                    state.set_analysis(AnalysisState::Ready { video_id, comments });
                }
                Err(message) => {
                    state.set_status(format!(
                        "Could not fetch comments for {video_id}: {message}"
                    ));
                    state.set_analysis(AnalysisState::Failed { video_id, message });
                }
            }
            Vec::new()
        }
        Msg::StartMonitoringClicked => {
            // Phase invariant: at most one monitor run, pending or active, at a time.
            if state.monitor() == MonitorState::Monitoring || state.pending_monitor().is_some() {
                return (state, Vec::new());
            }
            let Some(video_id) = state.video_id() else {
                state.set_status(INVALID_INPUT_HINT);
                return (state, Vec::new());
            };
            let request_id = state.next_request_id();
            state.begin_lookup(request_id, video_id.clone());
            state.set_status(format!("Looking up live chat for {video_id}..."));
            vec![Effect::StartMonitor {
                request_id,
                video_id,
            }]
        }
        Msg::LiveChatResolved {
            request_id,
            live_chat_id,
        } => {
            if state.pending_monitor() != Some(request_id) {
                return (state, Vec::new());
            }
            match live_chat_id {
                Some(_) => {
                    state.enter_monitoring();
                    state.set_status("Monitoring live chat...");
                }
                None => {
                    let video_id = state.live_video_id().unwrap_or_default().to_string();
                    state.enter_idle();
                    state.clear_live();
                    state.set_status(format!("No active live chat for {video_id}."));
                }
            }
            Vec::new()
        }
        Msg::ChatBatch { request_id, lines } => {
            if state.monitor() == MonitorState::Monitoring
                && state.active_monitor() == Some(request_id)
            {
                state.push_chat_lines(lines);
            }
            Vec::new()
        }
        Msg::PauseMonitoringClicked => {
            let Some(request_id) = state.active_monitor().or(state.pending_monitor()) else {
                return (state, Vec::new());
            };
            state.enter_idle();
            state.set_status("Chat monitoring paused. Use 'start' to resume.");
            vec![Effect::StopMonitor { request_id }]
        }
        Msg::MonitorEnded { request_id, reason } => {
            let was_pending = state.pending_monitor() == Some(request_id);
            if was_pending || state.active_monitor() == Some(request_id) {
                state.enter_idle();
                if was_pending {
                    state.clear_live();
                }
                state.set_status(format!("Chat monitoring stopped: {reason}"));
            }
            Vec::new()
        }
        Msg::ListingsToggled => {
            state.toggle_listings();
            Vec::new()
        }
        Msg::ExportClicked => export_effects(&mut state),
        Msg::ReportExported { result } => {
            match result {
                Ok(location) => state.set_status(format!("Report written to {location}")),
                Err(message) => state.set_status(format!("Report export failed: {message}")),
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn export_effects(state: &mut AppState) -> Vec<Effect> {
    let comments = match state.analysis() {
        AnalysisState::Ready { video_id, comments } => Some(ReportSection {
            video_id: video_id.clone(),
            buckets: comments.clone(),
        }),
        _ => None,
    };
    let live = state
        .live_video_id()
        .filter(|_| !state.live_comments().is_empty())
        .map(|video_id| ReportSection {
            video_id: video_id.to_string(),
            buckets: state.live_comments().clone(),
        });

    if comments.is_none() && live.is_none() {
        state.set_status("Nothing to export yet.");
        return Vec::new();
    }

    state.set_status("Exporting report...");
    vec![Effect::ExportReport { comments, live }]
}
