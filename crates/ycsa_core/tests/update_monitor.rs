use std::sync::Once;

use ycsa_core::{
    update, AppState, CategorizedComments, ChatLine, Effect, MonitorState, Msg, ReportSection,
    SentimentLabel, LIVE_FEED_LIMIT,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(ycsa_logging::initialize_for_tests);
}

fn start(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::StartMonitoringClicked)
}

fn line(author: &str, message: &str, label: SentimentLabel) -> ChatLine {
    ChatLine {
        author: author.to_string(),
        message: message.to_string(),
        label,
    }
}

fn monitoring_state() -> AppState {
    let (state, _) = start(AppState::new(), "https://youtu.be/live123");
    let (state, _) = update(
        state,
        Msg::LiveChatResolved {
            request_id: 1,
            live_chat_id: Some("chat-1".to_string()),
        },
    );
    state
}

#[test]
fn start_looks_up_chat_but_stays_idle_until_resolved() {
    init_logging();
    let (state, effects) = start(AppState::new(), "https://youtu.be/live123");

    assert_eq!(
        effects,
        vec![Effect::StartMonitor {
            request_id: 1,
            video_id: "live123".to_string(),
        }]
    );
    assert_eq!(state.monitor(), MonitorState::Idle);
    assert!(state.view().lookup_pending);
}

#[test]
fn start_without_video_id_does_nothing() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::StartMonitoringClicked);
    assert!(effects.is_empty());
    assert_eq!(state.monitor(), MonitorState::Idle);
    assert!(!state.view().lookup_pending);
}

#[test]
fn resolved_chat_enters_monitoring() {
    init_logging();
    let state = monitoring_state();
    assert_eq!(state.monitor(), MonitorState::Monitoring);
    assert!(!state.view().lookup_pending);
}

#[test]
fn missing_live_chat_keeps_idle_and_empties_feed() {
    init_logging();
    let (state, _) = start(AppState::new(), "live123");
    let (state, effects) = update(
        state,
        Msg::LiveChatResolved {
            request_id: 1,
            live_chat_id: None,
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.monitor(), MonitorState::Idle);
    let view = state.view();
    assert!(!view.lookup_pending);
    assert!(view.live_feed.is_empty());
    assert_eq!(view.live_chart.total, 0);
    assert!(view.status.contains("No active live chat"));
}

#[test]
fn repeated_start_while_monitoring_is_ignored() {
    init_logging();
    let (state, effects) = update(monitoring_state(), Msg::StartMonitoringClicked);
    assert!(effects.is_empty());
    assert_eq!(state.monitor(), MonitorState::Monitoring);
}

#[test]
fn chat_batches_fill_live_buckets_and_feed() {
    init_logging();
    let (state, _) = update(
        monitoring_state(),
        Msg::ChatBatch {
            request_id: 1,
            lines: vec![
                line("ann", "love it", SentimentLabel::Good),
                line("bob", "lag again", SentimentLabel::Bad),
            ],
        },
    );
    let (state, _) = update(
        state,
        Msg::ChatBatch {
            request_id: 1,
            lines: vec![line("cy", "hello", SentimentLabel::Neutral)],
        },
    );

    let view = state.view();
    assert_eq!(view.live_chart.total, 3);
    let authors: Vec<_> = view.live_feed.iter().map(|l| l.author.as_str()).collect();
    assert_eq!(authors, vec!["ann", "bob", "cy"]);
    assert_eq!(
        state.live_comments().bucket(SentimentLabel::Bad),
        ["lag again"]
    );
}

#[test]
fn pause_stops_monitoring_and_emits_stop() {
    init_logging();
    let (mut state, effects) = update(monitoring_state(), Msg::PauseMonitoringClicked);

    assert_eq!(effects, vec![Effect::StopMonitor { request_id: 1 }]);
    assert_eq!(state.monitor(), MonitorState::Idle);
    assert!(state.consume_dirty());

    // Batches from the stopped run are dropped.
    let (state, _) = update(
        state,
        Msg::ChatBatch {
            request_id: 1,
            lines: vec![line("late", "still here", SentimentLabel::Neutral)],
        },
    );
    assert_eq!(state.view().live_chart.total, 0);
}

#[test]
fn pause_while_idle_is_noop() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::PauseMonitoringClicked);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn pause_during_lookup_cancels_and_ignores_late_resolution() {
    init_logging();
    let (state, _) = start(AppState::new(), "live123");
    let (state, effects) = update(state, Msg::PauseMonitoringClicked);
    assert_eq!(effects, vec![Effect::StopMonitor { request_id: 1 }]);

    let (state, effects) = update(
        state,
        Msg::LiveChatResolved {
            request_id: 1,
            live_chat_id: Some("chat-1".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.monitor(), MonitorState::Idle);
}

#[test]
fn restart_uses_new_request_id_and_resets_live_data() {
    init_logging();
    let (state, _) = update(
        monitoring_state(),
        Msg::ChatBatch {
            request_id: 1,
            lines: vec![line("ann", "love it", SentimentLabel::Good)],
        },
    );
    let (state, _) = update(state, Msg::PauseMonitoringClicked);
    let (state, effects) = update(state, Msg::StartMonitoringClicked);

    assert_eq!(
        effects,
        vec![Effect::StartMonitor {
            request_id: 2,
            video_id: "live123".to_string(),
        }]
    );
    assert_eq!(state.view().live_chart.total, 0);
}

#[test]
fn monitor_ended_by_engine_returns_to_idle() {
    init_logging();
    let (state, _) = update(
        monitoring_state(),
        Msg::MonitorEnded {
            request_id: 1,
            reason: "5 consecutive poll failures".to_string(),
        },
    );
    assert_eq!(state.monitor(), MonitorState::Idle);
    assert!(state.status().contains("5 consecutive poll failures"));
}

#[test]
fn live_feed_is_capped() {
    init_logging();
    let lines = (0..LIVE_FEED_LIMIT + 25)
        .map(|i| line("viewer", &format!("msg {i}"), SentimentLabel::Neutral))
        .collect();
    let (state, _) = update(
        monitoring_state(),
        Msg::ChatBatch {
            request_id: 1,
            lines,
        },
    );

    let view = state.view();
    assert_eq!(view.live_feed.len(), LIVE_FEED_LIMIT);
    assert_eq!(view.live_feed[0].message, "msg 25");
    assert_eq!(view.live_chart.total, LIVE_FEED_LIMIT + 25);
}

#[test]
fn export_includes_live_buckets_after_pause() {
    init_logging();
    let (state, _) = update(
        monitoring_state(),
        Msg::ChatBatch {
            request_id: 1,
            lines: vec![line("ann", "love it", SentimentLabel::Good)],
        },
    );
    let (state, _) = update(state, Msg::PauseMonitoringClicked);
    let (_state, effects) = update(state, Msg::ExportClicked);

    match effects.as_slice() {
        [Effect::ExportReport { comments, live }] => {
            assert!(comments.is_none());
            let live = live.as_ref().expect("live section");
            assert_eq!(live.video_id, "live123");
            assert_eq!(live.buckets.total(), 1);
        }
        other => panic!("unexpected effects {other:?}"),
    }
}

#[test]
fn export_names_each_section_after_its_own_video() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::InputChanged("videoAAA".to_string()));
    let (state, _) = update(state, Msg::AnalyzeClicked);
    let mut analyzed = CategorizedComments::new();
    analyzed.push(SentimentLabel::Good, "from A");
    let (state, _) = update(
        state,
        Msg::CommentsFetched {
            request_id: 1,
            result: Ok(analyzed.clone()),
        },
    );

    let (state, _) = start(state, "videoBBB");
    let (state, _) = update(
        state,
        Msg::LiveChatResolved {
            request_id: 2,
            live_chat_id: Some("chat-b".to_string()),
        },
    );
    let (state, _) = update(
        state,
        Msg::ChatBatch {
            request_id: 2,
            lines: vec![line("bo", "from B", SentimentLabel::Neutral)],
        },
    );
    let (_state, effects) = update(state, Msg::ExportClicked);

    let mut live = CategorizedComments::new();
    live.push(SentimentLabel::Neutral, "from B");
    assert_eq!(
        effects,
        vec![Effect::ExportReport {
            comments: Some(ReportSection {
                video_id: "videoAAA".to_string(),
                buckets: analyzed,
            }),
            live: Some(ReportSection {
                video_id: "videoBBB".to_string(),
                buckets: live,
            }),
        }]
    );
}
