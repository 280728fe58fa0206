use std::collections::VecDeque;

use crate::view_model::{AnalysisStatus, AppViewModel, BucketListing, SentimentChart};
use crate::{format_bullets, parse_video_id, CategorizedComments, SentimentLabel};

pub type RequestId = u64;

/// Most recent live-chat lines kept for display.
pub const LIVE_FEED_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    #[default]
    Idle,
    Monitoring,
}

/// One classified live-chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub author: String,
    pub message: String,
    pub label: SentimentLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Loading {
        request_id: RequestId,
        video_id: String,
    },
    Ready {
        video_id: String,
        comments: CategorizedComments,
    },
    Failed {
        video_id: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input: String,
    analysis: AnalysisState,
    monitor: MonitorState,
    /// Live-chat lookup in flight; still `Idle` until it resolves.
    pending_monitor: Option<RequestId>,
    active_monitor: Option<RequestId>,
    live_video_id: Option<String>,
    live: CategorizedComments,
    live_feed: VecDeque<ChatLine>,
    show_listings: bool,
    status: String,
    last_request_id: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn monitor(&self) -> MonitorState {
        self.monitor
    }

    pub fn analysis(&self) -> &AnalysisState {
        &self.analysis
    }

    pub fn live_comments(&self) -> &CategorizedComments {
        &self.live
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Video id parsed from the current input, if it is valid.
    pub fn video_id(&self) -> Option<String> {
        parse_video_id(&self.input)
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let empty = CategorizedComments::new();
        let (analysis_status, comments) = match &self.analysis {
            AnalysisState::Idle => (AnalysisStatus::Idle, &empty),
            AnalysisState::Loading { .. } => (AnalysisStatus::Loading, &empty),
            AnalysisState::Ready { comments, .. } => (AnalysisStatus::Ready, comments),
            AnalysisState::Failed { .. } => (AnalysisStatus::Failed, &empty),
        };

        let listings = self.show_listings.then(|| {
            comments
                .iter()
                .map(|(label, bucket)| BucketListing {
                    label,
                    count: bucket.len(),
                    text: format_bullets(bucket),
                })
                .collect()
        });

        AppViewModel {
            input: self.input.clone(),
            video_id: self.video_id(),
            monitor: self.monitor,
            lookup_pending: self.pending_monitor.is_some(),
            analysis_status,
            comments_chart: SentimentChart::from_buckets(comments),
            live_chart: SentimentChart::from_buckets(&self.live),
            live_feed: self.live_feed.iter().cloned().collect(),
            listings,
            status: self.status.clone(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn set_input(&mut self, input: String) {
        if self.input != input {
            self.input = input;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.mark_dirty();
    }

    pub(crate) fn next_request_id(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.last_request_id
    }

    pub(crate) fn set_analysis(&mut self, analysis: AnalysisState) {
        self.analysis = analysis;
        self.mark_dirty();
    }

    pub(crate) fn loading_request(&self) -> Option<RequestId> {
        match &self.analysis {
            AnalysisState::Loading { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }

    pub(crate) fn loading_video_id(&self) -> Option<&str> {
        match &self.analysis {
            AnalysisState::Loading { video_id, .. } => Some(video_id),
            _ => None,
        }
    }

    pub(crate) fn pending_monitor(&self) -> Option<RequestId> {
        self.pending_monitor
    }

    pub(crate) fn active_monitor(&self) -> Option<RequestId> {
        self.active_monitor
    }

    /// Video the live buckets belong to, kept after monitoring stops.
    pub(crate) fn live_video_id(&self) -> Option<&str> {
        self.live_video_id.as_deref()
    }

    pub(crate) fn begin_lookup(&mut self, request_id: RequestId, video_id: String) {
        self.pending_monitor = Some(request_id);
        self.live_video_id = Some(video_id);
        self.live = CategorizedComments::new();
        self.live_feed.clear();
        self.mark_dirty();
    }

    pub(crate) fn enter_monitoring(&mut self) {
        self.active_monitor = self.pending_monitor.take();
        self.monitor = MonitorState::Monitoring;
        self.mark_dirty();
    }

    pub(crate) fn enter_idle(&mut self) {
        self.pending_monitor = None;
        self.active_monitor = None;
        self.monitor = MonitorState::Idle;
        self.mark_dirty();
    }

    pub(crate) fn clear_live(&mut self) {
        self.live = CategorizedComments::new();
        self.live_feed.clear();
        self.mark_dirty();
    }

    pub(crate) fn push_chat_lines(&mut self, lines: Vec<ChatLine>) {
        if lines.is_empty() {
            return;
        }
        for line in lines {
            self.live.push(line.label, line.message.clone());
            if self.live_feed.len() == LIVE_FEED_LIMIT {
                self.live_feed.pop_front();
            }
            self.live_feed.push_back(line);
        }
        self.mark_dirty();
    }

    pub(crate) fn toggle_listings(&mut self) {
        self.show_listings = !self.show_listings;
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
