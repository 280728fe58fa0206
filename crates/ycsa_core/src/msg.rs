use crate::{CategorizedComments, ChatLine, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the video URL input.
    InputChanged(String),
    /// User asked for a sentiment breakdown of the video's comments.
    AnalyzeClicked,
    /// User clicked Start Chat Monitoring.
    StartMonitoringClicked,
    /// User clicked Pause Chat Monitoring.
    PauseMonitoringClicked,
    /// User toggled the per-bucket comment listings.
    ListingsToggled,
    /// User asked for the current charts to be written to disk.
    ExportClicked,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Engine finished fetching and classifying comments.
    CommentsFetched {
        request_id: RequestId,
        result: Result<CategorizedComments, String>,
    },
    /// Engine finished the live-chat-id lookup. `None` means no active chat.
    LiveChatResolved {
        request_id: RequestId,
        live_chat_id: Option<String>,
    },
    /// Engine delivered a batch of classified chat messages.
    ChatBatch {
        request_id: RequestId,
        lines: Vec<ChatLine>,
    },
    /// Engine's monitor loop ended on its own (e.g. repeated poll failures).
    MonitorEnded {
        request_id: RequestId,
        reason: String,
    },
    /// Engine finished writing a report.
    ReportExported { result: Result<String, String> },
    /// Fallback for placeholder wiring.
    NoOp,
}
