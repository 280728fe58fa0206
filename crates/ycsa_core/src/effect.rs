use crate::{CategorizedComments, RequestId};

/// Buckets to export, tagged with the video they were collected from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub video_id: String,
    pub buckets: CategorizedComments,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchComments {
        request_id: RequestId,
        video_id: String,
    },
    /// Look up the active live chat and, if found, start polling it.
    StartMonitor {
        request_id: RequestId,
        video_id: String,
    },
    StopMonitor {
        request_id: RequestId,
    },
    /// Analyzed comments and live chat may come from different videos.
    ExportReport {
        comments: Option<ReportSection>,
        live: Option<ReportSection>,
    },
}
