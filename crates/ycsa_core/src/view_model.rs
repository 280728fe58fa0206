use crate::{CategorizedComments, ChatLine, Comment, MonitorState, SentimentLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSegment {
    pub label: SentimentLabel,
    pub count: usize,
    /// Share of the total in percent; 0.0 when the chart is empty.
    pub percent: f64,
    pub color: &'static str,
}

/// Proportional summary with one segment per label, in display order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SentimentChart {
    pub segments: Vec<ChartSegment>,
    pub total: usize,
}

impl SentimentChart {
    pub fn from_buckets(buckets: &CategorizedComments) -> Self {
        let total = buckets.total();
        let segments = SentimentLabel::ALL
            .into_iter()
            .map(|label| {
                let count = buckets.count(label);
                let percent = if total > 0 {
                    count as f64 / total as f64 * 100.0
                } else {
                    0.0
                };
                ChartSegment {
                    label,
                    count,
                    percent,
                    color: label.color_hex(),
                }
            })
            .collect();
        Self { segments, total }
    }

    pub fn segment(&self, label: SentimentLabel) -> Option<&ChartSegment> {
        self.segments.iter().find(|segment| segment.label == label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketListing {
    pub label: SentimentLabel,
    pub count: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub input: String,
    pub video_id: Option<String>,
    pub monitor: MonitorState,
    pub lookup_pending: bool,
    pub analysis_status: AnalysisStatus,
    pub comments_chart: SentimentChart,
    pub live_chart: SentimentChart,
    pub live_feed: Vec<ChatLine>,
    pub listings: Option<Vec<BucketListing>>,
    pub status: String,
    pub dirty: bool,
}

/// One `- comment` line per comment.
pub fn format_bullets(comments: &[Comment]) -> String {
    comments
        .iter()
        .map(|comment| format!("- {comment}"))
        .collect::<Vec<_>>()
        .join("\n")
}
