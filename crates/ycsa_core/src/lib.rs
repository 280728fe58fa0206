//! YCSA core: sentiment domain types, aggregation, and the pure UI state machine.
mod buckets;
mod effect;
mod msg;
mod sentiment;
mod state;
mod update;
mod video_id;
mod view_model;

pub use buckets::{categorize, CategorizedComments, Comment};
pub use effect::{Effect, ReportSection};
pub use msg::Msg;
pub use sentiment::{ClassId, Classify, LabelMap, LabelSpaceError, SentimentLabel};
pub use state::{AnalysisState, AppState, ChatLine, MonitorState, RequestId, LIVE_FEED_LIMIT};
pub use update::update;
pub use video_id::parse_video_id;
pub use view_model::{
    format_bullets, AnalysisStatus, AppViewModel, BucketListing, ChartSegment, SentimentChart,
};
