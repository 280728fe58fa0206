//! YCSA engine: platform API access, model inference, monitoring, and report output.
mod engine;
mod http;
mod model;
mod monitor;
mod persist;
mod report;
mod source;
mod types;
mod youtube;

pub use engine::{EngineConfig, EngineHandle};
pub use http::{HttpSettings, JsonClient};
pub use model::{
    load_classifier, FeatureVector, LinearModel, ModelError, Norm, Predict, SentimentClassifier,
    TfidfVectorizer, Vectorize,
};
pub use monitor::{
    run_monitor, MonitorEvent, MonitorOutcome, MonitorSession, MonitorSettings, MonitorSink,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use report::{render_donut_svg, write_report, ReportError, ReportRequest, ReportSummary};
pub use source::{fetch_all_comments, CommentSource, LiveChatSource};
pub use types::{ApiError, ChatMessage, ChatPage, CommentPage, EngineEvent, FailureKind};
pub use youtube::{YouTubeApi, DEFAULT_API_BASE, MAX_PAGE_SIZE};
