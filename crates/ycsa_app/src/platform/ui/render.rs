use std::fmt::Write as _;

use ycsa_core::{AnalysisStatus, AppViewModel, MonitorState, SentimentChart};

use super::constants::*;

pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    let video = view.video_id.as_deref().unwrap_or("-");
    let _ = writeln!(out, "== YCSA == video: {video}");

    let analysis_label = match view.analysis_status {
        AnalysisStatus::Idle => "not analyzed",
        AnalysisStatus::Loading => "loading...",
        AnalysisStatus::Ready => "ready",
        AnalysisStatus::Failed => "failed",
    };
    let _ = writeln!(out, "\nComments ({analysis_label})");
    out.push_str(&render_chart(&view.comments_chart));

    let monitor_label = match (view.monitor, view.lookup_pending) {
        (MonitorState::Monitoring, _) => "monitoring",
        (MonitorState::Idle, true) => "looking up live chat...",
        (MonitorState::Idle, false) => "idle",
    };
    let _ = writeln!(out, "\nLive chat ({monitor_label})");
    out.push_str(&render_chart(&view.live_chart));

    if !view.live_feed.is_empty() {
        let _ = writeln!(out, "\nRecent chat");
        let skip = view.live_feed.len().saturating_sub(FEED_LINES_SHOWN);
        for line in &view.live_feed[skip..] {
            let _ = writeln!(
                out,
                "  [{:<7}] {}: {}",
                line.label.title(),
                line.author,
                line.message
            );
        }
    }

    if let Some(listings) = &view.listings {
        for listing in listings {
            let _ = writeln!(out, "\n{} ({})", listing.label.title(), listing.count);
            if !listing.text.is_empty() {
                let _ = writeln!(out, "{}", listing.text);
            }
        }
    }

    if !view.status.is_empty() {
        let _ = writeln!(out, "\n{}", view.status);
    }
    out
}

/// One proportional bar per segment; an empty chart renders zero-width bars.
fn render_chart(chart: &SentimentChart) -> String {
    let mut out = String::new();
    for segment in &chart.segments {
        let filled = bar_cells(segment.percent);
        let _ = writeln!(
            out,
            "  {:<7} [{}{}] {:>5} ({:>5.1}%)",
            segment.label.title(),
            "#".repeat(filled),
            ".".repeat(BAR_WIDTH - filled),
            segment.count,
            segment.percent
        );
    }
    let _ = writeln!(out, "  total {}", chart.total);
    out
}

fn bar_cells(percent: f64) -> usize {
    let cells = (percent.clamp(0.0, 100.0) / 100.0 * BAR_WIDTH as f64).round();
    (cells as usize).min(BAR_WIDTH)
}
