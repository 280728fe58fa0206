use std::f64::consts::PI;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use ycsa_core::{ReportSection, SentimentChart};
use ycsa_logging::ycsa_info;

use crate::persist::{AtomicFileWriter, PersistError};

pub const COMMENTS_TITLE: &str = "Sentiment Distribution of YouTube Comments";
pub const LIVE_TITLE: &str = "Sentiment Distribution of YouTube Live Chat";
const CENTER_ANNOTATION: &str = "YCSA";

const WIDTH: f64 = 520.0;
const HEIGHT: f64 = 420.0;
const CX: f64 = 200.0;
const CY: f64 = 230.0;
// Outer radius 150, inner 60: a 0.4 hole.
const RING_RADIUS: f64 = 105.0;
const RING_WIDTH: f64 = 90.0;
const EMPTY_RING_COLOR: &str = "#dddddd";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub comments: Option<ReportSection>,
    pub live: Option<ReportSection>,
    pub generated_utc: String,
}

impl ReportRequest {
    /// Video the summary file is named after: the analyzed one, else the live one.
    pub fn report_video_id(&self) -> Option<&str> {
        self.comments
            .as_ref()
            .or(self.live.as_ref())
            .map(|section| section.video_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub json_path: PathBuf,
    pub chart_paths: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("video id {0:?} cannot be used in a file name")]
    InvalidVideoId(String),
    #[error("report has no sections")]
    Empty,
}

/// Renders a donut chart with one arc per non-empty segment.
///
/// An empty chart renders as a grey ring with zero counts in the legend.
pub fn render_donut_svg(chart: &SentimentChart, title: &str) -> String {
    let circumference = 2.0 * PI * RING_RADIUS;
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{x}" y="32" text-anchor="middle" font-family="sans-serif" font-size="18">{title}</text>"#,
        x = WIDTH / 2.0,
        title = escape_xml(title)
    );

    if chart.total == 0 {
        let _ = writeln!(
            svg,
            r#"  <circle cx="{CX}" cy="{CY}" r="{RING_RADIUS}" fill="none" stroke="{EMPTY_RING_COLOR}" stroke-width="{RING_WIDTH}"/>"#
        );
    } else {
        let mut offset = 0.0;
        for segment in chart.segments.iter().filter(|s| s.count > 0) {
            let length = circumference * segment.count as f64 / chart.total as f64;
            let _ = writeln!(
                svg,
                r#"  <circle class="segment" data-label="{label}" cx="{CX}" cy="{CY}" r="{RING_RADIUS}" fill="none" stroke="{color}" stroke-width="{RING_WIDTH}" stroke-dasharray="{length:.3} {circumference:.3}" stroke-dashoffset="{dashoffset:.3}" transform="rotate(-90 {CX} {CY})"/>"#,
                label = segment.label,
                color = segment.color,
                dashoffset = -offset,
            );
            offset += length;
        }
    }

    let _ = writeln!(
        svg,
        r#"  <text x="{CX}" y="{y}" text-anchor="middle" font-family="sans-serif" font-size="20">{CENTER_ANNOTATION}</text>"#,
        y = CY + 7.0
    );

    for (row, segment) in chart.segments.iter().enumerate() {
        let y = 150.0 + row as f64 * 32.0;
        let _ = writeln!(
            svg,
            r##"  <rect x="380" y="{rect_y}" width="18" height="18" fill="{color}" stroke="#333333"/>"##,
            rect_y = y - 14.0,
            color = segment.color
        );
        let _ = writeln!(
            svg,
            r#"  <text x="406" y="{y}" font-family="sans-serif" font-size="15">{label}: {count} ({percent:.1}%)</text>"#,
            label = segment.label,
            count = segment.count,
            percent = segment.percent
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Writes one SVG per present section, each named after its own video, plus
/// a JSON summary into `dir`.
pub fn write_report(dir: &Path, request: &ReportRequest) -> Result<ReportSummary, ReportError> {
    let sections = [
        ("comments", COMMENTS_TITLE, request.comments.as_ref()),
        ("live", LIVE_TITLE, request.live.as_ref()),
    ];
    for section in sections.iter().filter_map(|(_, _, section)| *section) {
        if !is_file_safe(&section.video_id) {
            return Err(ReportError::InvalidVideoId(section.video_id.clone()));
        }
    }
    let video_id = request.report_video_id().ok_or(ReportError::Empty)?;

    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let mut chart_paths = Vec::new();
    for (suffix, title, section) in sections {
        if let Some(section) = section {
            let chart = SentimentChart::from_buckets(&section.buckets);
            let path = writer.write(
                &format!("{}-{suffix}.svg", section.video_id),
                render_donut_svg(&chart, title),
            )?;
            chart_paths.push(path);
        }
    }

    let summary = json!({
        "video_id": video_id,
        "generated_utc": request.generated_utc,
        "comments": section_json(request.comments.as_ref()),
        "live_chat": section_json(request.live.as_ref()),
    });
    let json_path = writer.write(
        &format!("{video_id}-report.json"),
        serde_json::to_string_pretty(&summary)?,
    )?;

    ycsa_info!(
        "Wrote report for {} ({} charts) to {:?}",
        video_id,
        chart_paths.len(),
        writer.dir()
    );
    Ok(ReportSummary {
        json_path,
        chart_paths,
    })
}

fn is_file_safe(video_id: &str) -> bool {
    !video_id.is_empty()
        && video_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn section_json(section: Option<&ReportSection>) -> Value {
    let Some(section) = section else {
        return Value::Null;
    };
    let chart = SentimentChart::from_buckets(&section.buckets);
    let segments: Vec<Value> = chart
        .segments
        .iter()
        .map(|segment| {
            json!({
                "label": segment.label.title().to_lowercase(),
                "count": segment.count,
                "percent": segment.percent,
                "color": segment.color,
            })
        })
        .collect();
    let mut grouped = serde_json::Map::new();
    for (label, bucket) in section.buckets.iter() {
        grouped.insert(label.title().to_lowercase(), json!(bucket));
    }
    json!({
        "video_id": section.video_id,
        "total": chart.total,
        "segments": segments,
        "buckets": grouped,
    })
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ycsa_core::{CategorizedComments, SentimentLabel};

    #[test]
    fn empty_chart_renders_placeholder_ring() {
        let chart = SentimentChart::from_buckets(&CategorizedComments::new());
        let svg = render_donut_svg(&chart, COMMENTS_TITLE);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(EMPTY_RING_COLOR));
        assert!(!svg.contains("class=\"segment\""));
        assert!(svg.contains("Good: 0 (0.0%)"));
        assert!(svg.contains("Neutral: 0 (0.0%)"));
        assert!(svg.contains(">YCSA<"));
    }

    #[test]
    fn single_label_chart_draws_one_full_arc() {
        let mut buckets = CategorizedComments::new();
        buckets.push(SentimentLabel::Bad, "no");
        buckets.push(SentimentLabel::Bad, "nope");
        let svg = render_donut_svg(&SentimentChart::from_buckets(&buckets), "t");

        assert_eq!(svg.matches("class=\"segment\"").count(), 1);
        assert!(svg.contains("stroke=\"#ff0000\""));
        assert!(svg.contains("Bad: 2 (100.0%)"));
    }

    #[test]
    fn title_is_escaped() {
        let chart = SentimentChart::default();
        let svg = render_donut_svg(&chart, "a < b & \"c\"");
        assert!(svg.contains("a &lt; b &amp; &quot;c&quot;"));
    }
}
