//! Bar chart configuration for the roadmap.
//!
//! Built as plain serialisable data. Per-point colours and the wrapped axis
//! labels are computed here instead of in chart callbacks, so the whole
//! configuration can be handed to the renderer as JSON.

use serde::Serialize;

use crate::roadmap::palette::{segment_border, segment_fill};
use crate::roadmap::phases::{Segment, Timeline};
use crate::viewport::Viewport;

pub const X_AXIS_TITLE: &str = "Timeline (Illustrative Months)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<AxisLabel>,
    pub datasets: Vec<Dataset>,
}

/// A category label, split over several lines when too long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AxisLabel {
    Single(String),
    Lines(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<Segment>,
    pub background_color: Vec<String>,
    pub border_color: Vec<String>,
    pub border_width: u32,
    pub bar_percentage: f64,
    pub category_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub index_axis: &'static str,
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub layout: Layout,
    pub scales: Scales,
    pub plugins: Plugins,
    pub events: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub padding: Padding,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Padding {
    pub top: u32,
    pub right: u32,
    pub left: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub x: XScale,
    pub y: YScale,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<&'static str>,
}

impl Font {
    fn sized(size: u32) -> Self {
        Self { size, weight: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub display: bool,
    pub text: &'static str,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XScale {
    pub title: AxisTitle,
    pub min: u32,
    pub max: u32,
    pub ticks: XTicks,
    pub stacked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XTicks {
    pub step_size: u32,
    pub font: Font,
    pub max_rotation: u32,
    pub min_rotation: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YScale {
    pub stacked: bool,
    pub ticks: YTicks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YTicks {
    pub auto_skip: bool,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub legend: Toggle,
    pub tooltip: TooltipToggle,
    pub annotation: Annotations,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toggle {
    pub display: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipToggle {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotations {
    pub clip: bool,
    pub draw_time: &'static str,
    pub annotations: Vec<PhaseMarker>,
}

/// Dashed vertical guide line at a phase start.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseMarker {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "scaleID")]
    pub scale_id: &'static str,
    pub value: u32,
    pub border_color: &'static str,
    pub border_width: f64,
    pub border_dash: [u32; 2],
    pub label: MarkerLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerLabel {
    pub display: bool,
    pub content: String,
    pub position: &'static str,
    pub font: Font,
    pub color: &'static str,
    pub background_color: &'static str,
    pub padding: LabelPadding,
    pub y_adjust: i32,
    pub x_adjust: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPadding {
    pub x: i32,
    pub y: i32,
}

/// Word-wraps a category label at `width` characters. Labels that fit are
/// returned as is.
pub fn wrap_label(label: &str, width: usize) -> AxisLabel {
    if label.chars().count() <= width {
        return AxisLabel::Single(label.to_string());
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in label.split(' ') {
        if current.chars().count() + word.chars().count() > width {
            lines.push(current.trim().to_string());
            current = format!("{} ", word);
        } else {
            current.push_str(word);
            current.push(' ');
        }
    }
    lines.push(current.trim().to_string());
    lines.retain(|line| !line.is_empty());
    AxisLabel::Lines(lines)
}

pub fn phase_markers(timeline: &Timeline, viewport: Viewport) -> Vec<PhaseMarker> {
    let small = viewport.is_small();
    timeline
        .phases()
        .iter()
        .enumerate()
        .map(|(index, phase)| PhaseMarker {
            kind: "line",
            scale_id: "x",
            value: phase.start,
            border_color: "rgba(0, 0, 0, 0.5)",
            border_width: 1.5,
            border_dash: [5, 5],
            label: MarkerLabel {
                display: !viewport.is_very_small(),
                content: format!("P{}", index),
                position: "start",
                font: Font {
                    size: if small { 8 } else { 9 },
                    weight: Some("normal"),
                },
                color: "#4A4A4A",
                background_color: "rgba(255, 255, 255, 0)",
                padding: LabelPadding { x: 1, y: -4 },
                y_adjust: -8,
                x_adjust: if phase.start == 0 {
                    0
                } else if small {
                    1
                } else {
                    2
                },
            },
        })
        .collect()
}

pub fn build_config(timeline: &Timeline, viewport: Viewport) -> ChartConfig {
    let small = viewport.is_small();
    let segments = timeline.segments();
    let wrap_width = viewport.pick(25, 18, 12);

    let dataset = Dataset {
        label: "Phases".to_string(),
        background_color: segments.iter().map(segment_fill).collect(),
        border_color: segments.iter().map(segment_border).collect(),
        data: segments,
        border_width: 1,
        bar_percentage: if small { 0.6 } else { 0.7 },
        category_percentage: if small { 0.7 } else { 0.8 },
    };

    ChartConfig {
        kind: "bar",
        data: ChartData {
            labels: timeline
                .phases()
                .iter()
                .map(|phase| wrap_label(&phase.name, wrap_width))
                .collect(),
            datasets: vec![dataset],
        },
        options: ChartOptions {
            index_axis: "y",
            responsive: true,
            maintain_aspect_ratio: false,
            layout: Layout {
                padding: Padding {
                    top: if small { 15 } else { 30 },
                    right: if small { 5 } else { 10 },
                    left: if small { 5 } else { 10 },
                },
            },
            scales: Scales {
                x: XScale {
                    title: AxisTitle {
                        display: true,
                        text: X_AXIS_TITLE,
                        font: Font::sized(if small { 10 } else { 12 }),
                    },
                    min: 0,
                    max: timeline.horizon(),
                    ticks: XTicks {
                        step_size: if small { 2 } else { 1 },
                        font: Font::sized(if small { 9 } else { 10 }),
                        max_rotation: 0,
                        min_rotation: 0,
                    },
                    stacked: false,
                },
                y: YScale {
                    stacked: false,
                    ticks: YTicks {
                        auto_skip: false,
                        font: Font::sized(if small { 9 } else { 11 }),
                    },
                },
            },
            plugins: Plugins {
                legend: Toggle { display: false },
                tooltip: TooltipToggle { enabled: false },
                annotation: Annotations {
                    clip: false,
                    draw_time: "afterDatasetsDraw",
                    annotations: phase_markers(timeline, viewport),
                },
            },
            events: vec!["mousemove", "mouseout", "click", "touchstart", "touchmove"],
        },
    }
}
