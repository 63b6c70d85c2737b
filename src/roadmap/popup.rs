use crate::roadmap::phases::Segment;

#[cfg(test)]
use mockall::automock;

pub const ROLLOFF_FALLBACK_ACTIVITY: &str = "General ongoing support and transition activities.";

/// What the hover popup shows for one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    pub phase_name: String,
    pub duration: String,
    pub timeframe: String,
    pub activities: Vec<String>,
}

impl PopupContent {
    pub fn from_segment(segment: &Segment) -> Self {
        let activities = if !segment.activities.is_empty() {
            segment
                .activities
                .split(", ")
                .map(|activity| activity.trim().to_string())
                .collect()
        } else if segment.is_rolloff {
            vec![ROLLOFF_FALLBACK_ACTIVITY.to_string()]
        } else {
            Vec::new()
        };
        Self {
            phase_name: segment.label.clone(),
            duration: format_duration(segment.duration_months()),
            timeframe: format!("(Months {} - {})", segment.start(), segment.end()),
            activities,
        }
    }
}

pub fn format_duration(months: u32) -> String {
    if months == 1 {
        "1 month".to_string()
    } else {
        format!("{} months", months)
    }
}

/// The info box next to the chart.
#[cfg_attr(test, automock)]
pub trait PopupView: Send {
    fn show(&mut self, content: &PopupContent);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
}
