#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use roadmap_site::api::insights::{InsightsPanel, PanelHost};
use roadmap_site::components::carousel::{
    CarouselHeight, CarouselView, Indicator, SlideElement, SlideStyle,
};
use roadmap_site::utils::scheduler::{Cancel, Scheduler, TimerHandle, TokioScheduler};

/// Tokio scheduler that counts live interval timers.
#[derive(Clone)]
pub struct CountingScheduler {
    inner: TokioScheduler,
    pub live: Arc<AtomicUsize>,
    pub max_live: Arc<AtomicUsize>,
    pub started: Arc<AtomicUsize>,
}

impl CountingScheduler {
    pub fn new() -> Self {
        Self {
            inner: TokioScheduler::current().expect("inside a tokio runtime"),
            live: Arc::new(AtomicUsize::new(0)),
            max_live: Arc::new(AtomicUsize::new(0)),
            started: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

struct Counted {
    handle: TimerHandle,
    live: Arc<AtomicUsize>,
}

impl Cancel for Counted {
    fn cancel(mut self: Box<Self>) {
        self.handle.cancel();
    }

    fn is_finished(&self) -> bool {
        !self.handle.is_active()
    }
}

impl Drop for Counted {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Scheduler for CountingScheduler {
    fn every(&self, period: Duration, tick: Box<dyn FnMut() + Send>) -> TimerHandle {
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_live.fetch_max(live, Ordering::SeqCst);
        self.started.fetch_add(1, Ordering::SeqCst);
        TimerHandle::new(Counted {
            handle: self.inner.every(period, tick),
            live: self.live.clone(),
        })
    }

    fn after(&self, delay: Duration, fire: Box<dyn FnOnce() + Send>) -> TimerHandle {
        self.inner.after(delay, fire)
    }
}

#[derive(Debug, Default)]
pub struct FakeCarouselView {
    pub visible: bool,
    pub focusable: bool,
    pub controls_visible: bool,
    pub heights: Vec<CarouselHeight>,
    pub offset: f64,
    pub indicators: Vec<Indicator>,
    pub active_indicators: Vec<bool>,
}

impl FakeCarouselView {
    pub fn new() -> Self {
        Self {
            visible: true,
            controls_visible: true,
            ..Default::default()
        }
    }

    pub fn active_indicator(&self) -> Option<usize> {
        let active: Vec<usize> = self
            .active_indicators
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(i, _)| i)
            .collect();
        assert!(active.len() <= 1, "more than one indicator highlighted");
        active.first().copied()
    }
}

impl CarouselView for FakeCarouselView {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn make_focusable(&mut self) {
        self.focusable = true;
    }

    fn set_height(&mut self, height: CarouselHeight) {
        self.heights.push(height);
    }

    fn set_offset_percent(&mut self, offset: f64) {
        self.offset = offset;
    }

    fn build_indicators(&mut self, indicators: &[Indicator]) {
        self.indicators = indicators.to_vec();
        self.active_indicators = vec![false; indicators.len()];
    }

    fn set_indicator_active(&mut self, index: usize, active: bool) {
        if let Some(slot) = self.active_indicators.get_mut(index) {
            *slot = active;
        }
    }

    fn set_controls_visible(&mut self, visible: bool) {
        self.controls_visible = visible;
    }
}

#[derive(Debug, Clone)]
pub struct FakeSlide {
    pub height: f64,
    pub style: SlideStyle,
}

impl FakeSlide {
    pub fn new(height: f64) -> Self {
        Self {
            height,
            style: SlideStyle {
                display: Some("flex".to_string()),
                ..Default::default()
            },
        }
    }
}

impl SlideElement for FakeSlide {
    fn style(&self) -> SlideStyle {
        self.style.clone()
    }

    fn set_style(&mut self, style: &SlideStyle) {
        self.style = style.clone();
    }

    fn scroll_height(&self) -> f64 {
        // Only measurable while forced into an off-screen block.
        if self.style.display.as_deref() == Some("block") {
            self.height
        } else {
            0.0
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeInsightsPanel {
    pub title: Option<String>,
    pub description: Option<String>,
    pub loading: bool,
    pub loading_changes: usize,
    pub html: Option<String>,
    pub error: Option<String>,
}

impl FakeInsightsPanel {
    pub fn titled(title: &str, description: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            ..Default::default()
        }
    }
}

impl InsightsPanel for FakeInsightsPanel {
    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn description(&self) -> Option<String> {
        self.description.clone()
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.loading_changes += 1;
    }

    fn show_insight(&mut self, html: &str) {
        self.error = None;
        self.html = Some(html.to_string());
    }

    fn show_error(&mut self, message: &str) {
        self.html = None;
        self.error = Some(message.to_string());
    }
}

/// Panel host that records what the insights flow asked of it.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub calls: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

impl PanelHost for RecordingHost {
    fn expand(&mut self) {
        self.calls.lock().unwrap().push("expand");
    }

    fn refresh_height(&mut self) {
        self.calls.lock().unwrap().push("refresh_height");
    }
}
