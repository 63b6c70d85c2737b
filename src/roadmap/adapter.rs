use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::SiteError;
use crate::roadmap::chart_config::{build_config, ChartConfig};
use crate::roadmap::phases::{Segment, Timeline};
use crate::roadmap::popup::{PopupContent, PopupView};
use crate::utils::debounce::ResizeDebouncer;
use crate::utils::scheduler::{lock, Scheduler};
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Pointer,
    Default,
}

/// Canvas bounding box in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// The canvas and the charting library behind it.
pub trait ChartRenderer: Send {
    type Instance: Send;

    fn create(&mut self, config: &ChartConfig) -> Result<Self::Instance, SiteError>;
    /// Releases everything `create` allocated for `instance`.
    fn destroy(&mut self, instance: Self::Instance);
    fn set_cursor(&mut self, cursor: Cursor);
    fn bounds(&self) -> Rect;
}

/// Roadmap chart with its hover popup.
///
/// Owns at most one live chart instance; every render disposes the previous
/// one first, and dropping the adapter disposes the last.
pub struct RoadmapChart<R: ChartRenderer, P: PopupView> {
    renderer: R,
    popup: Option<P>,
    timeline: Timeline,
    segments: Vec<Segment>,
    instance: Option<R::Instance>,
    viewport: Viewport,
}

impl<R: ChartRenderer, P: PopupView> RoadmapChart<R, P> {
    pub fn new(renderer: R, popup: Option<P>, timeline: Timeline, viewport: Viewport) -> Self {
        let segments = timeline.segments();
        Self {
            renderer,
            popup,
            timeline,
            segments,
            instance: None,
            viewport,
        }
    }

    pub fn render(&mut self) -> Result<(), SiteError> {
        self.dispose();
        let config = build_config(&self.timeline, self.viewport);
        let instance = self.renderer.create(&config)?;
        self.instance = Some(instance);
        tracing::debug!(width = self.viewport.width, segments = self.segments.len(), "roadmap chart rendered");
        Ok(())
    }

    pub fn resize(&mut self, viewport: Viewport) -> Result<(), SiteError> {
        self.viewport = viewport;
        self.render()
    }

    /// Pointer moved over the chart; `hit` is the index of the segment under
    /// it, as reported by the chart library.
    pub fn hover(&mut self, hit: Option<usize>) {
        if self.instance.is_none() {
            return;
        }
        let Some(popup) = self.popup.as_mut() else {
            return;
        };
        match hit.and_then(|index| self.segments.get(index)) {
            Some(segment) => {
                self.renderer.set_cursor(Cursor::Pointer);
                popup.show(&PopupContent::from_segment(segment));
            }
            None => {
                self.renderer.set_cursor(Cursor::Default);
                if popup.is_visible() {
                    popup.hide();
                }
            }
        }
    }

    /// `mouseout` on the canvas at client coordinates. The popup only hides
    /// once the pointer is really outside the canvas box.
    pub fn pointer_out(&mut self, x: f64, y: f64) {
        let bounds = self.renderer.bounds();
        let Some(popup) = self.popup.as_mut() else {
            return;
        };
        if !bounds.contains(x, y) && popup.is_visible() {
            popup.hide();
        }
    }

    pub fn is_rendered(&self) -> bool {
        self.instance.is_some()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn popup(&self) -> Option<&P> {
        self.popup.as_ref()
    }

    fn dispose(&mut self) {
        if let Some(previous) = self.instance.take() {
            self.renderer.destroy(previous);
        }
    }
}

impl<R: ChartRenderer, P: PopupView> Drop for RoadmapChart<R, P> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Re-renders a shared chart after width-changing resizes.
pub fn watch_resize<R, P>(
    chart: &Arc<Mutex<RoadmapChart<R, P>>>,
    scheduler: Arc<dyn Scheduler>,
    quiet: Duration,
    initial_width: u32,
) -> ResizeDebouncer
where
    R: ChartRenderer + 'static,
    P: PopupView + 'static,
{
    let weak = Arc::downgrade(chart);
    ResizeDebouncer::new(
        scheduler,
        quiet,
        initial_width,
        Arc::new(move |width| {
            let Some(chart) = weak.upgrade() else {
                return;
            };
            let result = lock(&chart).resize(Viewport::new(width));
            if let Err(e) = result {
                tracing::error!("Failed to re-render roadmap chart: {}", e);
            }
        }),
    )
}
