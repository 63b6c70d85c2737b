//! Use-case carousel.
//!
//! The engine owns the slide index, the autoplay timer and the resize
//! debouncer. Rendering goes through [`CarouselView`]; slides are measured
//! through [`SlideElement`]. All state sits behind one mutex shared with the
//! timer callbacks, which only hold weak references to it.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use crate::config::SiteConfig;
use crate::utils::debounce::ResizeDebouncer;
use crate::utils::scheduler::{lock, Scheduler, TimerHandle};
use crate::viewport::Viewport;

#[cfg(test)]
use mockall::automock;

/// Horizontal travel a touch must exceed to count as a swipe.
pub const SWIPE_THRESHOLD_PX: f64 = 50.0;

/// Inline style properties overridden while a slide is measured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideStyle {
    pub position: Option<String>,
    pub visibility: Option<String>,
    pub display: Option<String>,
}

impl SlideStyle {
    fn measuring() -> Self {
        Self {
            position: Some("absolute".to_string()),
            visibility: Some("hidden".to_string()),
            display: Some("block".to_string()),
        }
    }
}

#[cfg_attr(test, automock)]
pub trait SlideElement: Send {
    fn style(&self) -> SlideStyle;
    fn set_style(&mut self, style: &SlideStyle);
    fn scroll_height(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselHeight {
    Auto,
    Px(f64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub index: usize,
    pub label: String,
    pub aria_label: String,
}

/// The carousel region and its controls. Implementations skip any control
/// that is missing from the markup.
pub trait CarouselView: Send {
    fn set_visible(&mut self, visible: bool);
    fn make_focusable(&mut self);
    fn set_height(&mut self, height: CarouselHeight);
    /// Horizontal offset of the slide strip in percent (`translateX`).
    fn set_offset_percent(&mut self, offset: f64);
    fn build_indicators(&mut self, indicators: &[Indicator]);
    fn set_indicator_active(&mut self, index: usize, active: bool);
    fn set_controls_visible(&mut self, visible: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselState {
    /// No slides; nothing will ever run.
    Disabled,
    Idle,
    Autoplaying,
    Paused,
}

#[derive(Debug, Clone)]
pub struct CarouselSettings {
    pub autoplay_interval: Duration,
    pub resize_debounce: Duration,
    /// Delay between first becoming visible and initialising, so fonts and
    /// images have settled before slides are measured.
    pub settle_delay: Duration,
}

impl From<&SiteConfig> for CarouselSettings {
    fn from(config: &SiteConfig) -> Self {
        Self {
            autoplay_interval: config.autoplay_interval,
            resize_debounce: config.resize_debounce,
            settle_delay: config.carousel_settle,
        }
    }
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self::from(&SiteConfig::default())
    }
}

/// Measures every slide off-screen and returns the tallest scroll height.
/// Each slide's inline style is restored afterwards.
pub fn measure_tallest<S: SlideElement>(slides: &mut [S]) -> f64 {
    let measuring = SlideStyle::measuring();
    let mut tallest: f64 = 0.0;
    for slide in slides.iter_mut() {
        let original = slide.style();
        slide.set_style(&measuring);
        tallest = tallest.max(slide.scroll_height());
        slide.set_style(&original);
    }
    tallest
}

/// Final carousel height for the tallest slide: room for the controls is
/// added and a floor applied, both smaller on narrow screens.
pub fn carousel_height(tallest: f64, viewport: Viewport) -> f64 {
    let padding = viewport.pick(150.0, 110.0, 90.0);
    let minimum = viewport.pick(450.0, 350.0, 320.0);
    (tallest + padding).max(minimum)
}

/// Index reached by moving `delta` slides from `index`, wrapping both ways.
pub fn wrap_index(index: usize, delta: isize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    (index as isize + delta).rem_euclid(count as isize) as usize
}

struct Inner<V, S> {
    view: V,
    slides: Vec<S>,
    index: usize,
    state: CarouselState,
    viewport: Viewport,
    settings: CarouselSettings,
    scheduler: Arc<dyn Scheduler>,
    autoplay: Option<TimerHandle>,
    autoplay_generation: u64,
    settle: Option<TimerHandle>,
    observed: bool,
    initialised: bool,
    touch_start_x: Option<f64>,
}

impl<V: CarouselView, S: SlideElement> Inner<V, S> {
    fn count(&self) -> usize {
        self.slides.len()
    }

    fn show(&mut self, index: isize) {
        if self.state == CarouselState::Disabled {
            return;
        }
        self.index = wrap_index(0, index, self.count());
        self.render();
    }

    fn step(&mut self, delta: isize) {
        let target = self.index as isize + delta;
        self.show(target);
    }

    fn render(&mut self) {
        self.view.set_offset_percent(-(self.index as f64 * 100.0));
        for i in 0..self.slides.len() {
            self.view.set_indicator_active(i, i == self.index);
        }
    }

    fn apply_height(&mut self) {
        if self.slides.is_empty() {
            self.view.set_height(CarouselHeight::Auto);
            return;
        }
        let tallest = measure_tallest(&mut self.slides);
        let height = carousel_height(tallest, self.viewport);
        tracing::debug!(tallest, height, width = self.viewport.width, "carousel height recomputed");
        self.view.set_height(CarouselHeight::Px(height));
    }

    fn stop_autoplay(&mut self) {
        if let Some(mut timer) = self.autoplay.take() {
            timer.cancel();
        }
        // Any tick already in flight sees a newer generation and does nothing.
        self.autoplay_generation += 1;
    }

    fn pause(&mut self) {
        self.stop_autoplay();
        if self.state != CarouselState::Disabled {
            self.state = CarouselState::Paused;
        }
    }
}

fn start_autoplay<V, S>(shared: &Arc<Mutex<Inner<V, S>>>, inner: &mut Inner<V, S>)
where
    V: CarouselView + 'static,
    S: SlideElement + 'static,
{
    inner.stop_autoplay();
    if inner.state == CarouselState::Disabled || inner.count() <= 1 {
        return;
    }
    let generation = inner.autoplay_generation;
    let weak: Weak<Mutex<Inner<V, S>>> = Arc::downgrade(shared);
    let timer = inner.scheduler.every(
        inner.settings.autoplay_interval,
        Box::new(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let mut inner = lock(&shared);
            if inner.autoplay_generation == generation {
                inner.step(1);
            }
        }),
    );
    inner.autoplay = Some(timer);
    inner.state = CarouselState::Autoplaying;
}

fn initialise<V, S>(shared: &Arc<Mutex<Inner<V, S>>>)
where
    V: CarouselView + 'static,
    S: SlideElement + 'static,
{
    let mut inner = lock(shared);
    if inner.initialised || inner.state == CarouselState::Disabled {
        return;
    }
    inner.initialised = true;
    inner.apply_height();
    inner.render();
    start_autoplay(shared, &mut inner);
    tracing::info!(slides = inner.count(), "carousel initialised");
}

/// Slide carousel with autoplay, see the module docs.
pub struct Carousel<V, S> {
    shared: Arc<Mutex<Inner<V, S>>>,
    resize: ResizeDebouncer,
}

impl<V, S> Carousel<V, S>
where
    V: CarouselView + 'static,
    S: SlideElement + 'static,
{
    /// Wires the carousel to its region. With no slides the region is hidden
    /// and the carousel stays disabled; with a single slide the navigation
    /// controls are hidden.
    pub fn mount(
        mut view: V,
        slides: Vec<S>,
        scheduler: Arc<dyn Scheduler>,
        settings: CarouselSettings,
        viewport: Viewport,
    ) -> Self {
        let state = if slides.is_empty() {
            tracing::warn!("no slides found for the carousel, disabling it");
            view.set_visible(false);
            CarouselState::Disabled
        } else {
            view.make_focusable();
            let indicators: Vec<Indicator> = (0..slides.len())
                .map(|index| Indicator {
                    index,
                    label: (index + 1).to_string(),
                    aria_label: format!("View use case {}", index + 1),
                })
                .collect();
            view.build_indicators(&indicators);
            if slides.len() <= 1 {
                view.set_controls_visible(false);
            }
            CarouselState::Idle
        };

        let resize_debounce = settings.resize_debounce;
        let shared = Arc::new(Mutex::new(Inner {
            view,
            slides,
            index: 0,
            state,
            viewport,
            settings,
            scheduler: scheduler.clone(),
            autoplay: None,
            autoplay_generation: 0,
            settle: None,
            observed: false,
            initialised: false,
            touch_start_x: None,
        }));
        if state != CarouselState::Disabled {
            lock(&shared).render();
        }

        let weak = Arc::downgrade(&shared);
        let resize = ResizeDebouncer::new(
            scheduler,
            resize_debounce,
            viewport.width,
            Arc::new(move |width| {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let mut inner = lock(&shared);
                inner.viewport = Viewport::new(width);
                if inner.state != CarouselState::Disabled {
                    inner.apply_height();
                }
            }),
        );

        Self { shared, resize }
    }

    /// The region intersected the viewport. Initialisation happens once,
    /// after the settle delay.
    pub fn became_visible(&self) {
        let mut inner = lock(&self.shared);
        if inner.observed || inner.state == CarouselState::Disabled {
            return;
        }
        inner.observed = true;
        let weak = Arc::downgrade(&self.shared);
        let settle = inner.scheduler.after(
            inner.settings.settle_delay,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    initialise(&shared);
                }
            }),
        );
        inner.settle = Some(settle);
    }

    pub fn next(&self) {
        lock(&self.shared).step(1);
    }

    pub fn prev(&self) {
        lock(&self.shared).step(-1);
    }

    /// Indicator click.
    pub fn go_to(&self, index: usize) {
        lock(&self.shared).show(index as isize);
    }

    pub fn key_down(&self, key: &str) {
        match key {
            "ArrowRight" => self.next(),
            "ArrowLeft" => self.prev(),
            _ => {}
        }
    }

    pub fn touch_start(&self, screen_x: f64) {
        lock(&self.shared).touch_start_x = Some(screen_x);
    }

    pub fn touch_end(&self, screen_x: f64) {
        let mut inner = lock(&self.shared);
        let Some(start) = inner.touch_start_x.take() else {
            return;
        };
        if screen_x - start > SWIPE_THRESHOLD_PX {
            inner.step(-1);
        } else if start - screen_x > SWIPE_THRESHOLD_PX {
            inner.step(1);
        }
    }

    pub fn pointer_enter(&self) {
        lock(&self.shared).pause();
    }

    pub fn pointer_leave(&self) {
        self.resume();
    }

    pub fn focus_in(&self) {
        lock(&self.shared).pause();
    }

    pub fn focus_out(&self) {
        self.resume();
    }

    pub fn resized(&self, width: u32) {
        if self.state() == CarouselState::Disabled {
            return;
        }
        self.resize.on_resize(width);
    }

    pub fn index(&self) -> usize {
        lock(&self.shared).index
    }

    pub fn slide_count(&self) -> usize {
        lock(&self.shared).count()
    }

    pub fn state(&self) -> CarouselState {
        lock(&self.shared).state
    }

    pub fn is_autoplaying(&self) -> bool {
        lock(&self.shared)
            .autoplay
            .as_ref()
            .map(TimerHandle::is_active)
            .unwrap_or(false)
    }

    /// Read access to the view, mostly for assertions.
    pub fn with_view<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&lock(&self.shared).view)
    }

    fn resume(&self) {
        let mut inner = lock(&self.shared);
        start_autoplay(&self.shared, &mut inner);
        if inner.state == CarouselState::Paused && inner.count() <= 1 {
            inner.state = CarouselState::Idle;
        }
    }
}
