//! Page composition.
//!
//! Each feature is built from whatever elements the page provides. A missing
//! or broken feature is logged and left out; it never stops the others.

use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::api::insights::{InsightsClient, InsightsController, InsightsOutcome, InsightsPanel, PanelHost};
use crate::components::accordion::{Accordion, AccordionItem, AccordionPanel, ToggleIcon};
use crate::components::carousel::{Carousel, CarouselSettings, CarouselView, SlideElement};
use crate::components::router::{NavLink, SectionElement, SectionRouter};
use crate::components::tabs::{TabGroup, TabItem, TabPane};
use crate::config::SiteConfig;
use crate::roadmap::adapter::{watch_resize, ChartRenderer, RoadmapChart};
use crate::roadmap::phases::Timeline;
use crate::roadmap::popup::PopupView;
use crate::utils::debounce::ResizeDebouncer;
use crate::utils::scheduler::{lock, Scheduler};
use crate::viewport::Viewport;

/// Element types of one page implementation.
pub trait Dom: 'static {
    type Section: SectionElement + 'static;
    type Link: NavLink + 'static;
    type Panel: AccordionPanel + 'static;
    type Icon: ToggleIcon + 'static;
    type TabItem: TabItem + 'static;
    type TabPane: TabPane + 'static;
    type CarouselView: CarouselView + 'static;
    type Slide: SlideElement + 'static;
    type Chart: ChartRenderer + 'static;
    type Popup: PopupView + 'static;
}

/// Everything found on the page at startup.
pub struct SiteParts<D: Dom> {
    pub location: String,
    pub viewport: Viewport,
    pub sections: Vec<D::Section>,
    pub nav_links: Vec<D::Link>,
    pub accordion: Vec<(Option<D::Panel>, Option<D::Icon>)>,
    pub tab_items: Vec<D::TabItem>,
    pub tab_panes: Vec<D::TabPane>,
    pub carousel: Option<(D::CarouselView, Vec<D::Slide>)>,
    pub chart: Option<(D::Chart, Option<D::Popup>)>,
    pub timeline: Timeline,
}

pub struct Site<D: Dom> {
    pub router: Option<SectionRouter<D::Section, D::Link>>,
    pub accordion: Option<Arc<Mutex<Accordion<D::Panel, D::Icon>>>>,
    pub tabs: Option<TabGroup<D::TabItem, D::TabPane>>,
    pub carousel: Option<Carousel<D::CarouselView, D::Slide>>,
    pub chart: Option<Arc<Mutex<RoadmapChart<D::Chart, D::Popup>>>>,
    pub insights: Option<Arc<InsightsController>>,
    chart_resize: Option<ResizeDebouncer>,
}

impl<D: Dom> Site<D> {
    pub fn mount(parts: SiteParts<D>, config: &SiteConfig, scheduler: Arc<dyn Scheduler>) -> Self {
        let SiteParts {
            location,
            viewport,
            sections,
            nav_links,
            accordion,
            tab_items,
            tab_panes,
            carousel,
            chart,
            timeline,
        } = parts;

        let router = match SectionRouter::new(sections, nav_links, &config.default_section) {
            Ok(mut router) => {
                router.load(&location);
                Some(router)
            }
            Err(e) => {
                tracing::warn!("Section navigation disabled: {}", e);
                None
            }
        };

        let accordion = if accordion.is_empty() {
            None
        } else {
            Some(Arc::new(Mutex::new(Accordion::new(
                accordion
                    .into_iter()
                    .map(|(panel, icon)| AccordionItem::new(panel, icon))
                    .collect(),
            ))))
        };

        let tabs = TabGroup::mount(tab_items, tab_panes);

        let carousel = match carousel {
            Some((view, slides)) => Some(Carousel::mount(
                view,
                slides,
                scheduler.clone(),
                CarouselSettings::from(config),
                viewport,
            )),
            None => {
                tracing::debug!("no carousel on this page");
                None
            }
        };

        let (chart, chart_resize) = match chart {
            Some((renderer, popup)) => {
                let mut roadmap = RoadmapChart::new(renderer, popup, timeline, viewport);
                if let Err(e) = roadmap.render() {
                    tracing::error!("Failed to render roadmap chart: {}", e);
                }
                let shared = Arc::new(Mutex::new(roadmap));
                let resize = watch_resize(&shared, scheduler.clone(), config.resize_debounce, viewport.width);
                (Some(shared), Some(resize))
            }
            None => {
                tracing::warn!("Roadmap chart canvas not found");
                (None, None)
            }
        };

        let insights = match config
            .insights_endpoint()
            .map_err(|e| e.to_string())
            .and_then(|endpoint| {
                InsightsClient::new(endpoint, config.insights_timeout).map_err(|e| e.to_string())
            }) {
            Ok(client) => Some(Arc::new(InsightsController::new(client))),
            Err(e) => {
                tracing::warn!("Insights disabled: {}", e);
                None
            }
        };

        Self {
            router,
            accordion,
            tabs,
            carousel,
            chart,
            insights,
            chart_resize,
        }
    }

    /// Click on accordion toggle `index`.
    pub fn accordion_toggled(&self, index: usize) -> bool {
        self.accordion
            .as_ref()
            .map(|accordion| lock(accordion).toggle(index))
            .unwrap_or(false)
    }

    /// Insights button inside accordion item `index`. The item is opened
    /// through the accordion, closing any other, and re-measured once the
    /// panel content changes. Returns `None` when insights are disabled.
    pub fn request_insights<P>(
        &self,
        index: usize,
        panel: Arc<Mutex<P>>,
    ) -> Option<impl Future<Output = InsightsOutcome> + Send + 'static>
    where
        P: InsightsPanel + 'static,
    {
        let controller = self.insights.clone()?;
        let host = AccordionSlot {
            accordion: self.accordion.clone(),
            index,
        };
        Some(async move { controller.generate(index, &*panel, host).await })
    }

    pub fn hash_changed(&mut self, hash: &str) {
        if let Some(router) = self.router.as_mut() {
            router.hash_changed(hash);
        }
    }

    pub fn nav_clicked(&mut self, href: &str) {
        if let Some(router) = self.router.as_mut() {
            router.nav_clicked(href);
        }
    }

    /// Window `resize`. Both the carousel and the chart debounce on their own.
    pub fn resized(&self, width: u32) {
        if let Some(carousel) = self.carousel.as_ref() {
            carousel.resized(width);
        }
        if let Some(resize) = self.chart_resize.as_ref() {
            resize.on_resize(width);
        }
    }

    pub fn chart_hover(&self, hit: Option<usize>) {
        if let Some(chart) = self.chart.as_ref() {
            lock(chart).hover(hit);
        }
    }

    pub fn chart_pointer_out(&self, x: f64, y: f64) {
        if let Some(chart) = self.chart.as_ref() {
            lock(chart).pointer_out(x, y);
        }
    }
}

/// An accordion item hosting an insights panel.
struct AccordionSlot<P, I> {
    accordion: Option<Arc<Mutex<Accordion<P, I>>>>,
    index: usize,
}

impl<P: AccordionPanel, I: ToggleIcon> PanelHost for AccordionSlot<P, I> {
    fn expand(&mut self) {
        if let Some(accordion) = self.accordion.as_ref() {
            lock(accordion).expand(self.index);
        }
    }

    fn refresh_height(&mut self) {
        if let Some(accordion) = self.accordion.as_ref() {
            lock(accordion).refresh_height(self.index);
        }
    }
}
