mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use roadmap_site::components::accordion::{AccordionPanel, ToggleIcon};
use roadmap_site::components::carousel::CarouselState;
use roadmap_site::components::router::{NavLink, SectionElement};
use roadmap_site::components::tabs::{TabItem, TabPane};
use roadmap_site::roadmap::adapter::{ChartRenderer, Cursor, Rect};
use roadmap_site::roadmap::chart_config::ChartConfig;
use roadmap_site::roadmap::phases::Timeline;
use roadmap_site::api::insights::InsightsOutcome;
use roadmap_site::roadmap::popup::{PopupContent, PopupView};
use roadmap_site::utils::scheduler::TokioScheduler;
use roadmap_site::{Dom, Site, SiteConfig, SiteError, SiteParts, Viewport};
use tokio::time::sleep;

use common::{FakeCarouselView, FakeInsightsPanel, FakeSlide};

struct Section {
    id: &'static str,
    active: bool,
}

impl SectionElement for Section {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

struct Link {
    href: &'static str,
    selected: bool,
}

impl NavLink for Link {
    fn href(&self) -> String {
        self.href.to_string()
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

struct Panel {
    max_height: Option<f64>,
}

impl AccordionPanel for Panel {
    fn scroll_height(&self) -> f64 {
        180.0
    }

    fn set_max_height(&mut self, height: Option<f64>) {
        self.max_height = height;
    }
}

struct Icon {
    expanded: bool,
}

impl ToggleIcon for Icon {
    fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }
}

struct Item {
    target: &'static str,
    highlighted: bool,
}

impl TabItem for Item {
    fn target(&self) -> Option<String> {
        Some(self.target.to_string())
    }

    fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }
}

struct Pane {
    id: &'static str,
    hidden: bool,
}

impl TabPane for Pane {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
}

#[derive(Default)]
struct Canvas {
    created: usize,
    live: usize,
    cursor: Option<Cursor>,
}

impl ChartRenderer for Canvas {
    type Instance = ();

    fn create(&mut self, _config: &ChartConfig) -> Result<(), SiteError> {
        self.created += 1;
        self.live += 1;
        Ok(())
    }

    fn destroy(&mut self, _instance: ()) {
        self.live -= 1;
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = Some(cursor);
    }

    fn bounds(&self) -> Rect {
        Rect {
            left: 0.0,
            top: 100.0,
            right: 900.0,
            bottom: 500.0,
        }
    }
}

#[derive(Default)]
struct Popup {
    shown: Option<PopupContent>,
}

impl PopupView for Popup {
    fn show(&mut self, content: &PopupContent) {
        self.shown = Some(content.clone());
    }

    fn hide(&mut self) {
        self.shown = None;
    }

    fn is_visible(&self) -> bool {
        self.shown.is_some()
    }
}

struct Page;

impl Dom for Page {
    type Section = Section;
    type Link = Link;
    type Panel = Panel;
    type Icon = Icon;
    type TabItem = Item;
    type TabPane = Pane;
    type CarouselView = FakeCarouselView;
    type Slide = FakeSlide;
    type Chart = Canvas;
    type Popup = Popup;
}

const SECTION_IDS: [&str; 4] = ["overview", "roadmap", "use-cases", "considerations"];
const HREFS: [&str; 4] = ["#overview", "#roadmap", "#use-cases", "#considerations"];

fn full_page(location: &str) -> SiteParts<Page> {
    SiteParts {
        location: location.to_string(),
        viewport: Viewport::new(1280),
        sections: SECTION_IDS
            .into_iter()
            .map(|id| Section { id, active: false })
            .collect(),
        nav_links: HREFS
            .into_iter()
            .map(|href| Link {
                href,
                selected: false,
            })
            .collect(),
        accordion: vec![
            (Some(Panel { max_height: None }), Some(Icon { expanded: false })),
            (Some(Panel { max_height: None }), None),
            (None, Some(Icon { expanded: false })),
        ],
        tab_items: vec![
            Item {
                target: "security",
                highlighted: false,
            },
            Item {
                target: "cost",
                highlighted: false,
            },
        ],
        tab_panes: vec![
            Pane {
                id: "security",
                hidden: false,
            },
            Pane {
                id: "cost",
                hidden: false,
            },
        ],
        carousel: Some((
            FakeCarouselView::new(),
            vec![FakeSlide::new(300.0), FakeSlide::new(350.0)],
        )),
        chart: Some((Canvas::default(), Some(Popup::default()))),
        timeline: Timeline::cloud_adoption(),
    }
}

fn mount(parts: SiteParts<Page>) -> Site<Page> {
    mount_with(parts, &SiteConfig::default())
}

fn mount_with(parts: SiteParts<Page>, config: &SiteConfig) -> Site<Page> {
    let scheduler = Arc::new(TokioScheduler::current().unwrap());
    Site::mount(parts, config, scheduler)
}

fn active_section(site: &Site<Page>) -> Vec<&'static str> {
    site.router
        .as_ref()
        .unwrap()
        .sections()
        .iter()
        .filter(|section| section.active)
        .map(|section| section.id)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn full_page_mounts_every_feature() {
    let mut site = mount(full_page("https://example.org/#roadmap"));

    assert_eq!(site.router.as_ref().unwrap().active(), "roadmap");
    assert_eq!(active_section(&site), vec!["roadmap"]);
    assert!(site.accordion.is_some());
    assert_eq!(site.tabs.as_ref().unwrap().selected(), 0);
    assert_eq!(site.carousel.as_ref().unwrap().state(), CarouselState::Idle);
    assert!(site.insights.is_some());

    let chart = site.chart.clone().unwrap();
    assert!(chart.lock().unwrap().is_rendered());
    assert_eq!(chart.lock().unwrap().renderer().live, 1);

    site.hash_changed("#use-cases");
    assert_eq!(active_section(&site), vec!["use-cases"]);
    site.nav_clicked("#considerations");
    assert_eq!(active_section(&site), vec!["considerations"]);
    site.hash_changed("#nowhere");
    assert_eq!(active_section(&site), vec!["overview"]);
}

#[tokio::test(start_paused = true)]
async fn accordion_keeps_one_panel_open() {
    let site = mount(full_page("/"));

    assert!(site.accordion_toggled(0));
    assert!(site.accordion_toggled(1));
    assert!(!site.accordion_toggled(2));

    let accordion = site.accordion.as_ref().unwrap().lock().unwrap();
    assert!(!accordion.is_open(0));
    assert_eq!(accordion.open_index(), Some(1));
}

#[tokio::test]
async fn insights_open_their_accordion_item_and_close_the_others() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let config = SiteConfig {
        insights_endpoint: format!("http://{}/api/generateInsights", listener.local_addr().unwrap()),
        ..SiteConfig::default()
    };
    drop(listener);
    let site = mount_with(full_page("/"), &config);
    assert!(site.accordion_toggled(1));

    let panel = Arc::new(Mutex::new(FakeInsightsPanel::titled("Migration", "Wave migrations")));
    let request = site.request_insights(0, panel.clone()).unwrap();
    assert_eq!(request.await, InsightsOutcome::Failed);

    {
        let accordion = site.accordion.as_ref().unwrap().lock().unwrap();
        assert_eq!(accordion.open_index(), Some(0));
        assert!(!accordion.is_open(1));
    }
    assert!(!panel.lock().unwrap().loading);

    // The accordion knows the item is open, so the next click closes it.
    assert!(!site.accordion_toggled(0));
    assert_eq!(site.accordion.as_ref().unwrap().lock().unwrap().open_index(), None);
}

#[tokio::test(start_paused = true)]
async fn insights_are_unavailable_without_an_endpoint() {
    let config = SiteConfig {
        insights_endpoint: "not a url".to_string(),
        ..SiteConfig::default()
    };
    let site = mount_with(full_page("/"), &config);
    let panel = Arc::new(Mutex::new(FakeInsightsPanel::titled("Migration", "")));

    assert!(site.insights.is_none());
    assert!(site.request_insights(0, panel).is_none());
    assert_eq!(site.accordion.as_ref().unwrap().lock().unwrap().open_index(), None);
}

#[tokio::test(start_paused = true)]
async fn missing_features_do_not_block_the_rest() {
    let mut parts = full_page("/");
    parts.carousel = None;
    parts.chart = None;
    parts.sections.retain(|section| section.id != "overview");
    parts.tab_panes.clear();

    let mut site = mount(parts);

    assert!(site.router.is_none());
    assert!(site.carousel.is_none());
    assert!(site.chart.is_none());
    assert!(site.tabs.is_none());
    assert!(site.accordion.is_some());
    assert!(site.insights.is_some());

    site.hash_changed("#roadmap");
    site.nav_clicked("#roadmap");
    site.resized(600);
    site.chart_hover(Some(0));
    site.chart_pointer_out(0.0, 0.0);
    sleep(Duration::from_millis(300)).await;
}

#[tokio::test(start_paused = true)]
async fn chart_hover_and_resize_through_the_site() {
    let site = mount(full_page("/"));
    let chart = site.chart.clone().unwrap();

    site.chart_hover(Some(0));
    {
        let chart = chart.lock().unwrap();
        assert_eq!(chart.renderer().cursor, Some(Cursor::Pointer));
        let shown = chart.popup().unwrap().shown.as_ref().unwrap();
        assert_eq!(shown.phase_name, chart.segments()[0].label);
    }

    site.chart_pointer_out(450.0, 300.0);
    assert!(chart.lock().unwrap().popup().unwrap().is_visible());
    site.chart_pointer_out(450.0, 600.0);
    assert!(!chart.lock().unwrap().popup().unwrap().is_visible());

    site.resized(1280);
    sleep(Duration::from_millis(300)).await;
    assert_eq!(chart.lock().unwrap().renderer().created, 1);

    site.resized(600);
    sleep(Duration::from_millis(300)).await;
    let chart = chart.lock().unwrap();
    assert_eq!(chart.renderer().created, 2);
    assert_eq!(chart.renderer().live, 1);
}

#[tokio::test(start_paused = true)]
async fn unknown_location_fragment_falls_back_to_default() {
    let site = mount(full_page("/index.html#does-not-exist"));
    assert_eq!(active_section(&site), vec!["overview"]);
    assert_eq!(site.router.as_ref().unwrap().active(), "overview");
}
