pub mod config;
pub mod error;
pub mod site;
pub mod telemetry;
pub mod viewport;
pub mod utils {
    pub mod debounce;
    pub mod scheduler;
}
pub mod components {
    pub mod accordion;
    pub mod carousel;
    pub mod router;
    pub mod tabs;
}
pub mod roadmap {
    pub mod adapter;
    pub mod chart_config;
    pub mod palette;
    pub mod phases;
    pub mod popup;
}
pub mod api {
    pub mod insights;
    pub mod insights_dtos;
}

pub use config::SiteConfig;
pub use error::{ConfigError, InsightsError, SiteError};
pub use site::{Dom, Site, SiteParts};
pub use viewport::Viewport;
