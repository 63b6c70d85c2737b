use std::time::Duration;

use url::Url;

use crate::api::insights::InsightsEndpoint;
use crate::error::ConfigError;

pub const DEFAULT_SECTION: &str = "overview";
pub const DEFAULT_INSIGHTS_ENDPOINT: &str = "http://localhost:3000/api/generateInsights";
pub const DEFAULT_AUTOPLAY_INTERVAL: Duration = Duration::from_millis(7000);
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);
pub const DEFAULT_CAROUSEL_SETTLE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub insights_endpoint: String,
    /// Set only for the direct variant that talks to the generative API itself.
    pub gemini_api_key: Option<String>,
    pub insights_timeout: Option<Duration>,
    pub autoplay_interval: Duration,
    pub resize_debounce: Duration,
    pub carousel_settle: Duration,
    pub default_section: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            insights_endpoint: DEFAULT_INSIGHTS_ENDPOINT.to_string(),
            gemini_api_key: None,
            insights_timeout: None,
            autoplay_interval: DEFAULT_AUTOPLAY_INTERVAL,
            resize_debounce: DEFAULT_RESIZE_DEBOUNCE,
            carousel_settle: DEFAULT_CAROUSEL_SETTLE,
            default_section: DEFAULT_SECTION.to_string(),
        }
    }
}

impl SiteConfig {
    /// Loads `.env` if present, then overlays the process environment on the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = lookup("INSIGHTS_ENDPOINT") {
            Url::parse(&endpoint).map_err(|source| ConfigError::InvalidUrl {
                var: "INSIGHTS_ENDPOINT",
                source,
            })?;
            config.insights_endpoint = endpoint;
        }
        config.gemini_api_key = lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty());
        if let Some(ms) = parse_number(&lookup, "CAROUSEL_AUTOPLAY_MS")? {
            config.autoplay_interval = non_zero("CAROUSEL_AUTOPLAY_MS", Duration::from_millis(ms))?;
        }
        if let Some(ms) = parse_number(&lookup, "RESIZE_DEBOUNCE_MS")? {
            config.resize_debounce = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_number(&lookup, "INSIGHTS_TIMEOUT_SECS")? {
            config.insights_timeout = Some(non_zero("INSIGHTS_TIMEOUT_SECS", Duration::from_secs(secs))?);
        }
        if let Some(section) = lookup("DEFAULT_SECTION").filter(|s| !s.trim().is_empty()) {
            config.default_section = section.trim().trim_start_matches('#').to_string();
        }

        Ok(config)
    }

    pub fn insights_endpoint(&self) -> Result<InsightsEndpoint, ConfigError> {
        let url = Url::parse(&self.insights_endpoint).map_err(|source| ConfigError::InvalidUrl {
            var: "INSIGHTS_ENDPOINT",
            source,
        })?;
        Ok(match &self.gemini_api_key {
            Some(api_key) => InsightsEndpoint::Direct {
                url,
                api_key: api_key.clone(),
            },
            None => InsightsEndpoint::Proxy(url),
        })
    }
}

fn parse_number<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}

fn non_zero(var: &'static str, duration: Duration) -> Result<Duration, ConfigError> {
    if duration.is_zero() {
        Err(ConfigError::ZeroDuration { var })
    } else {
        Ok(duration)
    }
}
