use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::api::insights_dtos::{GenerateContentRequest, GenerateContentResponse};
use crate::error::InsightsError;
use crate::utils::scheduler::lock;

/// Where insight requests go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightsEndpoint {
    /// Server-side proxy, e.g. `/api/generateInsights`, which holds the key.
    Proxy(Url),
    /// The generative API itself, authenticated with a `key` query parameter.
    Direct { url: Url, api_key: String },
}

impl InsightsEndpoint {
    pub fn request_url(&self) -> Url {
        match self {
            InsightsEndpoint::Proxy(url) => url.clone(),
            InsightsEndpoint::Direct { url, api_key } => {
                let mut url = url.clone();
                url.query_pairs_mut().append_pair("key", api_key);
                url
            }
        }
    }
}

/// Prompt for one roadmap/use-case panel.
pub fn build_prompt(title: &str, description: &str) -> String {
    format!(
        "You are advising a public sector organisation on its cloud adoption roadmap.\n\
         Topic: \"{}\"\n\
         Context: {}\n\n\
         Give three to five concise, practical insights for this topic: key benefits, \
         common risks and one recommended next step. Use short paragraphs or bullet points \
         separated by line breaks. Do not use markdown headings.",
        title.trim(),
        description.trim()
    )
}

/// Escapes the generated text and turns its line breaks into `<br>`.
pub fn render_insight_html(text: &str) -> String {
    let mut html = String::with_capacity(text.len() + 16);
    for c in text.trim().chars() {
        match c {
            '&' => html.push_str("&amp;"),
            '<' => html.push_str("&lt;"),
            '>' => html.push_str("&gt;"),
            '"' => html.push_str("&quot;"),
            '\'' => html.push_str("&#39;"),
            '\r' => {}
            '\n' => html.push_str("<br>"),
            other => html.push(other),
        }
    }
    html
}

pub struct InsightsClient {
    http: Client,
    endpoint: InsightsEndpoint,
}

impl InsightsClient {
    pub fn new(endpoint: InsightsEndpoint, timeout: Option<Duration>) -> Result<Self, InsightsError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &InsightsEndpoint {
        &self.endpoint
    }

    /// Sends `prompt` as a single user turn and returns the first candidate's text.
    pub async fn generate(&self, prompt: &str) -> Result<String, InsightsError> {
        let response = self
            .http
            .post(self.endpoint.request_url())
            .json(&GenerateContentRequest::user_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(InsightsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        parsed
            .first_text()
            .map(str::to_string)
            .ok_or(InsightsError::MissingText)
    }
}

/// The panel an insights button lives in.
pub trait InsightsPanel: Send {
    fn title(&self) -> Option<String>;
    fn description(&self) -> Option<String>;
    fn set_loading(&mut self, loading: bool);
    fn show_insight(&mut self, html: &str);
    fn show_error(&mut self, message: &str);
}

/// The collapsible container a panel sits in, usually an accordion item.
pub trait PanelHost: Send {
    /// Opens the container if it is collapsed.
    fn expand(&mut self);
    /// Re-measures the container after the panel content changed.
    fn refresh_height(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightsOutcome {
    Rendered,
    Failed,
    /// A newer request for the same panel was started while this one was in
    /// flight; its result was dropped.
    Superseded,
}

/// Runs insight requests for panels, identified by a caller-chosen key.
/// Per panel, only the most recently started request may write its result.
/// Requests for different panels never affect each other.
pub struct InsightsController {
    client: InsightsClient,
    next_ticket: AtomicU64,
    latest: Mutex<HashMap<usize, u64>>,
}

impl InsightsController {
    pub fn new(client: InsightsClient) -> Self {
        Self {
            client,
            next_ticket: AtomicU64::new(0),
            latest: Mutex::new(HashMap::new()),
        }
    }

    pub async fn generate<P, H>(&self, key: usize, panel: &Mutex<P>, mut host: H) -> InsightsOutcome
    where
        P: InsightsPanel,
        H: PanelHost,
    {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        lock(&self.latest).insert(key, ticket);

        host.expand();
        let prompt = {
            let mut panel = lock(panel);
            let title = panel.title().filter(|t| !t.trim().is_empty());
            let description = panel.description().unwrap_or_default();
            match title {
                Some(title) => {
                    panel.set_loading(true);
                    Some(build_prompt(&title, &description))
                }
                None => {
                    tracing::warn!(key, "insights requested for a panel without a title");
                    panel.set_loading(false);
                    panel.show_error(&InsightsError::MissingContext.user_message());
                    None
                }
            }
        };
        host.refresh_height();
        let Some(prompt) = prompt else {
            return InsightsOutcome::Failed;
        };

        tracing::debug!(key, ticket, "requesting insights");
        let result = self.client.generate(&prompt).await;

        if lock(&self.latest).get(&key) != Some(&ticket) {
            tracing::debug!(key, ticket, "dropping superseded insights response");
            return InsightsOutcome::Superseded;
        }

        let outcome = {
            let mut panel = lock(panel);
            panel.set_loading(false);
            match result {
                Ok(text) => {
                    panel.show_insight(&render_insight_html(&text));
                    InsightsOutcome::Rendered
                }
                Err(e) => {
                    tracing::error!("Failed to generate insights: {}", e);
                    panel.show_error(&e.user_message());
                    InsightsOutcome::Failed
                }
            }
        };
        host.refresh_height();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_escapes_and_breaks_lines() {
        assert_eq!(
            render_insight_html("Costs <drop> & risks\r\nfall\n"),
            "Costs &lt;drop&gt; &amp; risks<br>fall"
        );
    }

    #[test]
    fn prompt_embeds_title_and_description() {
        let prompt = build_prompt("  Migration ", "Wave migrations of the app portfolio");
        assert!(prompt.contains("Topic: \"Migration\""));
        assert!(prompt.contains("Context: Wave migrations of the app portfolio"));
    }

    #[test]
    fn direct_endpoint_carries_the_key() {
        let endpoint = InsightsEndpoint::Direct {
            url: Url::parse("https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent").unwrap(),
            api_key: "k 1".to_string(),
        };
        assert_eq!(endpoint.request_url().query(), Some("key=k+1"));

        let proxy = InsightsEndpoint::Proxy(Url::parse("http://localhost:3000/api/generateInsights").unwrap());
        assert_eq!(proxy.request_url().query(), None);
    }
}
