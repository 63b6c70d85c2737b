use thiserror::Error;

use crate::roadmap::phases::PhaseError;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Missing element: {0}")]
    MissingElement(&'static str),
    #[error("No content sections to route between")]
    NoSections,
    #[error("Default section '{0}' is not one of the content sections")]
    UnknownDefaultSection(String),
    #[error("Invalid roadmap data: {0}")]
    Phase(#[from] PhaseError),
    #[error("Chart render failed: {0}")]
    Render(String),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} must be a number of milliseconds/seconds, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be greater than zero")]
    ZeroDuration { var: &'static str },
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Insights API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Response did not contain any generated text")]
    MissingText,
    #[error("Panel has no title to ask about")]
    MissingContext,
}

impl InsightsError {
    /// Text shown inline in the insights panel.
    pub fn user_message(&self) -> String {
        match self {
            InsightsError::Status { status, .. } => format!(
                "Sorry, insights could not be generated right now (HTTP {}). Please try again later.",
                status
            ),
            InsightsError::MissingContext => {
                "Sorry, there is nothing here to generate insights about.".to_string()
            }
            _ => "Sorry, insights could not be generated right now. Please try again later."
                .to_string(),
        }
    }
}
