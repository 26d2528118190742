//! Error types for the token exchange and widget-token decoding.
//!
//! The Display output of these enums is the user-facing message: tool
//! handlers forward it verbatim as the text of an error-flagged tool
//! result, so each variant carries enough context to diagnose a failure
//! from the message alone (HTTP status, observed response keys).

use thiserror::Error;

/// Which of the two sequential exchange calls produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeStage {
    ApplicationToken,
    WidgetToken,
}

impl std::fmt::Display for ExchangeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExchangeStage::ApplicationToken => write!(f, "application token"),
            ExchangeStage::WidgetToken => write!(f, "widget token"),
        }
    }
}

/// Authentication failures from either exchange call.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("{stage} request failed: {source}")]
    Transport {
        stage: ExchangeStage,
        #[source]
        source: reqwest::Error,
    },

    #[error("{stage} request failed with HTTP status {status}")]
    Status { stage: ExchangeStage, status: u16 },

    #[error("{stage} response body is not valid JSON: {source}")]
    MalformedBody {
        stage: ExchangeStage,
        #[source]
        source: serde_json::Error,
    },

    #[error("{stage} response has no string 'token' or 'access_token' field (keys present: [{}])", keys.join(", "))]
    MissingTokenField { stage: ExchangeStage, keys: Vec<String> },
}

/// Presentation failures while decoding a widget token payload.
#[derive(Debug, Error)]
pub enum WidgetTokenError {
    #[error("widget token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("widget token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("widget token payload is not a JSON object")]
    NotAnObject,

    #[error("widget token payload is missing a string 'widgetUrl' field")]
    MissingWidgetUrl,
}
