//! Two-hop token exchange against the Airbyte API.
//!
//! Each tool invocation performs both calls fresh: static credentials
//! are exchanged for a short-lived application token, which is then
//! exchanged for a widget token scoped to the configured workspace and
//! origin. No retries, no caching, no timeout override.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::{ExchangeError, ExchangeStage};

const APPLICATION_TOKEN_PATH: &str = "account/applications/token";
const WIDGET_TOKEN_PATH: &str = "embedded/widget-token";

/// Client for the two sequential exchange calls.
#[derive(Debug, Clone)]
pub struct TokenExchangeClient {
    http: reqwest::Client,
    config: Arc<AppConfig>,
}

impl TokenExchangeClient {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Exchange static credentials for a short-lived application token.
    pub async fn fetch_application_token(&self) -> Result<String, ExchangeError> {
        let stage = ExchangeStage::ApplicationToken;
        let url = self.endpoint(APPLICATION_TOKEN_PATH);
        let body = serde_json::json!({
            "client_id": self.config.credentials.client_id,
            "client_secret": self.config.credentials.client_secret,
        });

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|source| ExchangeError::Transport { stage, source })?;

        read_token_response(stage, response).await
    }

    /// Exchange an application token for a widget token bound to the
    /// configured workspace and allowed origin.
    pub async fn fetch_widget_token(&self, app_token: &str) -> Result<String, ExchangeError> {
        let stage = ExchangeStage::WidgetToken;
        let url = self.endpoint(WIDGET_TOKEN_PATH);
        let body = serde_json::json!({
            "workspace_name": self.config.credentials.external_user_id,
            "allowed_origin": self.config.allowed_origin,
        });

        let response = self
            .http
            .post(url)
            .bearer_auth(app_token)
            .json(&body)
            .send()
            .await
            .map_err(|source| ExchangeError::Transport { stage, source })?;

        read_token_response(stage, response).await
    }

    /// Run both exchange calls in sequence and return the widget token.
    pub async fn get_widget_token(&self) -> Result<String, ExchangeError> {
        let app_token = self.fetch_application_token().await?;
        debug!("application token acquired, requesting widget token");
        self.fetch_widget_token(&app_token).await
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.config.api_base.as_str().trim_end_matches('/');
        format!("{base}/{path}")
    }
}

async fn read_token_response(stage: ExchangeStage, response: reqwest::Response) -> Result<String, ExchangeError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ExchangeError::Status {
            stage,
            status: status.as_u16(),
        });
    }
    let text = response
        .text()
        .await
        .map_err(|source| ExchangeError::Transport { stage, source })?;
    extract_token(stage, &text)
}

/// Pull the token out of a 2xx response body.
///
/// The API is inconsistent about the field name, so both `token` and
/// `access_token` are accepted; anything else fails with the set of
/// keys actually observed, which is usually enough to spot a
/// wrong-endpoint or error-shaped body.
fn extract_token(stage: ExchangeStage, body: &str) -> Result<String, ExchangeError> {
    let value: Value = serde_json::from_str(body).map_err(|source| ExchangeError::MalformedBody { stage, source })?;
    let object = value
        .as_object()
        .ok_or_else(|| ExchangeError::MissingTokenField { stage, keys: Vec::new() })?;

    for field in ["token", "access_token"] {
        if let Some(Value::String(token)) = object.get(field) {
            return Ok(token.clone());
        }
    }

    Err(ExchangeError::MissingTokenField {
        stage,
        keys: object.keys().cloned().collect(),
    })
}
