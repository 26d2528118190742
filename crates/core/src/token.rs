//! Widget-token decoding.
//!
//! A widget token is an opaque string whose payload is base64-encoded
//! JSON containing at least a `widgetUrl` field — the address the
//! iframe renderer points at. Tokens are consumed once and never
//! persisted.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::error::WidgetTokenError;

/// Decoded widget-token payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetPayload {
    /// Address of the embedded configuration surface.
    pub widget_url: String,
    /// The full decoded JSON object, for callers that need other fields.
    pub raw: serde_json::Map<String, Value>,
}

/// Decode a widget token: base64, then JSON, then the required `widgetUrl`.
pub fn decode_widget_token(token: &str) -> Result<WidgetPayload, WidgetTokenError> {
    let bytes = STANDARD.decode(token.trim())?;
    let value: Value = serde_json::from_slice(&bytes)?;
    let object = value.as_object().ok_or(WidgetTokenError::NotAnObject)?;

    let widget_url = match object.get("widgetUrl") {
        Some(Value::String(url)) if !url.is_empty() => url.clone(),
        _ => return Err(WidgetTokenError::MissingWidgetUrl),
    };

    Ok(WidgetPayload {
        widget_url,
        raw: object.clone(),
    })
}
