//! UI resource delivery with content-security-policy metadata.
//!
//! Each variant serves one `ui://airbyte/*.html` resource whose body is
//! embedded at compile time and immutable for the process lifetime.
//! The CSP block is declarative metadata for the host sandbox — nothing
//! here enforces it.

use rmcp::model::{AnnotateAble, ErrorData, Meta, RawResource, ReadResourceResult, Resource, ResourceContents};
use serde_json::{Value, json};

use super::ServerVariant;

pub const WIDGET_RESOURCE_URI: &str = "ui://airbyte/widget.html";
pub const CONNECTORS_RESOURCE_URI: &str = "ui://airbyte/connectors.html";

/// MIME type MCP-apps hosts expect for widget HTML.
pub const WIDGET_MIME_TYPE: &str = "text/html+skybridge";

const WIDGET_HTML: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/widget.html"));
const CONNECTORS_HTML: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/connectors.html"));

/// Origins widget documents may load scripts, styles, and images from.
const RESOURCE_DOMAINS: [&str; 1] = ["https://cdn.airbyte.com"];
/// Origins widget scripts may fetch from.
const CONNECT_DOMAINS: [&str; 2] = ["https://api.airbyte.ai", "https://cloud.airbyte.com"];
/// Origins the iframe variant may embed. The grid variant embeds nothing.
const FRAME_DOMAINS: [&str; 2] = ["https://widget.airbyte.com", "https://cloud.airbyte.com"];

/// Build the single-entry resource list for a variant.
pub fn list_resources(variant: ServerVariant) -> rmcp::model::ListResourcesResult {
    rmcp::model::ListResourcesResult::with_all_items(vec![ui_resource(variant)])
}

/// Read a variant's UI resource by URI.
pub fn read_resource(variant: ServerVariant, uri: &str) -> Result<ReadResourceResult, ErrorData> {
    if uri != variant.resource_uri() {
        return Err(ErrorData::resource_not_found(
            format!("resource '{uri}' was not found"),
            Some(json!({ "uri": uri, "known_resources": [variant.resource_uri()] })),
        ));
    }
    Ok(ReadResourceResult {
        contents: vec![ResourceContents::TextResourceContents {
            uri: uri.to_string(),
            mime_type: Some(WIDGET_MIME_TYPE.to_string()),
            text: resource_body(variant).to_string(),
            meta: Some(csp_meta(variant)),
        }],
    })
}

fn resource_body(variant: ServerVariant) -> &'static str {
    match variant {
        ServerVariant::Widget => WIDGET_HTML,
        ServerVariant::Connectors => CONNECTORS_HTML,
    }
}

fn ui_resource(variant: ServerVariant) -> Resource {
    let (name, description) = match variant {
        ServerVariant::Widget => ("airbyte.widget", "Embedded Airbyte connector-configuration widget"),
        ServerVariant::Connectors => ("airbyte.connectors", "Selectable grid of available Airbyte connectors"),
    };
    RawResource {
        uri: variant.resource_uri().to_string(),
        name: name.to_string(),
        title: Some("Airbyte Embedded Widget".to_string()),
        description: Some(description.to_string()),
        mime_type: Some(WIDGET_MIME_TYPE.to_string()),
        size: None,
        icons: None,
        meta: Some(csp_meta(variant)),
    }
    .no_annotation()
}

/// Declared CSP allowlists. Frame origins only exist on the iframe
/// variant; the grid renders plain DOM and embeds nothing.
fn csp_meta(variant: ServerVariant) -> Meta {
    let mut csp = json!({
        "resource_domains": RESOURCE_DOMAINS,
        "connect_domains": CONNECT_DOMAINS,
    });
    if variant == ServerVariant::Widget {
        csp["frame_domains"] = json!(FRAME_DOMAINS);
    }
    let meta = json!({ "openai/widgetCSP": csp });
    Meta(meta.as_object().cloned().unwrap_or_default())
}
