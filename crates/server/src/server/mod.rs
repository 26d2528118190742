//! Server handler shared by the two demonstration variants.

pub mod http;
pub mod resources;
pub mod stdio;

use std::sync::Arc;

use airbyte_widget_core::{AppConfig, TokenExchangeClient, connector_catalog};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorData, Implementation, JsonObject, ListResourcesResult,
    ListToolsResult, Meta, PaginatedRequestParams, ProtocolVersion, ReadResourceRequestParams, ReadResourceResult,
    ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

/// Which of the two demonstration servers this instance is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerVariant {
    /// `open-airbyte-widget`: returns the widget token; the UI resource
    /// renders it in an iframe.
    Widget,
    /// `show-connectors`: returns the static connector catalog; the UI
    /// resource renders a selectable grid.
    Connectors,
}

impl ServerVariant {
    pub fn tool_name(&self) -> &'static str {
        match self {
            ServerVariant::Widget => "open-airbyte-widget",
            ServerVariant::Connectors => "show-connectors",
        }
    }

    pub fn resource_uri(&self) -> &'static str {
        match self {
            ServerVariant::Widget => resources::WIDGET_RESOURCE_URI,
            ServerVariant::Connectors => resources::CONNECTORS_RESOURCE_URI,
        }
    }

    pub fn server_name(&self) -> &'static str {
        match self {
            ServerVariant::Widget => "airbyte-widget",
            ServerVariant::Connectors => "airbyte-connectors",
        }
    }
}

/// Structured output of `open-airbyte-widget`.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WidgetTokenOutput {
    pub widget_token: String,
}

/// Structured output of `show-connectors`.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorsOutput {
    /// The ten-entry catalog, pre-serialized for the grid script.
    pub connectors_json: String,
    /// Carried along for a future pre-authenticated browser handoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_token: Option<String>,
}

/// One MCP server instance. The HTTP transport constructs a fresh
/// instance per request and drops it when the connection closes, so
/// nothing here is shared across invocations except the immutable
/// configuration.
#[derive(Clone)]
pub struct AirbyteWidgetServer {
    variant: ServerVariant,
    exchange: TokenExchangeClient,
}

impl AirbyteWidgetServer {
    pub fn new(variant: ServerVariant, config: Arc<AppConfig>) -> Self {
        Self {
            variant,
            exchange: TokenExchangeClient::new(config),
        }
    }

    pub fn variant(&self) -> ServerVariant {
        self.variant
    }

    /// Run the exchange and shape the tool result for this variant.
    /// Exchange failures become error-flagged results whose text is the
    /// error message — the protocol's only error-reporting channel.
    async fn run_tool(&self) -> CallToolResult {
        match self.variant {
            ServerVariant::Widget => match self.exchange.get_widget_token().await {
                Ok(widget_token) => success_result(
                    "Airbyte widget token issued.",
                    &WidgetTokenOutput { widget_token },
                ),
                Err(error) => {
                    warn!(error = %error, "widget token exchange failed");
                    error_result(error.to_string())
                }
            },
            ServerVariant::Connectors => match self.exchange.get_widget_token().await {
                Ok(widget_token) => {
                    let catalog = connector_catalog();
                    let connectors_json = match serde_json::to_string(&catalog) {
                        Ok(json) => json,
                        Err(error) => return error_result(format!("failed to serialize connector catalog: {error}")),
                    };
                    success_result(
                        &format!("{} connectors available.", catalog.len()),
                        &ConnectorsOutput {
                            connectors_json,
                            widget_token: Some(widget_token),
                        },
                    )
                }
                Err(error) => {
                    warn!(error = %error, "widget token exchange failed");
                    error_result(error.to_string())
                }
            },
        }
    }

    fn tool_description(&self) -> &'static str {
        match self.variant {
            ServerVariant::Widget => {
                "Open the Airbyte embedded widget for configuring data connectors. \
                 Returns a widget token; the widget UI renders the configuration surface inline."
            }
            ServerVariant::Connectors => {
                "Show the available Airbyte connectors as a selectable grid. \
                 Returns the connector catalog plus a widget token."
            }
        }
    }

    fn tool(&self) -> Tool {
        let output_schema = match self.variant {
            ServerVariant::Widget => schema_object::<WidgetTokenOutput>(),
            ServerVariant::Connectors => schema_object::<ConnectorsOutput>(),
        };
        Tool {
            name: self.variant.tool_name().into(),
            title: None,
            description: Some(self.tool_description().into()),
            input_schema: Arc::new(empty_object_schema()),
            output_schema: output_schema.map(Arc::new),
            annotations: None,
            icons: None,
            execution: None,
            meta: Some(Meta(meta_object(json!({
                "openai/outputTemplate": self.variant.resource_uri(),
            })))),
        }
    }
}

impl ServerHandler for AirbyteWidgetServer {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: vec![self.tool()],
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        if request.name != self.variant.tool_name() {
            return Err(ErrorData::invalid_params(
                format!("unknown tool '{}'", request.name),
                Some(json!({ "known_tools": [self.variant.tool_name()] })),
            ));
        }
        Ok(self.run_tool().await)
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(resources::list_resources(self.variant)))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, ErrorData>> + Send + '_ {
        std::future::ready(resources::read_resource(self.variant, &request.uri))
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().enable_resources().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: self.variant.server_name().to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Airbyte Embedded Widget".to_string()),
                ..Default::default()
            },
            instructions: Some(match self.variant {
                ServerVariant::Widget => {
                    "Call open-airbyte-widget when the user wants to connect or configure a data \
                     source. The result renders the Airbyte configuration widget inline."
                        .to_string()
                }
                ServerVariant::Connectors => {
                    "Call show-connectors when the user wants to browse available data connectors. \
                     The result renders a selectable connector grid."
                        .to_string()
                }
            }),
        }
    }
}

fn success_result<T: Serialize>(text: &str, output: &T) -> CallToolResult {
    let structured = serde_json::to_value(output).unwrap_or(Value::Null);
    CallToolResult {
        content: vec![Content::text(text.to_string())],
        is_error: Some(false),
        structured_content: Some(structured),
        meta: None,
    }
}

fn error_result(message: String) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(message)],
        is_error: Some(true),
        structured_content: None,
        meta: None,
    }
}

fn empty_object_schema() -> JsonObject {
    meta_object(json!({ "type": "object", "properties": {} }))
}

fn schema_object<T: JsonSchema>() -> Option<JsonObject> {
    serde_json::to_value(schemars::schema_for!(T))
        .ok()
        .and_then(|value| value.as_object().cloned())
}

fn meta_object(value: Value) -> JsonObject {
    value.as_object().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use airbyte_widget_core::Credentials;

    fn test_server(variant: ServerVariant) -> AirbyteWidgetServer {
        let config = AppConfig::with_values(
            Credentials {
                client_id: "id".into(),
                client_secret: "secret".into(),
                external_user_id: "user".into(),
            },
            "http://localhost:3000".into(),
            3000,
            url::Url::parse("http://127.0.0.1:1/api/v1").expect("test url"),
        );
        AirbyteWidgetServer::new(variant, Arc::new(config))
    }

    #[test]
    fn tool_meta_links_to_the_ui_resource() {
        for variant in [ServerVariant::Widget, ServerVariant::Connectors] {
            let tool = test_server(variant).tool();
            assert_eq!(tool.name, variant.tool_name());
            let meta = tool.meta.expect("tool meta");
            assert_eq!(
                meta.0.get("openai/outputTemplate").and_then(Value::as_str),
                Some(variant.resource_uri()),
            );
        }
    }

    #[test]
    fn tool_declares_an_output_schema() {
        let tool = test_server(ServerVariant::Widget).tool();
        let schema = tool.output_schema.expect("output schema");
        let properties = schema.get("properties").and_then(Value::as_object).expect("properties");
        assert!(properties.contains_key("widgetToken"));
    }

    #[test]
    fn each_variant_advertises_its_own_tool() {
        assert_eq!(ServerVariant::Widget.tool_name(), "open-airbyte-widget");
        assert_eq!(ServerVariant::Connectors.tool_name(), "show-connectors");
        assert_eq!(ServerVariant::Widget.resource_uri(), "ui://airbyte/widget.html");
        assert_eq!(ServerVariant::Connectors.resource_uri(), "ui://airbyte/connectors.html");
    }

    #[test]
    fn success_result_carries_structured_content() {
        let result = success_result(
            "ok",
            &WidgetTokenOutput {
                widget_token: "tok".into(),
            },
        );
        assert_eq!(result.is_error, Some(false));
        let structured = result.structured_content.expect("structured content");
        assert_eq!(structured.get("widgetToken").and_then(Value::as_str), Some("tok"));
    }

    #[test]
    fn error_result_is_flagged_with_text_only() {
        let result = error_result("application token request failed with HTTP status 500".into());
        assert_eq!(result.is_error, Some(true));
        assert!(result.structured_content.is_none());
    }

    #[test]
    fn connectors_output_round_trips_the_catalog() {
        let catalog = connector_catalog();
        let output = ConnectorsOutput {
            connectors_json: serde_json::to_string(&catalog).unwrap(),
            widget_token: None,
        };
        let restored: Vec<airbyte_widget_core::ConnectorDescriptor> =
            serde_json::from_str(&output.connectors_json).unwrap();
        assert_eq!(restored, catalog);
    }

    #[test]
    fn tool_output_uses_camel_case_keys() {
        let value = serde_json::to_value(ConnectorsOutput {
            connectors_json: "[]".into(),
            widget_token: Some("tok".into()),
        })
        .unwrap();
        assert!(value.get("connectorsJson").is_some());
        assert!(value.get("widgetToken").is_some());
        assert!(value.get("connectors_json").is_none());
    }
}
