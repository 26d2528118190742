//! Core domain logic for the Airbyte embedded-widget MCP servers.
//!
//! This crate holds everything that does not depend on the MCP transport:
//! configuration and credential resolution, the two-hop token exchange
//! against the Airbyte API, the static connector catalog, widget-token
//! decoding, and the client renderer state machines.

pub mod config;
pub mod connectors;
pub mod error;
pub mod exchange;
pub mod renderer;
pub mod token;

pub use config::{AppConfig, ConfigError, Credentials};
pub use connectors::{ConnectorDescriptor, configure_url, connector_catalog};
pub use error::{ExchangeError, ExchangeStage, WidgetTokenError};
pub use exchange::TokenExchangeClient;
pub use renderer::{GridState, ToolOutcome, WidgetEvent, WidgetLifecycle, WidgetPhase};
pub use token::{WidgetPayload, decode_widget_token};
