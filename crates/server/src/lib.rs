//! MCP server surface for the Airbyte embedded-widget demonstration.
//!
//! Exposes two server variants over the Model Context Protocol: one
//! returning a widget token rendered in an iframe, one returning the
//! static connector catalog rendered as a selectable grid. Each
//! variant serves a single tool plus one `ui://` HTML resource with
//! declared content-security-policy metadata.

pub mod server;

pub use server::{AirbyteWidgetServer, ServerVariant};
pub use server::http::{build_router, serve_http};
pub use server::stdio::serve_stdio;
