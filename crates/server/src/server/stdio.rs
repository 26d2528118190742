//! stdio hosting for the MCP endpoint.

use std::sync::Arc;

use airbyte_widget_core::AppConfig;
use anyhow::{Context, Result};
use rmcp::ServiceExt;
use tracing::info;

use super::{AirbyteWidgetServer, ServerVariant};

/// Serve a variant over the line-oriented stdio channel until the host
/// closes it.
pub async fn serve_stdio(variant: ServerVariant, config: Arc<AppConfig>) -> Result<()> {
    info!(variant = variant.server_name(), "MCP stdio server starting");
    let server = AirbyteWidgetServer::new(variant, config);
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start stdio transport")?;
    service.waiting().await.context("stdio transport failed")?;
    Ok(())
}
