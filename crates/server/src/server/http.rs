//! Stateless HTTP hosting for the MCP endpoint.
//!
//! `POST /mcp` is served by rmcp's streamable-HTTP service in stateless
//! mode: every request gets a freshly constructed server instance that
//! is discarded when the connection closes, so concurrent requests
//! share nothing but the immutable configuration. `GET` and `DELETE`
//! answer 405 with a fixed JSON-RPC error body — stateless mode has no
//! SSE stream or session to resume or delete.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use airbyte_widget_core::AppConfig;
use anyhow::{Context, Result};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::post_service;
use axum::Router;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{AirbyteWidgetServer, ServerVariant};

/// Build the axum router hosting one server variant at `/mcp`.
pub fn build_router(variant: ServerVariant, config: Arc<AppConfig>, cancellation_token: CancellationToken) -> Router {
    let service: StreamableHttpService<AirbyteWidgetServer, LocalSessionManager> = StreamableHttpService::new(
        move || Ok(AirbyteWidgetServer::new(variant, Arc::clone(&config))),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            stateful_mode: false,
            sse_keep_alive: None,
            cancellation_token: cancellation_token.child_token(),
            ..Default::default()
        },
    );

    Router::new().route(
        "/mcp",
        post_service(service).get(method_not_allowed).delete(method_not_allowed),
    )
}

/// Serve a variant over HTTP until ctrl-c.
pub async fn serve_http(variant: ServerVariant, config: Arc<AppConfig>, port: u16) -> Result<()> {
    let cancellation_token = CancellationToken::new();
    let router = build_router(variant, config, cancellation_token.clone());

    let bind_address = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    let bound_address = listener.local_addr()?;
    info!(variant = variant.server_name(), %bound_address, "MCP HTTP server listening");

    let shutdown = cancellation_token.child_token();
    let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
        shutdown.cancelled().await;
    });

    tokio::select! {
        result = serve => result.context("MCP HTTP server failed")?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested");
            cancellation_token.cancel();
        }
    }
    Ok(())
}

/// Fixed 405 body for the non-POST methods in stateless mode.
async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(serde_json::json!({
            "jsonrpc": "2.0",
            "error": {
                "code": -32000,
                "message": "Method not allowed."
            },
            "id": null
        })),
    )
}
