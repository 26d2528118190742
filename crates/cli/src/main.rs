use std::sync::Arc;

use airbyte_widget_core::AppConfig;
use airbyte_widget_server::{serve_http, serve_stdio, ServerVariant};
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

/// MCP servers demonstrating the Airbyte embedded widget.
#[derive(Parser)]
#[command(name = "airbyte-widget-mcp", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Transport to host the server on.
    #[arg(long, global = true, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Port for the HTTP transport. Overrides MCP_PORT.
    #[arg(long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the iframe widget variant (`open-airbyte-widget`).
    Widget,
    /// Serve the connector grid variant (`show-connectors`).
    Connectors,
}

#[derive(Clone, Copy, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Arc::new(AppConfig::from_env()?);
    debug!(api_base = %config.api_base, "configuration resolved");

    let variant = match cli.command {
        Command::Widget => ServerVariant::Widget,
        Command::Connectors => ServerVariant::Connectors,
    };

    match cli.transport {
        Transport::Stdio => serve_stdio(variant, config).await,
        Transport::Http => {
            let port = cli.port.unwrap_or(config.mcp_port);
            serve_http(variant, config, port).await
        }
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
