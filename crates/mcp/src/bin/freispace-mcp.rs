// Standalone MCP server binary

use anyhow::Result;
use freispace_client::{ClientConfig, FreispaceClient};
use freispace_mcp::server::{shutdown_signal, McpServer};
use freispace_mcp::tools::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing. Stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Freispace MCP Server starting...");

    let config = ClientConfig::from_env()?;
    tracing::info!("Using API at {}", config.base_url);

    let client = Arc::new(FreispaceClient::new(config)?);

    // Register the read-only analytics tools
    let mut registry = ToolRegistry::new();

    // Staff tools
    registry.register(Arc::new(StaffsQueryTool::new(client.clone())));
    registry.register(Arc::new(StaffsWorkedTogetherTool::new(client.clone())));

    // Holiday tools
    registry.register(Arc::new(NextHolidaysTool::new(client.clone())));
    registry.register(Arc::new(HolidaysLeftTool::new(client.clone())));

    // Project tools
    registry.register(Arc::new(ProjectStatusTool::new(client.clone())));
    registry.register(Arc::new(StaffProjectsTool::new(client.clone())));
    registry.register(Arc::new(ProjectTeamTool::new(client.clone())));

    // Entity search
    registry.register(Arc::new(EntitySearchTool::new(client)));

    tracing::info!("Registered {} tools", registry.len());

    let server = McpServer::new(registry);

    tokio::select! {
        result = server.run() => {
            result?;
        }
        result = shutdown_signal() => {
            result?;
        }
    }

    Ok(())
}
