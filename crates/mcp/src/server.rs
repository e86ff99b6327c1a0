// MCP server loop (line-delimited JSON-RPC over stdio)

use crate::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo, ToolsCapability,
    PROTOCOL_VERSION,
};
use crate::tools::ToolRegistry;
use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

const SERVER_NAME: &str = "freispace";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP server dispatching tool invocations from stdin.
///
/// The registry is fixed at construction; each invocation runs to completion
/// independently with no shared mutable state.
pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Run the server until EOF on stdin.
    pub async fn run(&self) -> Result<()> {
        info!("MCP server listening on stdio");

        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut reader = BufReader::new(stdin);

        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                info!("EOF received, shutting down");
                break;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            debug!("Received: {}", line);

            if let Some(response) = self.handle_message(line).await {
                let response_json = serde_json::to_string(&response)?;
                debug!("Sending: {}", response_json);

                stdout.write_all(response_json.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }

        Ok(())
    }

    /// Handle a single JSON-RPC message. Notifications produce no response.
    async fn handle_message(&self, message: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(_) => {
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(),
                ))
            }
        };

        // Valid JSON that is not a request object (missing method, wrong
        // field types) is an invalid request, echoing the id when present.
        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(_) => {
                return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request()))
            }
        };

        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }

        Some(self.handle_request(request).await)
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.unwrap_or(Value::Null);
        let params = request.params.unwrap_or(Value::Null);

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, params).await,
            "ping" => JsonRpcResponse::success(id, json!({})),
            method => {
                warn!("Unknown method: {}", method);
                JsonRpcResponse::error(id, JsonRpcError::method_not_found(method))
            }
        }
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        info!("MCP server initialized");

        success(
            id,
            InitializeResult {
                protocol_version: PROTOCOL_VERSION.to_string(),
                capabilities: ServerCapabilities {
                    tools: Some(ToolsCapability {
                        list_changed: false,
                    }),
                },
                server_info: ServerInfo {
                    name: SERVER_NAME.to_string(),
                    version: SERVER_VERSION.to_string(),
                },
            },
        )
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        success(
            id,
            ListToolsResult {
                tools: self.registry.list_schemas(),
            },
        )
    }

    async fn handle_tools_call(&self, id: Value, params: Value) -> JsonRpcResponse {
        let params: CallToolParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid tools/call params: {}", e)),
                )
            }
        };

        let Some(tool) = self.registry.get(&params.name) else {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(format!("Unknown tool: {}", params.name)),
            );
        };

        debug!(tool = %params.name, "Calling tool");

        match tool.execute(params.arguments).await {
            Ok(result) => success(id, result),
            Err(e) => {
                // Logged once here, then surfaced unchanged to the caller.
                error!("Error executing tool {}: {:#}", params.name, e);
                success(id, CallToolResult::error(format!("{:#}", e)))
            }
        }
    }
}

/// Resolve when the process receives SIGINT or SIGTERM.
pub async fn shutdown_signal() -> Result<()> {
    let mut sigterm =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
    }

    Ok(())
}

fn success(id: Value, result: impl Serialize) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
    }
}
