use crate::app::App;
use crate::config::ServerConfig;
use crate::errors::{ErrorCode, McpError, ToolError};
use crate::mcp::catalog::{tool_catalog, validate_tool_args};
use crate::mcp::prompts::{get_prompt, list_prompts};
use crate::mcp::protocol::{text_content, JsonRpcRequest, JsonRpcResponse};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

const PROTOCOL_VERSION: &str = "2025-06-18";
const SERVER_NAME: &str = "ideogram-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct McpServer {
    app: Arc<App>,
}

impl McpServer {
    pub fn new(app: App) -> Self {
        Self { app: Arc::new(app) }
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {"listChanged": false}, "prompts": {"listChanged": false}},
            "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION},
        })
    }

    fn handle_tools_list(&self) -> Value {
        serde_json::json!({ "tools": tool_catalog() })
    }

    async fn handle_tools_call(&self, params: &Value) -> Result<Value, McpError> {
        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| McpError::new(ErrorCode::InvalidParams, "Missing tool name"))?;
        let args = match params.get("arguments") {
            None | Some(Value::Null) => Value::Object(Default::default()),
            Some(args) => args.clone(),
        };

        validate_tool_args(name, &args)?;
        let text = self
            .app
            .tool_executor
            .execute(name, args)
            .await
            .map_err(|err| McpError::from_tool_error(name, &err))?;
        Ok(text_content(text))
    }

    /// Result for one request line, or `None` when no reply is due.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.method.starts_with("notifications/") || request.is_notification() {
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);
        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => Ok(self.handle_tools_list()),
            "tools/call" => self.handle_tools_call(&request.params).await,
            "prompts/list" => Ok(list_prompts()),
            "prompts/get" => get_prompt(&request.params),
            _ => Err(McpError::new(ErrorCode::MethodNotFound, "Method not found")),
        };
        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => JsonRpcResponse::failure(id, err),
        })
    }

    /// Reply for one raw input line, or `None` for blank lines and notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let parsed: Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(_) => {
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    McpError::new(ErrorCode::ParseError, "Parse error"),
                ))
            }
        };
        let id = parsed.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(parsed) {
            Ok(request) => self.handle_request(request).await,
            Err(_) => Some(JsonRpcResponse::failure(
                id,
                McpError::new(ErrorCode::InvalidRequest, "Invalid request"),
            )),
        }
    }

    /// Serves line-delimited JSON-RPC until the input closes.
    pub async fn serve<R, W>(&self, input: R, output: W) -> Result<(), ToolError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut writer = BufWriter::new(output);
        while let Some(line) = lines.next_line().await? {
            if let Some(response) = self.handle_line(&line).await {
                let payload = serde_json::to_string(&response)
                    .map_err(|err| ToolError::internal(err.to_string()))?;
                writer.write_all(payload.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        Ok(())
    }

    pub async fn run_stdio(&self) -> Result<(), ToolError> {
        let logger = self.app.logger.child("server");
        logger.info(
            "Ideogram MCP server ready on stdio",
            Some(&serde_json::json!({ "tools": self.app.tool_executor.tool_names() })),
        );

        let served = self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
        tokio::select! {
            result = served => {
                logger.info("stdin closed, shutting down", None);
                result
            }
            signal = shutdown_signal() => {
                logger.info(&format!("{} received, shutting down", signal), None);
                Ok(())
            }
        }
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => tokio::select! {
            _ = wait_for_ctrl_c() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
        },
        Err(_) => {
            wait_for_ctrl_c().await;
            "SIGINT"
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    wait_for_ctrl_c().await;
    "Ctrl-C"
}

/// Never resolves when the handler cannot be installed.
async fn wait_for_ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

pub async fn run_stdio(config: ServerConfig) -> Result<(), ToolError> {
    let app = App::initialize(config)?;
    McpServer::new(app).run_stdio().await
}
