use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::utils::suggest::suggest;

use serde_json::Value;

/// One MCP tool. Handlers return the text shown to the host; tool-level
/// failures (API errors, unreadable files) are part of that text, while
/// `ToolError` is reserved for bad arguments and server faults.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, args: Value) -> Result<String, ToolError>;
}

#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
}

impl ToolExecutor {
    pub fn new(logger: &Logger, handlers: HashMap<String, Arc<dyn ToolHandler>>) -> Self {
        Self {
            logger: logger.child("executor"),
            handlers: Arc::new(handlers),
        }
    }

    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn execute(&self, tool: &str, args: Value) -> Result<String, ToolError> {
        let Some(handler) = self.handlers.get(tool) else {
            let suggestions = suggest(tool, &self.tool_names(), 3);
            let hint = if suggestions.is_empty() {
                "Call tools/list to see available tools".to_string()
            } else {
                format!("Did you mean: {}", suggestions.join(", "))
            };
            return Err(ToolError::not_found(format!("Unknown tool: {}", tool)).with_hint(hint));
        };

        let trace_id = uuid::Uuid::new_v4().to_string();
        let started_at = chrono::Utc::now().timestamp_millis();
        self.logger.debug(
            "Tool call started",
            Some(&serde_json::json!({ "tool": tool, "trace_id": trace_id, "args": args })),
        );

        let outcome = handler.handle(args).await;
        let duration_ms = chrono::Utc::now().timestamp_millis() - started_at;
        match &outcome {
            Ok(_) => self.logger.info(
                "Tool call finished",
                Some(&serde_json::json!({
                    "tool": tool,
                    "trace_id": trace_id,
                    "duration_ms": duration_ms,
                })),
            ),
            Err(err) => self.logger.warn(
                "Tool call rejected",
                Some(&serde_json::json!({
                    "tool": tool,
                    "trace_id": trace_id,
                    "duration_ms": duration_ms,
                    "error": err,
                })),
            ),
        }
        outcome
    }
}
