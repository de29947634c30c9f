// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tool registry and dispatch.
//!
//! All tools an agent can call, whether backed by an MCP server, a direct
//! HTTP API, or another agent, implement [`ToolHandler`] and live in a
//! [`ToolRegistry`]. The agent loop dispatches model tool calls through the
//! registry and feeds the results back as tool result blocks.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ToolError;
use crate::types::{ContentBlock, ToolCall, ToolDefinition};

/// A handler that executes a single tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The tool definition advertised to the model.
    fn definition(&self) -> ToolDefinition;

    /// Whether this tool mutates external state.
    fn is_mutating(&self) -> bool {
        false
    }

    /// Execute the tool with the given input.
    async fn execute(&self, input: serde_json::Value) -> Result<String, ToolError>;
}

/// Result of dispatching a single tool call.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    /// The tool call this result answers.
    pub tool_use_id: String,

    /// Tool name.
    pub name: String,

    /// Result text (or error message).
    pub content: String,

    /// Whether execution failed.
    pub is_error: bool,
}

impl DispatchResult {
    /// Convert into a tool result content block.
    pub fn into_block(self) -> ContentBlock {
        ContentBlock::ToolResult {
            tool_use_id: self.tool_use_id,
            name: self.name,
            content: self.content,
            is_error: self.is_error,
        }
    }
}

/// Registry of tools available to an agent.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
    /// Registration order, so definitions are advertised deterministically.
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its definition name.
    ///
    /// A later registration with the same name replaces the earlier one.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        let name = handler.definition().name;
        if self.handlers.insert(name.clone(), handler).is_some() {
            warn!(tool = %name, "tool handler replaced");
        } else {
            self.order.push(name);
        }
    }

    /// Get a handler by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.handlers.get(name)
    }

    /// Whether the registry has any tools.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Registered tool names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Tool definitions for the model, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.handlers.get(name))
            .map(|h| h.definition())
            .collect()
    }

    /// Dispatch a tool call to its handler.
    ///
    /// Handler errors become error results rather than bubbling up; the
    /// model sees the failure and can adjust.
    pub async fn dispatch(&self, call: &ToolCall) -> DispatchResult {
        let Some(handler) = self.handlers.get(&call.name) else {
            warn!(tool = %call.name, "unknown tool requested");
            return DispatchResult {
                tool_use_id: call.id.clone(),
                name: call.name.clone(),
                content: ToolError::NotFound(call.name.clone()).to_string(),
                is_error: true,
            };
        };

        debug!(
            tool = %call.name,
            id = %call.id,
            mutating = handler.is_mutating(),
            "dispatching tool call"
        );

        match handler.execute(call.input.clone()).await {
            Ok(content) => DispatchResult {
                tool_use_id: call.id.clone(),
                name: call.name.clone(),
                content,
                is_error: false,
            },
            Err(e) => {
                warn!(tool = %call.name, error = %e, "tool execution failed");
                DispatchResult {
                    tool_use_id: call.id.clone(),
                    name: call.name.clone(),
                    content: e.to_string(),
                    is_error: true,
                }
            }
        }
    }
}

/// Builder for assembling a registry from heterogeneous tool sources.
#[derive(Default)]
pub struct ToolRegistryBuilder {
    registry: ToolRegistry,
}

impl ToolRegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single handler.
    pub fn with_handler(mut self, handler: Arc<dyn ToolHandler>) -> Self {
        self.registry.register(handler);
        self
    }

    /// Add a batch of handlers.
    pub fn with_handlers(
        mut self,
        handlers: impl IntoIterator<Item = Arc<dyn ToolHandler>>,
    ) -> Self {
        for handler in handlers {
            self.registry.register(handler);
        }
        self
    }

    /// Finish building.
    pub fn build(self) -> ToolRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InputSchema;

    struct EchoHandler;

    #[async_trait]
    impl ToolHandler for EchoHandler {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("echo", "Echo the input back").with_schema(
                InputSchema::new()
                    .with_property("text", serde_json::json!({"type": "string"}))
                    .with_required(vec!["text".to_string()]),
            )
        }

        async fn execute(&self, input: serde_json::Value) -> Result<String, ToolError> {
            let text = input
                .get("text")
                .and_then(|v| v.as_str())
                .ok_or_else(|| ToolError::MissingParameter("text".to_string()))?;
            Ok(text.to_string())
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl ToolHandler for FailingHandler {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("broken", "Always fails")
        }

        async fn execute(&self, _input: serde_json::Value) -> Result<String, ToolError> {
            Err(ToolError::ExecutionFailed("boom".to_string()))
        }
    }

    fn call(name: &str, input: serde_json::Value) -> ToolCall {
        ToolCall {
            id: "call-1".to_string(),
            name: name.to_string(),
            input,
        }
    }

    #[tokio::test]
    async fn test_dispatch_success() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoHandler));

        let result = registry
            .dispatch(&call("echo", serde_json::json!({"text": "hello"})))
            .await;
        assert!(!result.is_error);
        assert_eq!(result.content, "hello");
        assert_eq!(result.tool_use_id, "call-1");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let registry = ToolRegistry::new();
        let result = registry.dispatch(&call("nope", serde_json::json!({}))).await;
        assert!(result.is_error);
        assert!(result.content.contains("nope"));
    }

    #[tokio::test]
    async fn test_dispatch_handler_error_becomes_result() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(FailingHandler));

        let result = registry
            .dispatch(&call("broken", serde_json::json!({})))
            .await;
        assert!(result.is_error);
        assert!(result.content.contains("boom"));
    }

    #[tokio::test]
    async fn test_dispatch_missing_parameter() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoHandler));

        let result = registry.dispatch(&call("echo", serde_json::json!({}))).await;
        assert!(result.is_error);
    }

    #[test]
    fn test_definitions_order() {
        let registry = ToolRegistryBuilder::new()
            .with_handler(Arc::new(FailingHandler))
            .with_handler(Arc::new(EchoHandler))
            .build();

        let defs = registry.definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "broken");
        assert_eq!(defs[1].name, "echo");
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoHandler));
        registry.register(Arc::new(EchoHandler));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_into_block() {
        let result = DispatchResult {
            tool_use_id: "call-7".to_string(),
            name: "echo".to_string(),
            content: "out".to_string(),
            is_error: false,
        };
        match result.into_block() {
            ContentBlock::ToolResult {
                tool_use_id,
                name,
                content,
                is_error,
            } => {
                assert_eq!(tool_use_id, "call-7");
                assert_eq!(name, "echo");
                assert_eq!(content, "out");
                assert!(!is_error);
            }
            _ => panic!("expected tool result block"),
        }
    }
}
