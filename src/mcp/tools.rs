// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Bridges MCP server tools into the tool registry.
//!
//! Each tool advertised by a connected server becomes a [`McpToolWrapper`]
//! implementing [`ToolHandler`], so the agent loop calls MCP tools the same
//! way it calls native ones. Tools keep the plain names the servers
//! advertise; the server list is curated so names do not collide.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ToolError;
use crate::tools::registry::ToolHandler;
use crate::types::{InputSchema, ToolDefinition};

use super::toolset::SharedClient;
use super::types::McpToolInfo;

/// Tool names that mutate external state. Everything else is assumed
/// read-only for dispatch logging.
const MUTATING_PREFIXES: &[&str] = &[
    "create_",
    "update_",
    "delete_",
    "write_",
    "move_",
    "edit_",
    "add_",
    "remove_",
];

/// A registry handler backed by a tool on an MCP server.
pub struct McpToolWrapper {
    info: McpToolInfo,
    client: SharedClient,
}

impl McpToolWrapper {
    /// Wrap one advertised MCP tool.
    pub fn new(info: McpToolInfo, client: SharedClient) -> Self {
        Self { info, client }
    }
}

#[async_trait]
impl ToolHandler for McpToolWrapper {
    fn definition(&self) -> ToolDefinition {
        let schema = parse_schema(&self.info.input_schema);
        ToolDefinition::new(
            &self.info.name,
            self.info
                .description
                .clone()
                .unwrap_or_else(|| format!("Tool '{}' from the {} server", self.info.name, self.info.server)),
        )
        .with_schema(schema)
    }

    fn is_mutating(&self) -> bool {
        MUTATING_PREFIXES
            .iter()
            .any(|p| self.info.name.starts_with(p))
    }

    async fn execute(&self, input: serde_json::Value) -> Result<String, ToolError> {
        let result = self
            .client
            .lock()
            .await
            .call_tool(&self.info.name, input)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        if result.is_error {
            return Err(ToolError::ExecutionFailed(result.as_text()));
        }
        Ok(result.as_text())
    }
}

/// Convert a raw MCP input schema into the registry's schema type.
///
/// Servers send arbitrary JSON Schema; anything unusable degrades to an
/// empty object schema rather than failing registration.
fn parse_schema(raw: &serde_json::Value) -> InputSchema {
    let mut schema = InputSchema::new();

    if let Some(properties) = raw.get("properties").and_then(|p| p.as_object()) {
        for (name, prop) in properties {
            schema = schema.with_property(name, prop.clone());
        }
    }

    if let Some(required) = raw.get("required").and_then(|r| r.as_array()) {
        let required: Vec<String> = required
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.to_string())
            .collect();
        if !required.is_empty() {
            schema = schema.with_required(required);
        }
    }

    schema
}

/// Wrap every tool a connected client advertises.
pub async fn create_tool_handlers(client: &SharedClient) -> Vec<Arc<dyn ToolHandler>> {
    let tools = client.lock().await.tools().to_vec();
    tools
        .into_iter()
        .map(|info| {
            Arc::new(McpToolWrapper::new(info, Arc::clone(client))) as Arc<dyn ToolHandler>
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::client::McpClient;
    use crate::mcp::config::ServerConfig;
    use tokio::sync::Mutex;

    fn shared_client() -> SharedClient {
        Arc::new(Mutex::new(McpClient::new(
            "planning",
            ServerConfig::stdio("echo"),
        )))
    }

    fn info(name: &str) -> McpToolInfo {
        McpToolInfo {
            name: name.to_string(),
            description: Some("A test tool".to_string()),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string"},
                    "count": {"type": "integer"}
                },
                "required": ["title"]
            }),
            server: "planning".to_string(),
        }
    }

    #[test]
    fn test_definition_from_info() {
        let wrapper = McpToolWrapper::new(info("create_plan"), shared_client());
        let def = wrapper.definition();

        assert_eq!(def.name, "create_plan");
        assert_eq!(def.description, "A test tool");
        assert!(def.input_schema.properties.contains_key("title"));
        assert_eq!(
            def.input_schema.required.as_deref(),
            Some(&["title".to_string()][..])
        );
    }

    #[test]
    fn test_definition_without_description() {
        let mut i = info("list_plans");
        i.description = None;
        let wrapper = McpToolWrapper::new(i, shared_client());

        let def = wrapper.definition();
        assert!(def.description.contains("list_plans"));
        assert!(def.description.contains("planning"));
    }

    #[test]
    fn test_is_mutating() {
        assert!(McpToolWrapper::new(info("create_plan"), shared_client()).is_mutating());
        assert!(McpToolWrapper::new(info("write_file"), shared_client()).is_mutating());
        assert!(!McpToolWrapper::new(info("list_plans"), shared_client()).is_mutating());
        assert!(!McpToolWrapper::new(info("read_file"), shared_client()).is_mutating());
    }

    #[test]
    fn test_parse_schema_degrades_gracefully() {
        let schema = parse_schema(&serde_json::json!("not an object schema"));
        assert!(schema.properties.is_empty());
        assert!(schema.required.is_none());
    }

    #[tokio::test]
    async fn test_execute_against_disconnected_client_fails() {
        let wrapper = McpToolWrapper::new(info("create_plan"), shared_client());
        let result = wrapper.execute(serde_json::json!({"title": "x"})).await;
        assert!(matches!(result, Err(ToolError::ExecutionFailed(_))));
    }
}
