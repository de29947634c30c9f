// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Agents as tools.
//!
//! The coordinator delegates by calling its specialist agents the same way
//! it calls any other tool. [`AgentTool`] wraps a whole [`Agent`] behind a
//! single `request` parameter; the wrapped agent runs its own loop with its
//! own tools and returns only the final text.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::ToolError;
use crate::tools::ToolHandler;
use crate::types::{InputSchema, ToolDefinition};

use super::Agent;

/// A tool handler that delegates a request to a wrapped agent.
pub struct AgentTool {
    name: String,
    description: String,
    agent: Arc<Mutex<Agent>>,
}

impl AgentTool {
    /// Wrap an agent as a tool under its own name.
    pub fn new(agent: Agent) -> Self {
        Self {
            name: agent.name().to_string(),
            description: agent.description().to_string(),
            agent: Arc::new(Mutex::new(agent)),
        }
    }
}

#[async_trait]
impl ToolHandler for AgentTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(&self.name, &self.description).with_schema(
            InputSchema::new()
                .with_property(
                    "request",
                    serde_json::json!({
                        "type": "string",
                        "description": "The task or question to hand to this agent, with all necessary context"
                    }),
                )
                .with_required(vec!["request".to_string()]),
        )
    }

    fn is_mutating(&self) -> bool {
        // Delegated agents may use mutating tools of their own
        true
    }

    async fn execute(&self, input: serde_json::Value) -> Result<String, ToolError> {
        let request = input
            .get("request")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::MissingParameter("request".to_string()))?;

        info!(agent = %self.name, "delegating request");

        self.agent
            .lock()
            .await
            .chat(request)
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("{}: {e}", self.name)))
    }
}
