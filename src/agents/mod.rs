// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Agent factories.
//!
//! Each specialist agent gets its own module carrying its instruction and
//! the subset of MCP servers it works with. Servers that fail to start are
//! logged and skipped; the agent is built with whatever tools remain.

pub mod backend_dev;
pub mod coordinator;
pub mod designer;
pub mod frontend_dev;
pub mod plan_optimizer;
pub mod research;
pub mod tester;

use std::collections::HashMap;
use std::sync::Arc;

use clap::ValueEnum;
use tracing::{info, warn};

use crate::agent::Agent;
use crate::config::Settings;
use crate::error::Result;
use crate::mcp::{
    create_tool_handlers, McpClient, McpError, McpToolResult, SharedClient, ToolsetStack,
};
use crate::tools::ToolHandler;

/// The agents this system can run at the top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AgentKind {
    /// Coordinator that delegates to all specialists.
    Coordination,
    /// Server-side implementation work.
    BackendDev,
    /// Client-side implementation work.
    FrontendDev,
    /// Visual and UX design review.
    Designer,
    /// Web research.
    Research,
    /// Automated testing and verification.
    Tester,
    /// Plan structure refinement.
    PlanOptimizer,
}

/// Connected MCP servers, keyed by name.
#[derive(Default)]
pub struct ServerPool {
    clients: HashMap<String, SharedClient>,
}

impl ServerPool {
    /// Get a connected server by name.
    pub fn get(&self, name: &str) -> Option<&SharedClient> {
        self.clients.get(name)
    }

    /// Whether a server connected successfully.
    pub fn has(&self, name: &str) -> bool {
        self.clients.contains_key(name)
    }

    /// Number of connected servers.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether no servers connected.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Call a tool directly on whichever connected server advertises it.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<McpToolResult, McpError> {
        for client in self.clients.values() {
            let mut client = client.lock().await;
            if client.tools().iter().any(|t| t.name == name) {
                return client.call_tool(name, arguments).await;
            }
        }
        Err(McpError::tool_failed(
            name,
            "no connected server advertises this tool",
        ))
    }

    /// Tool handlers for the named servers, skipping any that did not
    /// connect.
    pub async fn handlers_for(&self, servers: &[&str]) -> Vec<Arc<dyn ToolHandler>> {
        let mut handlers = Vec::new();
        for name in servers {
            if let Some(client) = self.clients.get(*name) {
                handlers.extend(create_tool_handlers(client).await);
            }
        }
        handlers
    }
}

/// Connect every enabled MCP server, registering each on the stack.
///
/// Connection failures are warnings, not errors: the affected capability is
/// simply missing from the built agents.
pub async fn connect_servers(settings: &Settings, stack: &mut ToolsetStack) -> ServerPool {
    let mut pool = ServerPool::default();

    for (name, config) in settings.enabled_servers() {
        let mut client = McpClient::new(&name, config);
        match client.connect().await {
            Ok(()) => {
                info!(server = %name, tools = client.tools().len(), "server ready");
                let shared = stack.push(client);
                pool.clients.insert(name, shared);
            }
            Err(e) => {
                warn!(server = %name, error = %e, "server failed to start; continuing without it");
            }
        }
    }

    pool
}

/// Build the requested top-level agent.
pub async fn build_agent(
    kind: AgentKind,
    settings: &Settings,
    pool: &ServerPool,
) -> Result<Agent> {
    match kind {
        AgentKind::Coordination => coordinator::build(settings, pool).await,
        AgentKind::BackendDev => backend_dev::build(settings, pool).await,
        AgentKind::FrontendDev => frontend_dev::build(settings, pool).await,
        AgentKind::Designer => designer::build(settings, pool).await,
        AgentKind::Research => research::build(settings, pool).await,
        AgentKind::Tester => tester::build(settings, pool).await,
        AgentKind::PlanOptimizer => plan_optimizer::build(settings, pool).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as Vars;

    fn settings_with_key() -> Settings {
        let vars: Vars<String, String> =
            [("GOOGLE_API_KEY".to_string(), "test-key".to_string())].into();
        Settings::from_vars(&vars)
    }

    #[tokio::test]
    async fn test_empty_pool_handlers() {
        let pool = ServerPool::default();
        assert!(pool.is_empty());
        assert!(pool.handlers_for(&["planning", "filesystem"]).await.is_empty());
    }

    #[tokio::test]
    async fn test_direct_call_with_unknown_tool() {
        let pool = ServerPool::default();
        let result = pool.call_tool("list_plans", serde_json::json!({})).await;
        assert!(matches!(result, Err(McpError::ToolCallFailed { .. })));
    }

    #[tokio::test]
    async fn test_direct_call_routes_to_advertising_server() {
        // Scripted server: handshake, one advertised tool, and a canned
        // tools/call response
        let script = concat!(
            "printf '%s\\n' ",
            r#"'{"jsonrpc":"2.0","id":1,"result":{"serverInfo":{"name":"scripted","version":"1.0.0"},"protocolVersion":"2024-11-05"}}' "#,
            r#"'{"jsonrpc":"2.0","id":2,"result":{"tools":[{"name":"ping","description":"Ping","inputSchema":{"type":"object"}}]}}' "#,
            r#"'{"jsonrpc":"2.0","id":3,"result":{"content":[{"type":"text","text":"pong"}],"isError":false}}'"#,
            "; sleep 2"
        );

        let mut stack = ToolsetStack::new();
        let mut pool = ServerPool::default();
        let mut client = McpClient::new(
            "planning",
            crate::mcp::ServerConfig::stdio("sh").with_args(["-c", script]),
        );
        client.connect().await.unwrap();
        pool.clients
            .insert("planning".to_string(), stack.push(client));

        let result = pool.call_tool("ping", serde_json::json!({})).await.unwrap();
        assert!(!result.is_error);
        assert_eq!(result.as_text(), "pong");

        stack.shutdown().await;
    }

    #[tokio::test]
    async fn test_build_agents_with_empty_pool() {
        // Every agent must build even when no server connected
        let settings = settings_with_key();
        let pool = ServerPool::default();

        for kind in [
            AgentKind::Coordination,
            AgentKind::BackendDev,
            AgentKind::FrontendDev,
            AgentKind::Designer,
            AgentKind::Research,
            AgentKind::Tester,
            AgentKind::PlanOptimizer,
        ] {
            let agent = build_agent(kind, &settings, &pool).await.unwrap();
            assert!(!agent.name().is_empty());
        }
    }

    #[tokio::test]
    async fn test_coordinator_carries_specialist_tools() {
        let settings = settings_with_key();
        let pool = ServerPool::default();

        let agent = build_agent(AgentKind::Coordination, &settings, &pool)
            .await
            .unwrap();
        let tools = agent.tool_names();
        assert!(tools.contains(&"backend_developer_agent".to_string()));
        assert!(tools.contains(&"research_agent".to_string()));
        assert!(tools.contains(&"plan_optimizer_agent".to_string()));
    }

    #[tokio::test]
    async fn test_research_agent_falls_back_to_google_search() {
        // No websearch server in the pool, but an API key exists
        let settings = settings_with_key();
        let pool = ServerPool::default();

        let agent = build_agent(AgentKind::Research, &settings, &pool)
            .await
            .unwrap();
        assert!(agent.tool_names().contains(&"google_search".to_string()));
    }

    #[tokio::test]
    async fn test_failed_connect_stays_out_of_pool() {
        let mut stack = ToolsetStack::new();
        let mut pool = ServerPool::default();
        let mut client = McpClient::new(
            "bogus",
            crate::mcp::ServerConfig::stdio("no-such-binary-here"),
        );
        if client.connect().await.is_ok() {
            pool.clients.insert("bogus".to_string(), stack.push(client));
        }

        assert!(pool.is_empty());
        assert_eq!(stack.shutdown().await, 0);
    }
}
