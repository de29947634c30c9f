// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Scoped lifetime management for MCP server connections.
//!
//! Every server connected during startup is pushed onto a [`ToolsetStack`].
//! Shutting the stack down releases the connections in reverse order of
//! registration, exactly once. Dropping a stack that was never shut down
//! logs a warning; child processes are still reaped because the clients
//! spawn them with kill-on-drop.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::client::McpClient;

/// Shared handle to a connected MCP client.
pub type SharedClient = Arc<Mutex<McpClient>>;

/// A stack of MCP server connections released in reverse order.
#[derive(Default)]
pub struct ToolsetStack {
    clients: Vec<(String, SharedClient)>,
    shut_down: bool,
}

impl ToolsetStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a connected client onto the stack and get a shared handle.
    pub fn push(&mut self, client: McpClient) -> SharedClient {
        let name = client.name().to_string();
        let shared = Arc::new(Mutex::new(client));
        self.clients.push((name, Arc::clone(&shared)));
        shared
    }

    /// Number of managed connections.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether the stack manages any connections.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Names of managed servers, in registration order.
    pub fn server_names(&self) -> Vec<String> {
        self.clients.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Disconnect all servers in reverse registration order.
    ///
    /// Returns the number of connections released. Calling shutdown again
    /// releases nothing and returns 0.
    pub async fn shutdown(&mut self) -> usize {
        if self.shut_down {
            return 0;
        }
        self.shut_down = true;

        let mut released = 0;
        while let Some((name, client)) = self.clients.pop() {
            debug!(server = %name, "disconnecting MCP server");
            client.lock().await.disconnect().await;
            released += 1;
        }
        released
    }
}

impl Drop for ToolsetStack {
    fn drop(&mut self) {
        if !self.shut_down && !self.clients.is_empty() {
            warn!(
                servers = self.clients.len(),
                "toolset stack dropped without shutdown; child processes will be killed on drop"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::config::ServerConfig;
    use crate::mcp::types::ConnectionState;

    fn client(name: &str) -> McpClient {
        McpClient::new(name, ServerConfig::stdio("echo"))
    }

    #[tokio::test]
    async fn test_shutdown_releases_all_once() {
        let mut stack = ToolsetStack::new();
        stack.push(client("planning"));
        stack.push(client("filesystem"));
        stack.push(client("context7"));
        assert_eq!(stack.len(), 3);

        assert_eq!(stack.shutdown().await, 3);
        assert!(stack.is_empty());

        // Second shutdown is a no-op
        assert_eq!(stack.shutdown().await, 0);
    }

    #[tokio::test]
    async fn test_shutdown_reverse_order() {
        let mut stack = ToolsetStack::new();
        let first = stack.push(client("first"));
        let last = stack.push(client("last"));

        // Pop order is observable through the names before shutdown
        assert_eq!(stack.server_names(), vec!["first", "last"]);

        stack.shutdown().await;
        assert_eq!(
            first.lock().await.state(),
            ConnectionState::Disconnected
        );
        assert_eq!(last.lock().await.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_empty_stack_shutdown() {
        let mut stack = ToolsetStack::new();
        assert_eq!(stack.shutdown().await, 0);
    }
}
