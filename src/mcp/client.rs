// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! MCP client for a single stdio tool server.
//!
//! Spawns the configured child process, performs the JSON-RPC initialize
//! handshake, lists the advertised tools, and forwards tool calls. One
//! request is in flight at a time; the underlying protocol's own
//! request/response cycle provides all the concurrency this system needs.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tracing::{debug, info};

use super::config::ServerConfig;
use super::error::McpError;
use super::types::{ConnectionState, McpContent, McpToolInfo, McpToolResult, ServerInfo};

/// MCP protocol version this client speaks.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Client for a single MCP server connection.
pub struct McpClient {
    /// Server name.
    name: String,

    /// Server configuration.
    config: ServerConfig,

    /// Connection state.
    state: ConnectionState,

    /// Child process.
    process: Option<Child>,

    /// Buffered reader over the child's stdout. Persistent across requests
    /// so lines buffered past the first newline are never lost.
    reader: Option<BufReader<ChildStdout>>,

    /// Server info (after initialization).
    server_info: Option<ServerInfo>,

    /// Available tools (after initialization).
    tools: Vec<McpToolInfo>,

    /// Last error message.
    last_error: Option<String>,

    /// Request ID counter.
    request_id: u64,
}

impl McpClient {
    /// Create a new MCP client.
    pub fn new(name: impl Into<String>, config: ServerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            state: ConnectionState::Disconnected,
            process: None,
            reader: None,
            server_info: None,
            tools: Vec::new(),
            last_error: None,
            request_id: 0,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Get server info (if available).
    pub fn server_info(&self) -> Option<&ServerInfo> {
        self.server_info.as_ref()
    }

    /// Get available tools.
    pub fn tools(&self) -> &[McpToolInfo] {
        &self.tools
    }

    /// Get the last error message.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Check if the client is ready for tool calls.
    pub fn is_ready(&self) -> bool {
        self.state == ConnectionState::Ready
    }

    /// Get the next request ID.
    fn next_request_id(&mut self) -> u64 {
        self.request_id += 1;
        self.request_id
    }

    /// Connect to the MCP server.
    ///
    /// Spawns the child process, runs the initialize handshake, and fetches
    /// the tool list. Idempotent when already ready.
    pub async fn connect(&mut self) -> Result<(), McpError> {
        if self.state == ConnectionState::Ready {
            return Ok(());
        }

        self.state = ConnectionState::Connecting;

        match self.connect_inner().await {
            Ok(()) => {
                self.state = ConnectionState::Ready;
                self.last_error = None;
                info!(
                    server = %self.name,
                    tools = self.tools.len(),
                    "MCP server connected"
                );
                Ok(())
            }
            Err(e) => {
                self.state = ConnectionState::Failed;
                self.last_error = Some(e.to_string());
                // A half-started child must not outlive the failed connect
                self.reader = None;
                if let Some(mut process) = self.process.take() {
                    let _ = process.kill().await;
                }
                Err(e)
            }
        }
    }

    async fn connect_inner(&mut self) -> Result<(), McpError> {
        let mut cmd = Command::new(&self.config.command);
        cmd.args(&self.config.args);

        for (key, value) in &self.config.env {
            cmd.env(key, value);
        }

        if let Some(cwd) = &self.config.cwd {
            cmd.current_dir(cwd);
        }

        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::null());
        cmd.kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| McpError::connection_failed(&self.name, e.to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| McpError::connection_failed(&self.name, "stdout unavailable"))?;
        self.reader = Some(BufReader::new(stdout));
        self.process = Some(child);

        let timeout = Duration::from_secs(self.config.startup_timeout_sec);
        let timeout_secs = self.config.startup_timeout_sec;

        let server_info = tokio::time::timeout(timeout, self.initialize())
            .await
            .map_err(|_| McpError::ConnectionTimeout {
                server: self.name.clone(),
                timeout_secs,
            })??;
        self.server_info = Some(server_info);

        self.fetch_tools().await?;
        Ok(())
    }

    /// Send the initialize request and initialized notification.
    async fn initialize(&mut self) -> Result<ServerInfo, McpError> {
        let request_id = self.next_request_id();
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": request_id,
            "method": "initialize",
            "params": {
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "clientInfo": {
                    "name": "talking-agents",
                    "version": crate::VERSION
                }
            }
        });

        let response = self.round_trip(&request).await?;
        let result = response.get("result").ok_or_else(|| {
            McpError::InvalidResponse("Missing result in initialize response".to_string())
        })?;

        let server_info = ServerInfo {
            name: result
                .get("serverInfo")
                .and_then(|s| s.get("name"))
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string(),
            version: result
                .get("serverInfo")
                .and_then(|s| s.get("version"))
                .and_then(|v| v.as_str())
                .unwrap_or("0.0.0")
                .to_string(),
            protocol_version: result
                .get("protocolVersion")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
        };

        let notification = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        });
        self.send(&notification).await?;

        Ok(server_info)
    }

    /// Fetch the advertised tools from the server.
    async fn fetch_tools(&mut self) -> Result<(), McpError> {
        let request_id = self.next_request_id();
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": request_id,
            "method": "tools/list"
        });

        let response = self.round_trip(&request).await?;
        let result = response.get("result").ok_or_else(|| {
            McpError::InvalidResponse("Missing result in tools/list response".to_string())
        })?;

        let tools = result
            .get("tools")
            .and_then(|t| t.as_array())
            .cloned()
            .unwrap_or_default();

        self.tools = tools
            .into_iter()
            .filter_map(|t| {
                let name = t.get("name")?.as_str()?.to_string();
                Some(McpToolInfo {
                    name,
                    description: t
                        .get("description")
                        .and_then(|d| d.as_str())
                        .map(|s| s.to_string()),
                    input_schema: t
                        .get("inputSchema")
                        .cloned()
                        .unwrap_or(serde_json::json!({})),
                    server: self.name.clone(),
                })
            })
            .collect();

        Ok(())
    }

    /// Call a tool on this server.
    pub async fn call_tool(
        &mut self,
        tool_name: &str,
        arguments: serde_json::Value,
    ) -> Result<McpToolResult, McpError> {
        if self.state != ConnectionState::Ready {
            return Err(McpError::NotReady(self.name.clone()));
        }

        debug!(server = %self.name, tool = %tool_name, "MCP tool call");

        let request_id = self.next_request_id();
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": request_id,
            "method": "tools/call",
            "params": {
                "name": tool_name,
                "arguments": arguments
            }
        });

        let timeout = Duration::from_secs(self.config.tool_timeout_sec);
        let timeout_secs = self.config.tool_timeout_sec;

        let response = tokio::time::timeout(timeout, self.round_trip(&request))
            .await
            .map_err(|_| McpError::ToolCallTimeout {
                tool: tool_name.to_string(),
                timeout_secs,
            })?
            .map_err(|e| match e {
                McpError::Protocol { .. } => e,
                other => McpError::tool_failed(tool_name, other.to_string()),
            })?;

        // JSON-RPC errors surface as tool error results so the model can
        // try an alternative
        if let Some(error) = response.get("error") {
            let message = error
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown error");
            return Ok(McpToolResult::error(message));
        }

        let tool_result = response.get("result").ok_or_else(|| {
            McpError::InvalidResponse("Missing result in tools/call response".to_string())
        })?;

        let is_error = tool_result
            .get("isError")
            .and_then(|e| e.as_bool())
            .unwrap_or(false);

        let content = tool_result
            .get("content")
            .and_then(|c| c.as_array())
            .cloned()
            .unwrap_or_default();

        Ok(McpToolResult {
            content: content.into_iter().filter_map(parse_content).collect(),
            is_error,
        })
    }

    /// Write a JSON value as a single line to the child's stdin.
    async fn send(&mut self, value: &serde_json::Value) -> Result<(), McpError> {
        let process = self
            .process
            .as_mut()
            .ok_or_else(|| McpError::NotReady(self.name.clone()))?;
        let stdin = process
            .stdin
            .as_mut()
            .ok_or_else(|| McpError::connection_failed(&self.name, "stdin closed"))?;

        let line = serde_json::to_string(value)?;
        stdin.write_all(format!("{line}\n").as_bytes()).await?;
        stdin.flush().await?;
        Ok(())
    }

    /// Send a request and read response lines until one carries the
    /// request's id, checking for a JSON-RPC error on methods where it is
    /// fatal.
    async fn round_trip(
        &mut self,
        request: &serde_json::Value,
    ) -> Result<serde_json::Value, McpError> {
        let is_call = request
            .get("method")
            .and_then(|m| m.as_str())
            .is_some_and(|m| m == "tools/call");
        let expected_id = request.get("id").and_then(|v| v.as_u64());

        self.send(request).await?;

        loop {
            let reader = self
                .reader
                .as_mut()
                .ok_or_else(|| McpError::NotReady(self.name.clone()))?;

            let mut line = String::new();
            let read = reader.read_line(&mut line).await?;
            if read == 0 {
                return Err(McpError::connection_failed(
                    &self.name,
                    "server closed its stdout",
                ));
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response: serde_json::Value = serde_json::from_str(line)?;

            // Server-initiated notifications and stray responses carry no
            // matching id; they are not ours to consume
            if response.get("id").and_then(|v| v.as_u64()) != expected_id {
                debug!(server = %self.name, "skipping message without matching id");
                continue;
            }

            // During connect a JSON-RPC error means the handshake failed;
            // during tools/call the caller turns it into a tool error result.
            if !is_call {
                if let Some(error) = response.get("error") {
                    let code = error.get("code").and_then(|v| v.as_i64()).unwrap_or(-1) as i32;
                    let message = error
                        .get("message")
                        .and_then(|v| v.as_str())
                        .unwrap_or("Unknown error");
                    return Err(McpError::protocol(code, message));
                }
            }

            return Ok(response);
        }
    }

    /// Disconnect from the server, killing the child process.
    pub async fn disconnect(&mut self) {
        self.state = ConnectionState::Closing;

        self.reader = None;
        if let Some(mut process) = self.process.take() {
            let _ = process.kill().await;
        }

        self.tools.clear();
        self.server_info = None;
        self.state = ConnectionState::Disconnected;
    }
}

fn parse_content(value: serde_json::Value) -> Option<McpContent> {
    let content_type = value.get("type")?.as_str()?;
    match content_type {
        "text" => Some(McpContent::Text {
            text: value.get("text")?.as_str()?.to_string(),
        }),
        "image" => Some(McpContent::Image {
            data: value.get("data")?.as_str()?.to_string(),
            mime_type: value.get("mimeType")?.as_str()?.to_string(),
        }),
        "resource" => {
            let resource = value.get("resource")?;
            Some(McpContent::Resource {
                uri: resource.get("uri")?.as_str()?.to_string(),
                mime_type: resource
                    .get("mimeType")
                    .and_then(|m| m.as_str())
                    .map(|s| s.to_string()),
                text: resource
                    .get("text")
                    .and_then(|t| t.as_str())
                    .map(|s| s.to_string()),
            })
        }
        _ => None,
    }
}
