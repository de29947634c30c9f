// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Model Context Protocol (MCP) integration.
//!
//! Tool servers are child processes speaking JSON-RPC over stdio. This
//! module provides the client ([`McpClient`]), the spawn configuration
//! ([`ServerConfig`]), scoped connection lifetimes ([`ToolsetStack`]), and
//! the bridge that exposes server tools to agents ([`McpToolWrapper`]).

pub mod client;
pub mod config;
pub mod error;
pub mod tools;
pub mod toolset;
pub mod types;

pub use client::McpClient;
pub use config::ServerConfig;
pub use error::McpError;
pub use tools::{create_tool_handlers, McpToolWrapper};
pub use toolset::{SharedClient, ToolsetStack};
pub use types::{ConnectionState, McpContent, McpToolInfo, McpToolResult, ServerInfo};
