// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Multi-agent development assistant.
//!
//! A coordination agent talks to the user and delegates to specialized
//! agents (backend, frontend, design, research, testing, plan
//! optimization), each backed by a Gemini model and a curated set of MCP
//! tool servers running as child processes.
//!
//! The crate is organized as:
//! - [`config`]: environment-driven settings and server definitions
//! - [`mcp`]: stdio JSON-RPC client, connection lifetimes, tool bridging
//! - [`tools`]: the tool registry agents dispatch through
//! - [`providers`]: the Gemini backend behind the [`types::Provider`] trait
//! - [`agent`]: the conversation loop and agents-as-tools
//! - [`agents`]: factories for the coordinator and its specialists
//! - [`repl`], [`diagnostics`], [`telemetry`]: the CLI surface

pub mod agent;
pub mod agents;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod mcp;
pub mod providers;
pub mod repl;
pub mod telemetry;
pub mod tools;
pub mod types;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
