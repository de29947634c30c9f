// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Environment-driven configuration.
//!
//! All configuration comes from environment variables (optionally loaded from
//! a `.env` file by the binary). [`Settings::validate`] separates fatal
//! issues (missing required variables) from warnings (missing optional keys,
//! which merely disable a capability).

use std::collections::HashMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::mcp::config::ServerConfig;

/// Default model for all agents.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default planning API URL when `PLANNING_API_URL` is not set.
pub const DEFAULT_PLANNING_API_URL: &str = "http://localhost:3000";

/// Variables that must be set for the system to start.
pub const REQUIRED_VARS: &[(&str, &str)] = &[
    ("GOOGLE_API_KEY", "API key for the Google AI model"),
    ("PLANNING_MCP_PATH", "Path to the planning MCP server"),
    ("PLANNING_API_TOKEN", "API token for the planning system"),
];

/// Configuration for an individual agent.
#[derive(Debug, Clone)]
pub struct AgentProfile {
    /// Agent name as exposed to the model and to other agents.
    pub name: String,
    /// One-line description used when the agent is wrapped as a tool.
    pub description: String,
    /// Model identifier.
    pub model: String,
}

/// Result of validating the settings.
#[derive(Debug, Clone, Default)]
pub struct Validation {
    /// Fatal problems. Startup must not proceed while any are present.
    pub issues: Vec<String>,
    /// Non-fatal problems. The corresponding capability is disabled.
    pub warnings: Vec<String>,
}

impl Validation {
    /// Whether the settings are usable.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Central settings, read once at startup and held for the session.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API key for the Gemini model and Google Custom Search.
    pub google_api_key: Option<String>,
    /// Custom Search engine id (optional, a public default exists).
    pub search_engine_id: Option<String>,
    /// Brave Search API key (optional, enables the websearch MCP server).
    pub brave_api_key: Option<String>,
    /// Planning API base URL.
    pub planning_api_url: String,
    /// Planning API token.
    pub planning_api_token: Option<String>,
    /// Path to a checkout of the planning MCP server.
    pub planning_mcp_path: Option<String>,
    /// Workspace root exposed to the filesystem MCP server.
    pub workspace_path: String,
    /// Model override applied to every agent (CLI `--model`).
    pub model_override: Option<String>,
    /// Override for the Gemini API base URL (testing).
    pub gemini_base_url: Option<String>,
}

impl Settings {
    /// Build settings from the process environment.
    pub fn from_env() -> Self {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Build settings from an explicit variable map.
    ///
    /// Empty values are treated as unset.
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let get = |key: &str| -> Option<String> {
            vars.get(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Self {
            google_api_key: get("GOOGLE_API_KEY"),
            search_engine_id: get("GOOGLE_SEARCH_ENGINE_ID")
                .or_else(|| get("PROGRAMMABLE_SEARCH_ENGINE_ID")),
            brave_api_key: get("BRAVE_API_KEY"),
            planning_api_url: get("PLANNING_API_URL")
                .unwrap_or_else(|| DEFAULT_PLANNING_API_URL.to_string()),
            planning_api_token: get("PLANNING_API_TOKEN"),
            planning_mcp_path: get("PLANNING_MCP_PATH"),
            workspace_path: get("WORKSPACE_PATH").unwrap_or_else(|| {
                std::env::current_dir()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| ".".to_string())
            }),
            model_override: get("AGENT_MODEL"),
            gemini_base_url: get("GEMINI_BASE_URL"),
        }
    }

    /// Validate the settings, separating fatal issues from warnings.
    pub fn validate(&self) -> Validation {
        let mut v = Validation::default();

        if self.google_api_key.is_none() {
            v.issues.push(
                ConfigError::MissingVar("GOOGLE_API_KEY (API key for the Google AI model)".into())
                    .to_string(),
            );
        }

        match &self.planning_mcp_path {
            None => v.issues.push(
                ConfigError::MissingVar(
                    "PLANNING_MCP_PATH (path to the planning MCP server)".into(),
                )
                .to_string(),
            ),
            Some(path) if !Path::new(path).exists() => v.issues.push(
                ConfigError::PathNotFound {
                    var: "PLANNING_MCP_PATH".into(),
                    path: path.clone(),
                }
                .to_string(),
            ),
            Some(_) => {}
        }

        if self.planning_api_token.is_none() {
            v.issues.push(
                ConfigError::MissingVar(
                    "PLANNING_API_TOKEN (API token for the planning system)".into(),
                )
                .to_string(),
            );
        }

        if self.search_engine_id.is_none() {
            v.warnings.push(
                "GOOGLE_SEARCH_ENGINE_ID not set - using the default public search engine"
                    .to_string(),
            );
        }

        if self.brave_api_key.is_none() {
            v.warnings
                .push("BRAVE_API_KEY not set - Brave web search will be unavailable".to_string());
        }

        v
    }

    /// Validate and convert fatal issues into a [`ConfigError`].
    pub fn require_valid(&self) -> Result<(), ConfigError> {
        let v = self.validate();
        if v.is_valid() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(
                v.issues
                    .iter()
                    .map(|i| format!("  - {i}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ))
        }
    }

    /// Server configuration for the planning MCP server, if configured.
    ///
    /// The server is a node project; it is launched from its checkout
    /// directory and talks to the planning HTTP API configured through its
    /// environment.
    pub fn planning_server(&self) -> Option<ServerConfig> {
        let path = self.planning_mcp_path.as_ref()?;
        let token = self.planning_api_token.as_ref()?;

        Some(
            ServerConfig::stdio("node")
                .with_args(["src/index.js"])
                .with_cwd(path)
                .with_env([
                    ("API_URL", self.planning_api_url.as_str()),
                    ("API_TOKEN", token.as_str()),
                    ("USER_API_TOKEN", token.as_str()),
                ]),
        )
    }

    /// Server configuration for the filesystem MCP server.
    pub fn filesystem_server(&self) -> ServerConfig {
        ServerConfig::stdio("npx").with_args([
            "-y",
            "@modelcontextprotocol/server-filesystem",
            &self.workspace_path,
        ])
    }

    /// Server configuration for the Context7 documentation server.
    pub fn context7_server(&self) -> ServerConfig {
        ServerConfig::stdio("npx").with_args(["-y", "@upstash/context7-mcp@latest"])
    }

    /// Server configuration for the Playwright browser automation server.
    pub fn playwright_server(&self) -> ServerConfig {
        ServerConfig::stdio("npx").with_args(["@playwright/mcp@latest"])
    }

    /// Server configuration for the Brave web search server, if configured.
    pub fn websearch_server(&self) -> Option<ServerConfig> {
        let key = self.brave_api_key.as_ref()?;
        Some(
            ServerConfig::stdio("npx")
                .with_args(["-y", "@modelcontextprotocol/server-brave-search"])
                .with_env([("BRAVE_API_KEY", key.as_str())]),
        )
    }

    /// All MCP server configurations that are currently enabled.
    pub fn enabled_servers(&self) -> Vec<(String, ServerConfig)> {
        let mut servers = Vec::new();
        if let Some(planning) = self.planning_server() {
            servers.push(("planning".to_string(), planning));
        }
        servers.push(("filesystem".to_string(), self.filesystem_server()));
        servers.push(("context7".to_string(), self.context7_server()));
        servers.push(("playwright".to_string(), self.playwright_server()));
        if let Some(websearch) = self.websearch_server() {
            servers.push(("websearch".to_string(), websearch));
        }
        servers
    }

    /// Agent profile for the given role key.
    pub fn profile(&self, key: &str) -> Result<AgentProfile, ConfigError> {
        let model = self
            .model_override
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let (name, description) = match key {
            "coordinator" => (
                "coordination_agent",
                "Coordinates user communication, manages plans, and delegates tasks to specialized agents.",
            ),
            "backend_dev" => (
                "backend_developer_agent",
                "Specializes in server-side code implementation with access to filesystem and documentation.",
            ),
            "frontend_dev" => (
                "frontend_developer_agent",
                "Specializes in client-side UI implementation with access to filesystem and documentation.",
            ),
            "designer" => (
                "designer_agent",
                "Specializes in visual and UX design with browser automation for design review.",
            ),
            "research" => (
                "research_agent",
                "Specializes in information gathering using web search.",
            ),
            "tester" => (
                "tester_agent",
                "Specializes in automated testing and quality verification using browser automation.",
            ),
            "plan_optimizer" => (
                "plan_optimizer_agent",
                "Specializes in optimizing and refining project plan structure.",
            ),
            other => {
                return Err(ConfigError::invalid_value(
                    "agent profile",
                    format!("unknown key: {other}"),
                ))
            }
        };

        Ok(AgentProfile {
            name: name.to_string(),
            description: description.to_string(),
            model,
        })
    }

    /// Render a human-readable summary of the configuration.
    pub fn summary(&self) -> String {
        let mark = |set: bool| if set { "ok" } else { "missing" };

        let mut lines = vec![
            "Configuration Summary".to_string(),
            "=".repeat(40),
            format!("Google API Key: {}", mark(self.google_api_key.is_some())),
            format!(
                "Planning API Token: {}",
                mark(self.planning_api_token.is_some())
            ),
            format!(
                "Planning MCP Path: {}",
                mark(
                    self.planning_mcp_path
                        .as_deref()
                        .is_some_and(|p| Path::new(p).exists())
                )
            ),
            format!(
                "Google Search Engine ID: {}",
                if self.search_engine_id.is_some() {
                    "ok"
                } else {
                    "using default"
                }
            ),
            format!("Brave API Key: {}", mark(self.brave_api_key.is_some())),
            format!("Workspace Path: {}", self.workspace_path),
            String::new(),
            "Enabled MCP servers:".to_string(),
        ];

        for (name, _) in self.enabled_servers() {
            lines.push(format!("  - {name}"));
        }

        lines.join("\n")
    }
}
