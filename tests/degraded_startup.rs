// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Startup behavior when optional capabilities are missing.

use std::collections::HashMap;

use talking_agents::agents::{self, AgentKind, ServerPool};
use talking_agents::config::Settings;
use talking_agents::mcp::{ConnectionState, McpClient, ServerConfig, ToolsetStack};

fn minimal_settings() -> Settings {
    let vars: HashMap<String, String> =
        [("GOOGLE_API_KEY".to_string(), "test-key".to_string())].into();
    Settings::from_vars(&vars)
}

#[test]
fn missing_required_vars_are_fatal() {
    let settings = Settings::from_vars(&HashMap::new());
    assert!(settings.require_valid().is_err());

    let validation = settings.validate();
    assert!(!validation.is_valid());
    assert_eq!(validation.issues.len(), 3);
}

#[tokio::test]
async fn failed_server_does_not_block_agent_construction() {
    let mut client = McpClient::new("planning", ServerConfig::stdio("no-such-command-anywhere"));
    assert!(client.connect().await.is_err());
    assert_eq!(client.state(), ConnectionState::Failed);

    // The pool stays empty and every agent still builds
    let pool = ServerPool::default();
    let settings = minimal_settings();

    for kind in [
        AgentKind::Coordination,
        AgentKind::Research,
        AgentKind::Tester,
    ] {
        let agent = agents::build_agent(kind, &settings, &pool).await.unwrap();
        assert!(!agent.name().is_empty());
    }
}

#[tokio::test]
async fn coordinator_without_servers_still_has_specialists() {
    let settings = minimal_settings();
    let pool = ServerPool::default();

    let agent = agents::build_agent(AgentKind::Coordination, &settings, &pool)
        .await
        .unwrap();

    let tools = agent.tool_names();
    for specialist in [
        "backend_developer_agent",
        "frontend_developer_agent",
        "designer_agent",
        "research_agent",
        "tester_agent",
        "plan_optimizer_agent",
    ] {
        assert!(tools.contains(&specialist.to_string()), "missing {specialist}");
    }
}

#[tokio::test]
async fn stack_releases_everything_exactly_once() {
    let mut stack = ToolsetStack::new();
    let handles: Vec<_> = ["planning", "filesystem", "context7", "playwright"]
        .into_iter()
        .map(|name| stack.push(McpClient::new(name, ServerConfig::stdio("echo"))))
        .collect();

    assert_eq!(stack.len(), 4);
    assert_eq!(stack.shutdown().await, 4);
    assert_eq!(stack.shutdown().await, 0);

    for handle in handles {
        assert_eq!(handle.lock().await.state(), ConnectionState::Disconnected);
    }
}
