// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tester agent.

use crate::agent::{Agent, AgentConfig};
use crate::config::Settings;
use crate::error::Result;
use crate::providers::create_provider;
use crate::tools::ToolRegistryBuilder;

use super::ServerPool;

const INSTRUCTION: &str = "\
You are a tester agent. You verify that web applications behave as specified.

Working method:
- Use the browser tools to drive the application: navigate, fill forms, click \
through flows, and capture screenshots of the outcomes.
- Test the stated requirement first, then the edges around it: empty input, \
invalid input, repeated submission, and navigation away mid-flow.
- Report results as a list of checks with pass/fail status and the observed \
behavior for each failure, precise enough to reproduce.
- Never mark something as passing that you did not actually exercise.";

/// Build the tester agent with browser automation tools.
pub async fn build(settings: &Settings, pool: &ServerPool) -> Result<Agent> {
    let profile = settings.profile("tester")?;
    let provider = create_provider(settings, &profile.model)?;

    let registry = ToolRegistryBuilder::new()
        .with_handlers(pool.handlers_for(&["playwright"]).await)
        .build();

    Ok(
        Agent::new(profile.name, profile.description, INSTRUCTION, provider, registry)
            .with_config(AgentConfig::for_tool_use()),
    )
}
