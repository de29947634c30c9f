// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Plan optimizer agent.

use crate::agent::{Agent, AgentConfig};
use crate::config::Settings;
use crate::error::Result;
use crate::providers::create_provider;
use crate::tools::ToolRegistryBuilder;

use super::ServerPool;

const INSTRUCTION: &str = "\
You are a plan optimizer agent. You improve the structure of project plans in \
the planning system.

Working method:
- Read the current plan with the planning tools before proposing changes.
- Look for tasks that are too large to verify, duplicated work, missing \
dependencies between tasks, and orderings that block parallel progress.
- Restructure with the planning tools: split oversized tasks, merge duplicates, \
and set dependencies so the critical path is explicit.
- Keep the plan's original intent; you refine structure, you do not change scope.
- Summarize every structural change you made and the reason for it.";

/// Build the plan optimizer agent with planning tools.
pub async fn build(settings: &Settings, pool: &ServerPool) -> Result<Agent> {
    let profile = settings.profile("plan_optimizer")?;
    let provider = create_provider(settings, &profile.model)?;

    let registry = ToolRegistryBuilder::new()
        .with_handlers(pool.handlers_for(&["planning"]).await)
        .build();

    Ok(
        Agent::new(profile.name, profile.description, INSTRUCTION, provider, registry)
            .with_config(AgentConfig::for_tool_use()),
    )
}
