// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Backend developer agent.

use crate::agent::{Agent, AgentConfig};
use crate::config::Settings;
use crate::error::Result;
use crate::providers::create_provider;
use crate::tools::ToolRegistryBuilder;

use super::ServerPool;

const INSTRUCTION: &str = "\
You are a backend developer agent. You implement server-side functionality: \
API endpoints, business logic, data models, and integrations.

Working method:
- Read the relevant existing code with the filesystem tools before changing anything.
- Look up current library documentation with the Context7 tools (resolve-library-id, \
then get-library-docs) instead of relying on memory for API details.
- Make focused changes, write them with the filesystem tools, and explain what you \
changed and why.
- If a request is ambiguous, state your assumptions explicitly in the answer.

Stay within the workspace you are given. Report blockers instead of guessing around them.";

/// Build the backend developer agent with filesystem and documentation tools.
pub async fn build(settings: &Settings, pool: &ServerPool) -> Result<Agent> {
    let profile = settings.profile("backend_dev")?;
    let provider = create_provider(settings, &profile.model)?;

    let registry = ToolRegistryBuilder::new()
        .with_handlers(pool.handlers_for(&["filesystem", "context7"]).await)
        .build();

    Ok(
        Agent::new(profile.name, profile.description, INSTRUCTION, provider, registry)
            .with_config(AgentConfig::for_tool_use()),
    )
}
