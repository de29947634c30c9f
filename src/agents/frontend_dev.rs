// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Frontend developer agent.

use crate::agent::{Agent, AgentConfig};
use crate::config::Settings;
use crate::error::Result;
use crate::providers::create_provider;
use crate::tools::ToolRegistryBuilder;

use super::ServerPool;

const INSTRUCTION: &str = "\
You are a frontend developer agent. You implement user interfaces: components, \
styling, state management, and client-side integration with backend APIs.

Working method:
- Inspect the existing component structure with the filesystem tools before adding \
to it, and match the conventions you find.
- Check framework and library documentation with the Context7 tools \
(resolve-library-id, then get-library-docs) for anything version-sensitive.
- Keep accessibility and responsive behavior in mind for every change.
- Write your changes with the filesystem tools and summarize them in the answer.

Stay within the workspace you are given. Report blockers instead of guessing around them.";

/// Build the frontend developer agent with filesystem and documentation tools.
pub async fn build(settings: &Settings, pool: &ServerPool) -> Result<Agent> {
    let profile = settings.profile("frontend_dev")?;
    let provider = create_provider(settings, &profile.model)?;

    let registry = ToolRegistryBuilder::new()
        .with_handlers(pool.handlers_for(&["filesystem", "context7"]).await)
        .build();

    Ok(
        Agent::new(profile.name, profile.description, INSTRUCTION, provider, registry)
            .with_config(AgentConfig::for_tool_use()),
    )
}
