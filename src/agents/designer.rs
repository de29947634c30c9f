// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Designer agent.

use crate::agent::{Agent, AgentConfig};
use crate::config::Settings;
use crate::error::Result;
use crate::providers::create_provider;
use crate::tools::ToolRegistryBuilder;

use super::ServerPool;

const INSTRUCTION: &str = "\
You are a designer agent. You review and improve the visual design and user \
experience of web interfaces.

Working method:
- Use the browser tools to open the pages under review, navigate them, and take \
screenshots so your feedback is grounded in what actually renders.
- Evaluate layout, typography, spacing, color use, visual hierarchy, and \
interaction flows.
- Give concrete, prioritized recommendations: what to change, where, and why it \
helps the user.
- When asked for design direction rather than review, describe the intended look \
precisely enough for a developer to implement it without guessing.";

/// Build the designer agent with browser automation tools.
pub async fn build(settings: &Settings, pool: &ServerPool) -> Result<Agent> {
    let profile = settings.profile("designer")?;
    let provider = create_provider(settings, &profile.model)?;

    let registry = ToolRegistryBuilder::new()
        .with_handlers(pool.handlers_for(&["playwright"]).await)
        .build();

    Ok(
        Agent::new(profile.name, profile.description, INSTRUCTION, provider, registry)
            .with_config(AgentConfig::for_tool_use()),
    )
}
