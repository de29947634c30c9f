// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Coordination agent.
//!
//! The default top-level agent. It owns the planning tools and every
//! specialist agent wrapped as a tool, so a single conversation can move
//! from planning through implementation to verification.

use std::sync::Arc;

use crate::agent::{Agent, AgentTool};
use crate::config::Settings;
use crate::error::Result;
use crate::providers::create_provider;
use crate::tools::ToolRegistryBuilder;

use super::{backend_dev, designer, frontend_dev, plan_optimizer, research, tester, ServerPool};

const INSTRUCTION: &str = "\
You are the coordination agent for a software team of specialized agents. You \
are the single point of contact for the user: you talk to them, maintain the \
project plan, and delegate work.

Your tools fall into two groups:
- Planning tools, for creating and maintaining plans and tasks in the planning \
system. Keep the plan current: record new work before delegating it and update \
task status when results come back.
- Specialist agents, each callable with a single 'request' string: \
backend_developer_agent for server-side code, frontend_developer_agent for UI \
code, designer_agent for visual and UX review, research_agent for gathering \
information, tester_agent for verifying behavior in a browser, and \
plan_optimizer_agent for restructuring the plan itself.

Delegation rules:
- Hand each task to the single best-suited specialist. Include all the context \
the specialist needs in the request; they do not see this conversation.
- Do the work yourself only when it is pure coordination or planning.
- When a specialist reports back, relay the substance to the user and update \
the plan. If a result is inadequate, refine the request and delegate again \
rather than silently accepting it.
- For multi-step work, delegate sequentially and keep the user informed of \
progress between steps.

Be concise with the user. Ask a clarifying question when a request is too vague \
to plan; otherwise act.";

/// Build the coordination agent with planning tools and every specialist
/// wrapped as a tool.
pub async fn build(settings: &Settings, pool: &ServerPool) -> Result<Agent> {
    let profile = settings.profile("coordinator")?;
    let provider = create_provider(settings, &profile.model)?;

    let mut builder =
        ToolRegistryBuilder::new().with_handlers(pool.handlers_for(&["planning"]).await);

    for specialist in [
        backend_dev::build(settings, pool).await?,
        frontend_dev::build(settings, pool).await?,
        designer::build(settings, pool).await?,
        research::build(settings, pool).await?,
        tester::build(settings, pool).await?,
        plan_optimizer::build(settings, pool).await?,
    ] {
        builder = builder.with_handler(Arc::new(AgentTool::new(specialist)));
    }

    Ok(Agent::new(
        profile.name,
        profile.description,
        INSTRUCTION,
        provider,
        builder.build(),
    ))
}
