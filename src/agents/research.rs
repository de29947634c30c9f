// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Research agent.
//!
//! Prefers the Brave search MCP server when it connected; otherwise falls
//! back to the direct Google Custom Search tool so research still works in
//! a degraded startup.

use std::sync::Arc;

use crate::agent::{Agent, AgentConfig};
use crate::config::Settings;
use crate::error::Result;
use crate::providers::create_provider;
use crate::tools::{GoogleSearchHandler, ToolRegistryBuilder};

use super::ServerPool;

const INSTRUCTION: &str = "\
You are a research agent. You gather accurate, current information from the web.

Working method:
- Use the search tools to find sources. Run more than one query when the first \
set of results is thin or one-sided.
- Prefer primary sources and official documentation over summaries of them.
- Cite the sources you used: include titles and links in the answer.
- Distinguish clearly between what the sources state and what you infer.
- If the available results do not answer the question, say so rather than padding \
the answer.";

/// Build the research agent with web search tools.
pub async fn build(settings: &Settings, pool: &ServerPool) -> Result<Agent> {
    let profile = settings.profile("research")?;
    let provider = create_provider(settings, &profile.model)?;

    let mut builder =
        ToolRegistryBuilder::new().with_handlers(pool.handlers_for(&["websearch"]).await);

    if !pool.has("websearch") {
        if let Some(api_key) = &settings.google_api_key {
            builder = builder.with_handler(Arc::new(GoogleSearchHandler::new(
                api_key,
                settings.search_engine_id.clone(),
            )));
        }
    }

    Ok(Agent::new(
        profile.name,
        profile.description,
        INSTRUCTION,
        provider,
        builder.build(),
    )
    .with_config(AgentConfig::for_tool_use()))
}
