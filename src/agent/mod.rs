// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The agent conversation loop.
//!
//! An [`Agent`] ties a provider, an instruction, and a tool registry
//! together. Each user turn runs the standard loop: send the conversation,
//! execute any tool calls the model makes, feed the results back, and
//! repeat until the model answers in plain text or a limit trips.

pub mod tool;
pub mod types;

pub use tool::AgentTool;
pub use types::AgentConfig;

use tracing::{debug, info, warn};

use crate::error::AgentError;
use crate::tools::ToolRegistry;
use crate::types::{BoxedProvider, ContentBlock, Message, Role};

/// A single LLM agent with an instruction and a set of tools.
pub struct Agent {
    name: String,
    description: String,
    instruction: String,
    provider: BoxedProvider,
    registry: ToolRegistry,
    history: Vec<Message>,
    config: AgentConfig,
}

impl Agent {
    /// Create an agent.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        instruction: impl Into<String>,
        provider: BoxedProvider,
        registry: ToolRegistry,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            instruction: instruction.into(),
            provider,
            registry,
            history: Vec::new(),
            config: AgentConfig::default(),
        }
    }

    /// Replace the turn limits.
    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Agent name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description, used when the agent is exposed as a tool.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Model identifier in use.
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Names of the tools available to this agent.
    pub fn tool_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Clear conversation history.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Run one user turn to completion and return the final text reply.
    pub async fn chat(&mut self, input: &str) -> Result<String, AgentError> {
        if !self.config.keep_history {
            self.history.clear();
        }
        self.history.push(Message::user(input));

        let definitions = self.registry.definitions();
        let tools = (!definitions.is_empty()).then_some(definitions.as_slice());

        let mut final_text = String::new();
        let mut consecutive_errors: u32 = 0;

        for iteration in 0..self.config.max_iterations {
            debug!(agent = %self.name, iteration, "provider round-trip");

            let response = match self
                .provider
                .chat(Some(&self.instruction), &self.history, tools)
                .await
            {
                Ok(response) => {
                    consecutive_errors = 0;
                    response
                }
                Err(e) if e.is_retryable() => {
                    consecutive_errors += 1;
                    warn!(agent = %self.name, error = %e, attempt = consecutive_errors, "retryable provider error");
                    if consecutive_errors >= self.config.max_consecutive_errors {
                        return Err(AgentError::MaxErrorsExceeded(consecutive_errors));
                    }
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if let Some(usage) = &response.usage {
                debug!(
                    agent = %self.name,
                    input_tokens = usage.input_tokens,
                    output_tokens = usage.output_tokens,
                    "token usage"
                );
            }

            if !response.content.is_empty() {
                final_text = response.content.clone();
            }

            if !response.has_tool_calls() {
                self.record_assistant_turn(&response.content, &[]);
                info!(agent = %self.name, iterations = iteration + 1, "turn complete");
                return Ok(final_text);
            }

            self.record_assistant_turn(&response.content, &response.tool_calls);

            let mut result_blocks = Vec::with_capacity(response.tool_calls.len());
            for call in &response.tool_calls {
                let result = self.registry.dispatch(call).await;
                result_blocks.push(result.into_block());
            }
            self.history
                .push(Message::with_blocks(Role::User, result_blocks));
        }

        Err(AgentError::MaxIterationsExceeded(self.config.max_iterations))
    }

    fn record_assistant_turn(&mut self, text: &str, calls: &[crate::types::ToolCall]) {
        let mut blocks = Vec::new();
        if !text.is_empty() {
            blocks.push(ContentBlock::Text {
                text: text.to_string(),
            });
        }
        for call in calls {
            blocks.push(ContentBlock::ToolUse {
                id: call.id.clone(),
                name: call.name.clone(),
                input: call.input.clone(),
            });
        }
        if blocks.is_empty() {
            // Gemini requires non-empty parts on every content entry
            blocks.push(ContentBlock::Text {
                text: String::new(),
            });
        }
        self.history
            .push(Message::with_blocks(Role::Assistant, blocks));
    }
}
