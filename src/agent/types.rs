// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Agent configuration types.

/// Limits applied to a single agent turn.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Maximum provider round-trips per user turn.
    pub max_iterations: u32,

    /// Provider retries on retryable errors before giving up.
    pub max_consecutive_errors: u32,

    /// Whether conversation history persists across turns.
    pub keep_history: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            max_consecutive_errors: 3,
            keep_history: true,
        }
    }
}

impl AgentConfig {
    /// Configuration for an agent invoked as a tool: each request is an
    /// independent task, so history does not persist.
    pub fn for_tool_use() -> Self {
        Self {
            keep_history: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.max_consecutive_errors, 3);
        assert!(config.keep_history);
    }

    #[test]
    fn test_for_tool_use() {
        let config = AgentConfig::for_tool_use();
        assert!(!config.keep_history);
        assert_eq!(config.max_iterations, 10);
    }
}
