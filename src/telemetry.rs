// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tracing setup.
//!
//! Logs go to stderr so the conversation on stdout stays clean. `RUST_LOG`
//! always wins over the configured default.

use tracing_subscriber::EnvFilter;

/// Telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    pub default_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_filter: "talking_agents=info".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Verbose preset for `--verbose`.
    pub fn verbose() -> Self {
        Self {
            default_filter: "talking_agents=debug".to_string(),
        }
    }
}

/// Initialize the tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops (relevant in tests).
pub fn init_telemetry(config: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
