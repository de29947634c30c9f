// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Environment diagnostics for the `doctor` subcommand.
//!
//! Checks the host toolchain (the MCP servers are node processes), the
//! configuration, and reachability of the planning API, then prints a
//! report with recommendations. Nothing here mutates state.

use std::time::Duration;

use colored::Colorize;

use crate::config::Settings;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct Check {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

impl Check {
    fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail: detail.into(),
        }
    }
}

/// A full diagnostic report.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub checks: Vec<Check>,
    pub recommendations: Vec<String>,
}

impl Report {
    /// Whether every check passed.
    pub fn healthy(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        println!("{}", "Environment Diagnostics".bold());
        println!("{}", "=".repeat(40));

        for check in &self.checks {
            let mark = if check.passed {
                "ok".green()
            } else {
                "FAIL".red()
            };
            println!("[{mark}] {}: {}", check.name, check.detail);
        }

        if !self.recommendations.is_empty() {
            println!();
            println!("{}", "Recommendations:".bold());
            for rec in &self.recommendations {
                println!("  - {rec}");
            }
        }

        println!();
        if self.healthy() {
            println!("{}", "All checks passed.".green().bold());
        } else {
            let failed = self.checks.iter().filter(|c| !c.passed).count();
            println!("{}", format!("{failed} check(s) failed.").red().bold());
        }
    }
}

/// Run all diagnostics.
pub async fn run(settings: &Settings) -> Report {
    let mut report = Report::default();

    for tool in ["node", "npm", "npx"] {
        report.checks.push(check_command(tool).await);
    }
    if report.checks.iter().any(|c| !c.passed) {
        report
            .recommendations
            .push("Install Node.js (https://nodejs.org); the MCP tool servers run on it".to_string());
    }

    let validation = settings.validate();
    if validation.is_valid() {
        report
            .checks
            .push(Check::pass("configuration", "all required variables set"));
    } else {
        for issue in &validation.issues {
            report.checks.push(Check::fail("configuration", issue));
        }
        report
            .recommendations
            .push("Set the missing variables in the environment or a .env file".to_string());
    }
    for warning in &validation.warnings {
        report.recommendations.push(warning.clone());
    }

    report.checks.push(check_planning_api(settings).await);

    report
}

async fn check_command(name: &str) -> Check {
    match tokio::process::Command::new(name)
        .arg("--version")
        .output()
        .await
    {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
            Check::pass(name, version)
        }
        Ok(output) => Check::fail(
            name,
            format!("exited with {}", output.status),
        ),
        Err(e) => Check::fail(name, format!("not found: {e}")),
    }
}

async fn check_planning_api(settings: &Settings) -> Check {
    let name = "planning API";
    let Some(token) = &settings.planning_api_token else {
        return Check::fail(name, "PLANNING_API_TOKEN not set, skipping health check");
    };

    let url = format!("{}/health", settings.planning_api_url.trim_end_matches('/'));
    let client = match reqwest::Client::builder().timeout(HEALTH_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => return Check::fail(name, format!("http client: {e}")),
    };

    match client
        .get(&url)
        .header("Authorization", format!("ApiKey {token}"))
        .send()
        .await
    {
        Ok(response) if response.status().is_success() => {
            Check::pass(name, format!("reachable at {}", settings.planning_api_url))
        }
        Ok(response) => Check::fail(name, format!("{url} returned {}", response.status())),
        Err(e) => Check::fail(name, format!("{url} unreachable: {e}")),
    }
}
