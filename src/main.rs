// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Command-line entry point.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::warn;

use talking_agents::agents::{self, AgentKind};
use talking_agents::config::Settings;
use talking_agents::diagnostics;
use talking_agents::mcp::ToolsetStack;
use talking_agents::repl;
use talking_agents::telemetry::{init_telemetry, TelemetryConfig};

#[derive(Parser)]
#[command(name = "talking-agents", version, about = "Multi-agent development assistant")]
struct Cli {
    /// Agent to talk to.
    #[arg(long, value_enum, default_value = "coordination")]
    agent: AgentKind,

    /// Model override for all agents.
    #[arg(long)]
    model: Option<String>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Check the environment: toolchain, configuration, planning API.
    Doctor,
    /// Print the configuration summary.
    Config,
    /// Connect the MCP servers and list the tools they advertise, or call
    /// one directly.
    Tools {
        /// Call this tool instead of listing.
        #[arg(long)]
        call: Option<String>,

        /// JSON arguments for --call.
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Missing .env is fine; the environment may be set directly
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let telemetry = if cli.verbose {
        TelemetryConfig::verbose()
    } else {
        TelemetryConfig::default()
    };
    init_telemetry(&telemetry);

    let mut settings = Settings::from_env();
    if cli.model.is_some() {
        settings.model_override = cli.model.clone();
    }

    match cli.command {
        Some(Command::Doctor) => run_doctor(&settings).await,
        Some(Command::Config) => {
            println!("{}", settings.summary());
            ExitCode::SUCCESS
        }
        Some(Command::Tools { call, args }) => run_tools(&settings, call.as_deref(), &args).await,
        None => run_session(cli.agent, &settings).await,
    }
}

async fn run_doctor(settings: &Settings) -> ExitCode {
    let report = diagnostics::run(settings).await;
    report.print();
    if report.healthy() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run_tools(settings: &Settings, call: Option<&str>, args: &str) -> ExitCode {
    let arguments: serde_json::Value = match serde_json::from_str(args) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("{} --args is not valid JSON: {e}", "Error:".red().bold());
            return ExitCode::FAILURE;
        }
    };

    let mut stack = ToolsetStack::new();
    let pool = agents::connect_servers(settings, &mut stack).await;

    let code = match call {
        Some(tool) => match pool.call_tool(tool, arguments).await {
            Ok(result) if !result.is_error => {
                println!("{}", result.as_text());
                ExitCode::SUCCESS
            }
            Ok(result) => {
                eprintln!("{} {}", "Tool error:".red().bold(), result.as_text());
                ExitCode::FAILURE
            }
            Err(e) => {
                eprintln!("{} {e}", "Error:".red().bold());
                ExitCode::FAILURE
            }
        },
        None => {
            for name in stack.server_names() {
                let Some(client) = pool.get(&name) else {
                    continue;
                };
                let client = client.lock().await;
                let version = client
                    .server_info()
                    .map(|info| format!("{} {}", info.name, info.version))
                    .unwrap_or_default();
                println!("{} {}", name.cyan().bold(), version.dimmed());
                for tool in client.tools() {
                    let description = tool.description.as_deref().unwrap_or("");
                    println!("  {} {}", tool.name.bold(), description.dimmed());
                }
            }
            if pool.is_empty() {
                println!("{}", "No MCP servers connected.".yellow());
            }
            ExitCode::SUCCESS
        }
    };

    stack.shutdown().await;
    code
}

async fn run_session(kind: AgentKind, settings: &Settings) -> ExitCode {
    // Invalid configuration is fatal before any server spawns
    if let Err(e) = settings.require_valid() {
        eprintln!("{} {e}", "Error:".red().bold());
        eprintln!();
        eprintln!("Run 'talking-agents doctor' for details.");
        return ExitCode::FAILURE;
    }

    let validation = settings.validate();
    for warning in &validation.warnings {
        warn!("{warning}");
    }

    let mut stack = ToolsetStack::new();
    let pool = agents::connect_servers(settings, &mut stack).await;

    let result = match agents::build_agent(kind, settings, &pool).await {
        Ok(mut agent) => repl::run(&mut agent).await,
        Err(e) => Err(e),
    };

    stack.shutdown().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
