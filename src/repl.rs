// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Interactive read-eval-print loop.
//!
//! One line in, one agent turn out. Turn errors are printed and the loop
//! continues; only readline failures end the session.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::error;

use crate::agent::Agent;
use crate::error::Result;

const PROMPT: &str = "User: ";

/// Run the interactive loop until the user exits.
pub async fn run(agent: &mut Agent) -> Result<()> {
    println!(
        "{} {} ({})",
        "Talking to".dimmed(),
        agent.name().cyan().bold(),
        agent.model().dimmed()
    );
    println!("{}", "Type 'exit' or 'quit' to leave.".dimmed());

    let mut editor = DefaultEditor::new()?;

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                if matches!(input, "exit" | "quit") {
                    println!("{}", "Goodbye.".dimmed());
                    break;
                }

                let _ = editor.add_history_entry(input);

                match agent.chat(input).await {
                    Ok(reply) => {
                        println!("{} {}", format!("{}:", agent.name()).cyan().bold(), reply);
                    }
                    Err(e) => {
                        error!(error = %e, "agent turn failed");
                        println!("{} {e}", "Error:".red().bold());
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye.".dimmed());
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
