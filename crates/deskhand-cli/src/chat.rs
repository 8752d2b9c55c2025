//! Interactive chat loop

use std::path::Path;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use deskhand_core::AgentSession;

pub async fn run(session: &mut AgentSession, base_dir: &Path) -> anyhow::Result<()> {
    print_banner(session, base_dir);

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("You: ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(input);

                match input.to_lowercase().as_str() {
                    "exit" | "quit" => break,
                    "reset" => {
                        session.reset();
                        println!("{}", style("Conversation has been reset.").dim());
                        continue;
                    }
                    _ => {}
                }

                let spinner = thinking_spinner();
                let reply = session.process_message(input).await;
                spinner.finish_and_clear();

                if reply.starts_with("Error: ") {
                    println!("{}", style(&reply).red());
                } else {
                    println!("{} {}", style("Assistant:").cyan().bold(), reply);
                }
                println!();
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{} {}", style("Error:").red(), err);
                break;
            }
        }
    }

    println!("{}", style("Goodbye!").cyan());
    Ok(())
}

fn print_banner(session: &AgentSession, base_dir: &Path) {
    let actions = if session.actions_enabled() {
        style("enabled").green()
    } else {
        style("disabled").yellow()
    };

    println!("{}", style("Deskhand").bold());
    println!("  Model:   {}", style(session.model()).cyan());
    println!("  Actions: {}", actions);
    println!("  Base:    {}", style(base_dir.display()).dim());
    println!(
        "{}",
        style("Type 'exit' or 'quit' to leave, 'reset' to start over.").dim()
    );
    println!();
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.magenta} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message("Thinking...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
