//! Deskhand CLI - chat with a local model that can act on this machine
//!
//! Runs either a single query or an interactive session against the
//! configured inference server.

mod chat;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use deskhand_core::actions::standard_registry;
use deskhand_core::config::{defaults, Config, ConfigManager};
use deskhand_core::{ActionRegistry, AgentSession, OllamaBackend, SessionConfig};

const VERBOSE_DIRECTIVES: &str = "info,deskhand_core=debug,deskhand_sandbox=debug";

#[derive(Parser)]
#[command(name = "deskhand")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chat with a local model that can run whitelisted actions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Model to use (defaults to the config setting)
    #[arg(short, long)]
    model: Option<String>,

    /// Inference server address
    #[arg(long)]
    base_url: Option<String>,

    /// Replace the default assistant prompt
    #[arg(short, long)]
    system_prompt: Option<String>,

    /// Process a single query and exit
    #[arg(short = 'q', long)]
    single_query: Option<String>,

    /// Do not run actions requested by the model
    #[arg(long)]
    disable_actions: bool,

    /// Base directory for file operations and commands
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show available actions
    Actions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone())?,
        None => ConfigManager::new()?,
    };
    let config = apply_overrides(manager.config().clone(), &cli)?;

    // Logs go to stderr so they stay out of the replies
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, &config.general.log_level))
        .with_writer(std::io::stderr)
        .init();

    let base_dir = config.actions.resolve_base_dir()?;
    let registry = Arc::new(standard_registry(
        base_dir.clone(),
        config.actions.shell_config(),
    ));

    if let Some(Commands::Actions) = cli.command {
        show_actions(&registry, &base_dir);
        return Ok(());
    }

    let backend = OllamaBackend::new(&config.backend)?;
    let mut session = AgentSession::new(
        Box::new(backend),
        registry,
        SessionConfig::from_config(&config).with_base_dir(&base_dir),
    );

    match cli.single_query {
        Some(query) => {
            let reply = session.process_message(query).await;
            println!("{}", reply);
        }
        None => chat::run(&mut session, &base_dir).await?,
    }

    Ok(())
}

/// `RUST_LOG` wins, then `--verbose`, then the configured level
fn log_filter(verbose: bool, configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(default_directives(verbose, configured))
            .unwrap_or_else(|_| EnvFilter::new(defaults::LOG_LEVEL))
    })
}

fn default_directives(verbose: bool, configured: &str) -> &str {
    if verbose {
        VERBOSE_DIRECTIVES
    } else if configured.trim().is_empty() {
        defaults::LOG_LEVEL
    } else {
        configured
    }
}

/// Command-line flags win over the config file
fn apply_overrides(mut config: Config, cli: &Cli) -> anyhow::Result<Config> {
    if let Some(model) = &cli.model {
        config.backend.model = model.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
    }
    if let Some(prompt) = &cli.system_prompt {
        config.general.system_prompt = Some(prompt.clone());
    }
    if cli.disable_actions {
        config.actions.enabled = false;
    }
    if let Some(workspace) = &cli.workspace {
        config.actions.base_dir = Some(absolute_workspace(workspace)?);
    }
    Ok(config)
}

/// Use dunce::canonicalize to avoid the UNC prefix on Windows
fn absolute_workspace(path: &Path) -> anyhow::Result<PathBuf> {
    match dunce::canonicalize(path) {
        Ok(path) => Ok(path),
        Err(e) => anyhow::bail!("Workspace {} is not usable: {}", path.display(), e),
    }
}

fn show_actions(registry: &ActionRegistry, base_dir: &Path) {
    println!("{}", style("Available Actions:").bold());
    println!();

    for (name, description) in registry.list() {
        println!("  {:<16} {}", style(name).cyan(), description);
    }

    println!();
    println!("  Base directory: {}", style(base_dir.display()).green());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_is_the_default() {
        assert_eq!(default_directives(false, "debug"), "debug");
        assert_eq!(default_directives(false, "  "), "warn");
    }

    #[test]
    fn test_verbose_overrides_configured_level() {
        assert_eq!(default_directives(true, "error"), VERBOSE_DIRECTIVES);
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::parse_from(["deskhand", "--model", "mistral", "--disable-actions"]);
        let config = apply_overrides(Config::default(), &cli).unwrap();
        assert_eq!(config.backend.model, "mistral");
        assert!(!config.actions.enabled);
        assert_eq!(config.general.log_level, "warn");
    }

    #[test]
    fn test_actions_is_the_only_subcommand() {
        assert!(Cli::try_parse_from(["deskhand", "chat"]).is_err());
        let cli = Cli::parse_from(["deskhand", "actions"]);
        assert!(matches!(cli.command, Some(Commands::Actions)));
    }
}
