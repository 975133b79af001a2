//! Foco - Pomodoro and breathing timers in the terminal
//!
//! Helps you stay focused and relaxed:
//! - 25 minutes of focused work, 5 minutes of short break
//! - 15 minutes of long break after 4 pomodoros
//! - Guided breathing exercises worth magic points

use anyhow::Result;
use clap::{CommandFactory, Parser};

use foco::cli::runner;
use foco::cli::{Cli, Commands, Display};
use foco::{ConfigError, NotificationError, Settings, SettingsError, StoreError};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    let code = match execute(cli).await {
        Ok(()) => 0,
        Err(e) => {
            Display::show_error(&format!("{:#}", e), suggestion_for(&e));
            1
        }
    };

    // Stdin is read on a blocking thread that would keep the runtime alive.
    std::process::exit(code);
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        // No command provided, show help
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Commands::Completions { shell } = command {
        generate_completions(shell);
        return Ok(());
    }

    let settings = Settings::load()?;
    match command {
        Commands::Pomodoro(args) => runner::run_pomodoro(&args, &settings).await?,
        Commands::Breathe(args) => runner::run_breathe(&args, &settings).await?,
        Commands::Patterns => runner::show_patterns(&settings),
        Commands::Stats(args) => runner::show_stats(&args, &settings)?,
        Commands::Notifications(args) => runner::manage_notifications(&args, &settings)?,
        Commands::Tasks(args) => runner::manage_tasks(&args, &settings)?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Finds a hint for the first library error in the chain.
fn suggestion_for(error: &anyhow::Error) -> Option<&'static str> {
    if let Some(e) = error.downcast_ref::<SettingsError>() {
        return Some(e.suggestion());
    }
    if let Some(e) = error.downcast_ref::<ConfigError>() {
        return Some(e.suggestion());
    }
    if let Some(e) = error.downcast_ref::<StoreError>() {
        return Some(e.suggestion());
    }
    error
        .downcast_ref::<NotificationError>()
        .map(NotificationError::suggestion)
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
