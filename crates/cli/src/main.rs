//! Hireline CLI — the main entry point.
//!
//! Commands:
//! - `intake` — Run a contract intake conversation
//! - `config` — Inspect or initialize configuration
//! - `doctor` — Diagnose setup problems

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "hireline",
    about = "Hireline — conversational employment-contract intake",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a contract intake conversation
    Intake {
        /// Opening message (skips the initial prompt)
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Inspect or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Diagnose setup problems
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file path
    Path,
    /// Write a default config file
    Init,
    /// Load and validate the configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Intake { message } => commands::intake::run(message).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::Init => commands::config_cmd::init().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
        },
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
