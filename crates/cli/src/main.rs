//! Veristep CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Initialize the config directory
//! - `solve`   — Solve a question (one-shot or interactive console)
//! - `status`  — Show configuration status

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "veristep",
    about = "Veristep — plan, execute, verify: a self-checking solve loop",
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
    /// Initialize configuration
    Onboard,

    /// Solve a question through the plan/execute/verify loop
    Solve {
        /// The question to solve; omit to enter the interactive console
        question: Option<String>,

        /// Override the retry budget
        #[arg(short, long)]
        retries: Option<u32>,

        /// Print the full report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Show configuration status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Solve {
            question,
            retries,
            json,
        } => commands::solve::run(question, retries, json).await?,
        Commands::Status => commands::status::run().await?,
    }

    Ok(())
}
