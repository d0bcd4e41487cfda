//! Ledgerbrief CLI entry point.
//!
//! Commands:
//! - `onboard` — Write the default configuration
//! - `serve`   — Start the HTTP gateway
//! - `doctor`  — Diagnose configuration, credentials, and data files

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "ledgerbrief",
    about = "AI-assisted accounting enquiry reports",
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
    /// Initialize the configuration file
    Onboard,

    /// Start the HTTP gateway server
    Serve {
        /// Override the port (hosting platforms set PORT)
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },

    /// Diagnose configuration, credentials, and data files
    Doctor,
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
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
