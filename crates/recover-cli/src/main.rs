//! RecoverPro CLI - Debt recovery tracker
//!
//! Usage:
//!   recover serve --port 3000        Start web server
//!   recover classify "TRANSCRIPT"    Classify one call transcript
//!   recover status                   Show classifier configuration
//!   recover prompt                   Print the classification prompt

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use recover_core::ClassifierClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Serve {
            port,
            host,
            static_dir,
            allowed_origins,
        } => commands::cmd_serve(&host, port, static_dir.as_deref(), allowed_origins).await,
        Commands::Classify { transcript, json } => {
            let client = ClassifierClient::from_env();
            commands::cmd_classify(&client, &transcript, json).await
        }
        Commands::Status => {
            let client = ClassifierClient::from_env();
            commands::cmd_status(&client).await
        }
        Commands::Prompt { transcript } => commands::cmd_prompt(transcript.as_deref()),
    }
}
