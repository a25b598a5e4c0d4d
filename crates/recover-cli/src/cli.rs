//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// RecoverPro - Track debtor commitments and outstanding dues
#[derive(Parser)]
#[command(name = "recover")]
#[command(about = "Debt recovery tracker with transcript classification", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory with a built UI to serve at /
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origin (repeatable; default same-origin only)
        #[arg(long = "allowed-origin")]
        allowed_origins: Vec<String>,
    },

    /// Classify a call transcript with the configured classifier
    Classify {
        /// Transcript or call note text
        transcript: String,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show classifier configuration and tracker constants
    Status,

    /// Print the rendered classification prompt
    Prompt {
        /// Transcript to substitute into the prompt
        #[arg(short, long)]
        transcript: Option<String>,
    },
}
