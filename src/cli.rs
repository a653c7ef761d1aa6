use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "radarr-relay")]
#[command(author, version, about = "Relay between Unmanic and Radarr")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the webhook receiver
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Notify Radarr about a finished Unmanic task
    Notify {
        /// Task results JSON file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        data: String,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        #[arg(value_name = "CONFIG")]
        file: Option<PathBuf>,
    },

    /// Show which rules a webhook payload would match, without contacting Unmanic's task queue
    CheckRules {
        /// Radarr webhook payload JSON file
        #[arg(long)]
        payload: PathBuf,
    },

    /// Display version information
    Version,

    /// Generate a random secret for webhook signature verification
    GenerateSecret,
}
