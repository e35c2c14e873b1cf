//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::storage::Storage;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "kitchen-timer")]
#[command(about = "A state-managed HTTP server for named countdown timers")]
#[command(version = "1.1.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20561")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Path of the JSON file the timer collection is persisted to
    #[arg(short, long)]
    pub data_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Resolve the persistence path, defaulting to the platform data dir
    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(Storage::default_path)
    }
}
