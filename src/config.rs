//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::state::{MAX_INTERVAL_MINUTES, MIN_INTERVAL_MINUTES};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "stand-reminder")]
#[command(about = "A desktop reminder that periodically prompts you to stand up")]
#[command(version)]
pub struct Config {
    /// Port for the local control API
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Reminder interval in minutes
    #[arg(
        short,
        long,
        default_value = "60",
        value_parser = clap::value_parser!(u32).range(MIN_INTERVAL_MINUTES as i64..=MAX_INTERVAL_MINUTES as i64)
    )]
    pub interval: u32,

    /// Development mode: skip the automatic update check at startup
    #[arg(
        long,
        env = "STAND_REMINDER_DEV",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub dev: bool,

    /// Tray icon image; the tray is skipped when it is missing
    #[arg(long, default_value = "assets/icon.png")]
    pub tray_icon: PathBuf,

    /// JSON update feed describing the latest release
    #[arg(long)]
    pub update_feed: Option<PathBuf>,

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

    pub fn auto_check_updates(&self) -> bool {
        !self.dev
    }
}
