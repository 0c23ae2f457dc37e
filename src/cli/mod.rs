//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for labload using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// labload - lab results CSV to FHIR loader
#[derive(Parser, Debug)]
#[command(name = "labload")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "labload.toml", env = "LABLOAD_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LABLOAD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload lab results from the input file to the FHIR server
    Upload(commands::upload::UploadArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Check that the FHIR server is reachable
    Check(commands::check::CheckArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Commands {
    /// Whether the command reads the configuration file
    pub fn uses_config(&self) -> bool {
        !matches!(self, Commands::Init(_))
    }
}
