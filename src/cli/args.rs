//! CLI argument definitions using clap
//!
//! Commands:
//! - opsdeck serve --config <path>
//! - opsdeck seed --config <path>
//! - opsdeck demo --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// opsdeck - a definition-driven UI and record synchronization engine
#[derive(Parser, Debug)]
#[command(name = "opsdeck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Boot the backend on an in-process bus and serve until interrupted
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./opsdeck.json")]
        config: PathBuf,
    },

    /// Write seed records and definitions through the configured store
    Seed {
        /// Path to configuration file
        #[arg(long, default_value = "./opsdeck.json")]
        config: PathBuf,
    },

    /// Run the scripted client walk-through against a fresh backend
    Demo {
        /// Path to configuration file
        #[arg(long, default_value = "./opsdeck.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
