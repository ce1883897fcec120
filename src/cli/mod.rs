//! CLI module
//!
//! Provides the command-line interface:
//! - serve: boot the backend and park until interrupted
//! - seed: write seed records and definitions through the store
//! - demo: scripted client walk-through against a fresh backend

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{run, run_command};
pub use errors::{CliError, CliResult};
