//! CLI command handlers
//!
//! This module bridges clap argument parsing with the backup lifecycle.

pub mod backup;
pub mod config;

pub use backup::{handle_list_command, handle_prune_command, handle_run_command};
pub use config::{handle_config_command, ConfigCommands};
