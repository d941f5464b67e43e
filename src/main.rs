use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use snapkeep::cli::{
    handle_config_command, handle_list_command, handle_prune_command, handle_run_command,
    ConfigCommands,
};
use snapkeep::config::{Settings, SnapkeepPaths};
use snapkeep::logging::{init_file_logging, init_logging};

#[derive(Parser)]
#[command(
    name = "snapkeep",
    version,
    about = "Timestamped snapshot backups with retention and webhook notifications",
    long_about = "snapkeep copies a source directory to a destination root, publishes \
                  the copy under a timestamped name in a single rename, keeps only the \
                  newest snapshots, and reports the outcome to a webhook. With no \
                  command it performs a backup run."
)]
struct Cli {
    /// Config file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(short, long, global = true, env = "SNAPKEEP_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, env = "SNAPKEEP_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Back up the source folder now (default)
    Run,

    /// List snapshots under the destination, newest first
    #[command(alias = "ls")]
    List {
        /// Show timestamps, ages, and sizes
        #[arg(short, long)]
        long: bool,
    },

    /// Delete snapshots beyond the keep limit
    Prune {
        /// Actually delete; without this only a summary is printed
        #[arg(short, long)]
        force: bool,
    },

    /// Config file commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn load_settings(paths: &SnapkeepPaths) -> Result<Settings> {
    Settings::load(paths.config_file())
        .with_context(|| format!("Failed to load {}", paths.config_file().display()))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match &cli.log_file {
        Some(path) => init_file_logging(path, cli.verbose)?,
        None => init_logging(cli.verbose)?,
    }

    let paths = SnapkeepPaths::resolve(cli.config)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let settings = load_settings(&paths)?;
            Ok(ExitCode::from(handle_run_command(&settings)))
        }
        Commands::List { long } => {
            let settings = load_settings(&paths)?;
            handle_list_command(&settings, long)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Prune { force } => {
            let settings = load_settings(&paths)?;
            handle_prune_command(&settings, force)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(cmd) => {
            handle_config_command(&paths, cmd)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
