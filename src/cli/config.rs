//! Config CLI commands

use clap::Subcommand;

use crate::config::{Settings, SnapkeepPaths};
use crate::error::SnapkeepResult;

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved config file and its values
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a config command
pub fn handle_config_command(paths: &SnapkeepPaths, cmd: ConfigCommands) -> SnapkeepResult<()> {
    match cmd {
        ConfigCommands::Show => {
            println!("Config file: {}", paths.config_file().display());

            if !paths.is_initialized() {
                println!();
                println!("No config file found.");
                println!("Create one with: snapkeep config init");
                return Ok(());
            }

            let settings = Settings::load(paths.config_file())?;
            println!();
            println!("{}", serde_json::to_string_pretty(&settings)?);

            let problems = settings.problems();
            if !problems.is_empty() {
                println!();
                println!("Warnings:");
                for problem in problems {
                    println!("  - {}", problem);
                }
            }
        }

        ConfigCommands::Init { force } => {
            if paths.is_initialized() && !force {
                println!(
                    "Config file already exists: {}",
                    paths.config_file().display()
                );
                println!("To overwrite it, run again with --force flag:");
                println!("  snapkeep config init --force");
                return Ok(());
            }

            Settings::default().save(paths.config_file())?;
            println!("Wrote default config: {}", paths.config_file().display());
            println!("Set Task.Source_Folder and Task.Destination_Base before running a backup.");
        }
    }

    Ok(())
}
