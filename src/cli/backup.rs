//! Backup CLI commands
//!
//! `run`, `list`, and `prune` against the configured destination.

use chrono::Local;
use tracing::info;

use crate::backup::{select_expired, BackupRunner, RetentionPruner, SnapshotInfo, SystemClock};
use crate::config::Settings;
use crate::display::{dir_size, format_snapshot_list, SnapshotListing};
use crate::error::SnapkeepResult;
use crate::notify::notifier_from_settings;
use crate::storage::{FileSystem, LocalFileSystem};

/// Run one backup; returns the process exit code
pub fn handle_run_command(settings: &Settings) -> u8 {
    let fs = LocalFileSystem::new();
    let notifier = notifier_from_settings(&settings.external);
    let report = BackupRunner::new(settings, &fs, &SystemClock, notifier.as_ref()).run();

    match (&report.snapshot, &report.failure) {
        (Some(snapshot), None) => {
            println!("Backup created: {}", snapshot.display());
            if !report.pruned.is_empty() {
                println!("Deleted {} old snapshot(s).", report.pruned.len());
            }
        }
        (_, Some(failure)) => {
            eprintln!("Backup failed while {}: {}", failure.stage, failure.error);
        }
        (None, None) => {}
    }

    report.exit_code()
}

fn scan_snapshots(settings: &Settings, fs: &dyn FileSystem) -> SnapkeepResult<Vec<SnapshotInfo>> {
    let destination = settings.task.destination_path();
    if !fs.is_dir(&destination) {
        return Ok(Vec::new());
    }

    let internal = &settings.internal;
    RetentionPruner::new(fs, &internal.file_name_prefix, &internal.timestamp_format)
        .scan(&destination)
}

/// Show the snapshots under the destination, newest first
pub fn handle_list_command(settings: &Settings, long: bool) -> SnapkeepResult<()> {
    let fs = LocalFileSystem::new();
    let snapshots = scan_snapshots(settings, &fs)?;

    if snapshots.is_empty() {
        println!("No snapshots found in {}.", settings.task.destination_base);
        println!("Create one with: snapkeep run");
        return Ok(());
    }

    if long {
        let listings: Vec<SnapshotListing> = snapshots
            .into_iter()
            .map(|info| {
                let size_bytes = dir_size(&info.path);
                SnapshotListing { info, size_bytes }
            })
            .collect();
        print!("{}", format_snapshot_list(&listings, Local::now().naive_local()));
    } else {
        for snapshot in snapshots.iter().rev() {
            println!("{}", snapshot.name);
        }
    }

    Ok(())
}

/// Delete snapshots beyond the keep-limit; a dry run unless `force`
pub fn handle_prune_command(settings: &Settings, force: bool) -> SnapkeepResult<()> {
    settings.check()?;

    let fs = LocalFileSystem::new();
    let keep_limit = settings.internal.keep_limit();
    let snapshots = scan_snapshots(settings, &fs)?;
    let expired = select_expired(&snapshots, keep_limit);

    if expired.is_empty() {
        println!("No snapshots to prune.");
        println!(
            "Keep limit is {}; you have {} snapshot(s).",
            keep_limit,
            snapshots.len()
        );
        return Ok(());
    }

    println!("Prune Summary");
    println!("=============");
    println!("Keep limit: {}", keep_limit);
    println!("Current snapshots: {}", snapshots.len());
    println!("To be deleted: {}", expired.len());
    for snapshot in expired {
        println!("  {}", snapshot.name);
    }
    println!();

    if !force {
        println!("To delete old snapshots, run again with --force flag:");
        println!("  snapkeep prune --force");
        return Ok(());
    }

    let internal = &settings.internal;
    let report = RetentionPruner::new(&fs, &internal.file_name_prefix, &internal.timestamp_format)
        .prune(&settings.task.destination_path(), keep_limit)?;

    info!("Pruned {} snapshot(s)", report.deleted.len());
    println!("Deleted {} snapshot(s).", report.deleted.len());
    for failure in &report.failures {
        eprintln!("  {}", failure);
    }

    Ok(())
}
