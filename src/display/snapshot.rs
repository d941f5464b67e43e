//! Snapshot display formatting
//!
//! Formats the retention set as a table for `snapkeep list`.

use std::path::Path;

use chrono::NaiveDateTime;
use walkdir::WalkDir;

use crate::backup::SnapshotInfo;

/// A snapshot with its on-disk size, ready for display
#[derive(Debug, Clone)]
pub struct SnapshotListing {
    pub info: SnapshotInfo,
    pub size_bytes: u64,
}

/// Total size of the regular files under `path`; unreadable entries are skipped
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}

/// Format snapshots as a table, newest first
///
/// `listings` is expected oldest first, as returned by the pruner's scan.
pub fn format_snapshot_list(listings: &[SnapshotListing], now: NaiveDateTime) -> String {
    if listings.is_empty() {
        return "No snapshots found.".to_string();
    }

    let name_width = listings
        .iter()
        .map(|l| l.info.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<19}  {:>6}  {:>10}\n",
        "Name",
        "Taken",
        "Age",
        "Size",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<19}  {:->6}  {:->10}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for listing in listings.iter().rev() {
        output.push_str(&format!(
            "{:<name_width$}  {:<19}  {:>6}  {:>10}\n",
            listing.info.name,
            listing.info.taken_at.format("%Y-%m-%d %H:%M:%S"),
            format_duration(now.signed_duration_since(listing.info.taken_at)),
            format_size(listing.size_bytes),
            name_width = name_width,
        ));
    }

    let total: u64 = listings.iter().map(|l| l.size_bytes).sum();
    output.push_str(&format!(
        "\nTotal: {} snapshot(s), {}\n",
        listings.len(),
        format_size(total)
    ));
    output
}

/// Format a duration in human-readable form
pub fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a byte count in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
