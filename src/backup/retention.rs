//! Count-based retention for published snapshots
//!
//! Only directories named `<prefix><timestamp>` whose suffix parses with the
//! configured format are snapshots. Everything else under the destination
//! root is invisible here and never deleted.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{info, warn};

use super::timestamp;
use crate::error::{SnapkeepError, SnapkeepResult};
use crate::storage::FileSystem;

/// A published snapshot found under the destination root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    /// Directory name, including the prefix
    pub name: String,
    /// Full path to the snapshot directory
    pub path: PathBuf,
    /// Timestamp parsed from the name
    pub taken_at: NaiveDateTime,
}

/// Outcome of a prune pass
#[derive(Debug, Default)]
pub struct PruneReport {
    /// Snapshots that were actually deleted, oldest first
    pub deleted: Vec<PathBuf>,
    /// Deletions that failed; each one is independent of the others
    pub failures: Vec<SnapkeepError>,
    /// Snapshots left in place by the keep-limit
    pub kept: usize,
}

/// Finds snapshots and deletes the oldest beyond a keep-limit
pub struct RetentionPruner<'a> {
    fs: &'a dyn FileSystem,
    prefix: &'a str,
    timestamp_format: &'a str,
}

impl<'a> RetentionPruner<'a> {
    pub fn new(fs: &'a dyn FileSystem, prefix: &'a str, timestamp_format: &'a str) -> Self {
        Self {
            fs,
            prefix,
            timestamp_format,
        }
    }

    /// List the snapshots under `destination_root`, oldest first
    pub fn scan(&self, destination_root: &Path) -> SnapkeepResult<Vec<SnapshotInfo>> {
        let children = self.fs.list_children(destination_root).map_err(|e| {
            SnapkeepError::Io(format!(
                "Failed to read destination {}: {}",
                destination_root.display(),
                e
            ))
        })?;

        let mut snapshots: Vec<SnapshotInfo> = children
            .into_iter()
            .filter(|child| child.is_dir)
            .filter_map(|child| {
                let suffix = child.name.strip_prefix(self.prefix)?;
                let taken_at = timestamp::parse(suffix, self.timestamp_format)?;
                Some(SnapshotInfo {
                    name: child.name,
                    path: child.path,
                    taken_at,
                })
            })
            .collect();

        // Stable sort keeps listing order for equal timestamps
        snapshots.sort_by_key(|s| s.taken_at);
        Ok(snapshots)
    }

    /// Delete the oldest snapshots so that at most `keep_limit` remain
    ///
    /// Only a failure to list the destination is returned as an error;
    /// individual deletion failures are logged and collected in the report.
    pub fn prune(&self, destination_root: &Path, keep_limit: usize) -> SnapkeepResult<PruneReport> {
        let snapshots = self.scan(destination_root)?;
        let expired = select_expired(&snapshots, keep_limit);

        let mut report = PruneReport {
            kept: snapshots.len() - expired.len(),
            ..PruneReport::default()
        };

        for snapshot in expired {
            match self.fs.remove_tree(&snapshot.path) {
                Ok(()) => {
                    info!("Deleted old snapshot {}", snapshot.path.display());
                    report.deleted.push(snapshot.path.clone());
                }
                Err(e) => {
                    let err = SnapkeepError::PruneDeletion {
                        path: snapshot.path.clone(),
                        reason: e.to_string(),
                    };
                    warn!("{}", err);
                    report.failures.push(err);
                }
            }
        }

        Ok(report)
    }
}

/// The oldest entries beyond `keep_limit`, given snapshots sorted oldest first
pub fn select_expired(snapshots: &[SnapshotInfo], keep_limit: usize) -> &[SnapshotInfo] {
    let excess = snapshots.len().saturating_sub(keep_limit);
    &snapshots[..excess]
}
