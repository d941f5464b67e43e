//! Copy-then-rename publication of a new snapshot
//!
//! The source tree is copied into a staging directory under the destination
//! root and only then renamed to `<prefix><timestamp>`, so the destination
//! never shows a partially written snapshot under its final name.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::clock::Clock;
use super::retry::{retry, retry_when, RetryPolicy};
use super::runner::RunStage;
use super::timestamp;
use crate::error::{SnapkeepError, SnapkeepResult};
use crate::storage::FileSystem;

/// Publishes one snapshot per call to [`SnapshotCommitter::commit`]
pub struct SnapshotCommitter<'a> {
    fs: &'a dyn FileSystem,
    clock: &'a dyn Clock,
    retry: RetryPolicy,
    cleanup_retry: RetryPolicy,
    timestamp_format: &'a str,
    progress: Option<&'a dyn Fn(RunStage)>,
}

impl<'a> SnapshotCommitter<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        clock: &'a dyn Clock,
        retry: RetryPolicy,
        timestamp_format: &'a str,
    ) -> Self {
        Self {
            fs,
            clock,
            retry,
            cleanup_retry: RetryPolicy::best_effort_cleanup(),
            timestamp_format,
            progress: None,
        }
    }

    /// Override the policy used to discard staging after rename exhaustion
    pub fn with_cleanup_policy(mut self, policy: RetryPolicy) -> Self {
        self.cleanup_retry = policy;
        self
    }

    /// Report each phase (staging, copying, renaming) as it starts
    pub fn with_progress(mut self, progress: &'a dyn Fn(RunStage)) -> Self {
        self.progress = Some(progress);
        self
    }

    fn enter(&self, stage: RunStage) {
        if let Some(progress) = self.progress {
            progress(stage);
        }
    }

    /// The staging directory: the source's base name under the destination root
    pub fn staging_path(source: &Path, destination_root: &Path) -> SnapkeepResult<PathBuf> {
        let name = source.file_name().ok_or_else(|| {
            SnapkeepError::Config(format!(
                "Cannot determine a folder name for source {}",
                source.display()
            ))
        })?;
        Ok(destination_root.join(name))
    }

    /// Copy `source` under `destination_root` and publish it as a snapshot
    ///
    /// Returns the final snapshot path. Failures come back as
    /// [`SnapkeepError::Cleanup`], [`SnapkeepError::Copy`],
    /// [`SnapkeepError::TimestampFormat`], or a rename error; nothing is
    /// notified from here.
    pub fn commit(
        &self,
        source: &Path,
        destination_root: &Path,
        prefix: &str,
    ) -> SnapkeepResult<PathBuf> {
        let staging = Self::staging_path(source, destination_root)?;

        self.enter(RunStage::Staging);
        self.purge_stale_staging(&staging)?;
        self.enter(RunStage::Copying);
        self.copy_to_staging(source, &staging)?;
        self.enter(RunStage::Renaming);
        self.publish(&staging, destination_root, prefix)
    }

    fn purge_stale_staging(&self, staging: &Path) -> SnapkeepResult<()> {
        if !self.fs.exists(staging) {
            return Ok(());
        }

        warn!(
            "Found leftover staging directory {}, removing it",
            staging.display()
        );
        retry(&self.retry, "Staging cleanup", || self.fs.remove_tree(staging)).map_err(|e| {
            SnapkeepError::Cleanup {
                path: staging.to_path_buf(),
                reason: e.to_string(),
            }
        })
    }

    // On failure the staging directory is left as-is for inspection.
    fn copy_to_staging(&self, source: &Path, staging: &Path) -> SnapkeepResult<()> {
        info!("Copying {} to {}", source.display(), staging.display());
        retry(&self.retry, "Copy", || self.fs.copy_tree(source, staging)).map_err(|e| {
            SnapkeepError::Copy {
                source_dir: source.to_path_buf(),
                reason: e.to_string(),
            }
        })
    }

    fn publish(
        &self,
        staging: &Path,
        destination_root: &Path,
        prefix: &str,
    ) -> SnapkeepResult<PathBuf> {
        let result = retry_when(&self.retry, "Rename", SnapkeepError::is_retryable, || {
            // A fresh timestamp per attempt; the clock has moved on since the last one
            let stamp = timestamp::render(&self.clock.now(), self.timestamp_format)?;
            let final_path = destination_root.join(format!("{}{}", prefix, stamp));

            if self.fs.exists(&final_path) {
                return Err(SnapkeepError::RenameCollision { path: final_path });
            }

            self.fs
                .rename(staging, &final_path)
                .map_err(|e| SnapkeepError::Rename {
                    from: staging.to_path_buf(),
                    to: final_path.clone(),
                    reason: e.to_string(),
                })?;

            Ok(final_path)
        });

        match result {
            Ok(final_path) => {
                info!("Published snapshot {}", final_path.display());
                Ok(final_path)
            }
            Err(err) => {
                if err.is_retryable() {
                    self.discard_staging(staging);
                }
                Err(err)
            }
        }
    }

    fn discard_staging(&self, staging: &Path) {
        if !self.fs.exists(staging) {
            return;
        }
        match retry(&self.cleanup_retry, "Discard staging", || {
            self.fs.remove_tree(staging)
        }) {
            Ok(()) => debug!("Removed staging directory {}", staging.display()),
            Err(e) => debug!(
                "Could not remove staging directory {}: {}",
                staging.display(),
                e
            ),
        }
    }
}
