//! One backup run: validate, commit, notify, prune
//!
//! The runner is the only component that notifies. Every failure produces
//! exactly one failure notification, and a panic inside a collaborator is
//! caught and reported the same way as any other unexpected error.

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use tracing::{error, info, warn};

use super::clock::Clock;
use super::committer::SnapshotCommitter;
use super::retention::RetentionPruner;
use crate::config::Settings;
use crate::error::{FailureKind, SnapkeepError, SnapkeepResult};
use crate::notify::Notifier;
use crate::storage::FileSystem;

/// Where a run was when it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Validating,
    Staging,
    Copying,
    Renaming,
    Pruning,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Staging => "staging",
            Self::Copying => "copying",
            Self::Renaming => "renaming",
            Self::Pruning => "pruning",
        };
        write!(f, "{}", name)
    }
}

/// A failure that ended a run
#[derive(Debug)]
pub struct RunFailure {
    pub stage: RunStage,
    pub error: SnapkeepError,
}

/// What a run did
#[derive(Debug, Default)]
pub struct RunReport {
    /// The published snapshot, if the commit succeeded
    pub snapshot: Option<PathBuf>,
    /// Snapshots deleted by retention
    pub pruned: Vec<PathBuf>,
    /// Set when the run failed; the failure has already been notified
    pub failure: Option<RunFailure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// 0 on success, 1 on any notified failure
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Sequences a single backup run against injected collaborators
pub struct BackupRunner<'a> {
    settings: &'a Settings,
    fs: &'a dyn FileSystem,
    clock: &'a dyn Clock,
    notifier: &'a dyn Notifier,
}

impl<'a> BackupRunner<'a> {
    pub fn new(
        settings: &'a Settings,
        fs: &'a dyn FileSystem,
        clock: &'a dyn Clock,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            settings,
            fs,
            clock,
            notifier,
        }
    }

    /// Run the whole lifecycle once; never panics and never returns an error
    pub fn run(&self) -> RunReport {
        let mut report = RunReport::default();
        let stage = Cell::new(RunStage::Validating);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.run_stages(&stage, &mut report)
        }));

        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(failure)) => Some(failure),
            Err(payload) => Some(RunFailure {
                stage: stage.get(),
                error: SnapkeepError::Unexpected(panic_message(payload.as_ref())),
            }),
        };

        if let Some(failure) = &failure {
            error!("Backup failed while {}: {}", failure.stage, failure.error);
            self.notifier.notify(&self.failure_message(&failure.error));
        }

        report.failure = failure;
        report
    }

    fn run_stages(&self, stage: &Cell<RunStage>, report: &mut RunReport) -> Result<(), RunFailure> {
        self.settings.check().map_err(|error| RunFailure {
            stage: RunStage::Validating,
            error,
        })?;

        stage.set(RunStage::Staging);
        let snapshot = self.commit(stage).map_err(|error| RunFailure {
            stage: stage.get(),
            error,
        })?;

        info!("Backup created at {}", snapshot.display());
        report.snapshot = Some(snapshot);
        self.notifier
            .notify(&self.settings.external.message_on_succeed);

        stage.set(RunStage::Pruning);
        let internal = &self.settings.internal;
        let pruned = RetentionPruner::new(
            self.fs,
            &internal.file_name_prefix,
            &internal.timestamp_format,
        )
        .prune(&self.settings.task.destination_path(), internal.keep_limit())
        .map_err(|error| RunFailure {
            stage: RunStage::Pruning,
            error,
        })?;

        if !pruned.failures.is_empty() {
            warn!(
                "{} old snapshot(s) could not be deleted",
                pruned.failures.len()
            );
        }
        report.pruned = pruned.deleted;
        Ok(())
    }

    fn commit(&self, stage: &Cell<RunStage>) -> SnapkeepResult<PathBuf> {
        let internal = &self.settings.internal;
        let advance = |next: RunStage| stage.set(next);
        SnapshotCommitter::new(
            self.fs,
            self.clock,
            internal.retry_policy(),
            &internal.timestamp_format,
        )
        .with_progress(&advance)
        .commit(
            &self.settings.task.source_path(),
            &self.settings.task.destination_path(),
            &internal.file_name_prefix,
        )
    }

    /// The notification text for a failed run
    pub fn failure_message(&self, err: &SnapkeepError) -> String {
        let failed = &self.settings.external.message_on_failed;
        let detail = err.detail();
        match err.kind() {
            FailureKind::Configuration => failed.clone(),
            FailureKind::Cleanup => format!("{}\nCannot clean up temp folder:\n{}", failed, detail),
            FailureKind::Copy => format!("{}\nError copying folder:\n{}", failed, detail),
            FailureKind::TimestampFormat => {
                format!("{}\nInvalid timestamp format:\n{}", failed, detail)
            }
            FailureKind::Rename => format!("{}\nError renaming folder:\n{}", failed, detail),
            FailureKind::PruneDeletion | FailureKind::Unexpected => {
                format!("{}\nError: {}", failed, detail)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}
