//! Snapshot backup lifecycle
//!
//! # Architecture
//!
//! - `SnapshotCommitter`: copies the source into a staging directory and
//!   renames it to `<prefix><timestamp>` under the destination root
//! - `RetentionPruner`: deletes the oldest snapshots beyond the keep-limit
//! - `BackupRunner`: sequences validate, commit, notify, prune for one run
//! - `retry`: bounded, constant-delay retries used by the committer
//!
//! # Example
//!
//! ```rust,ignore
//! use snapkeep::backup::{BackupRunner, SystemClock};
//! use snapkeep::config::Settings;
//! use snapkeep::notify::notifier_from_settings;
//! use snapkeep::storage::LocalFileSystem;
//!
//! let settings = Settings::load(path)?;
//! let notifier = notifier_from_settings(&settings.external);
//! let report = BackupRunner::new(&settings, &LocalFileSystem::new(), &SystemClock, notifier.as_ref()).run();
//! std::process::exit(report.exit_code().into());
//! ```

pub mod clock;
pub mod committer;
pub mod retention;
pub mod retry;
pub mod runner;
pub mod timestamp;

pub use clock::{Clock, SystemClock};
pub use committer::SnapshotCommitter;
pub use retention::{select_expired, PruneReport, RetentionPruner, SnapshotInfo};
pub use retry::{retry, retry_when, RetryPolicy};
pub use runner::{BackupRunner, RunFailure, RunReport, RunStage};
