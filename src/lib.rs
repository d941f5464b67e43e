//! snapkeep - timestamped snapshot backups of a single directory
//!
//! Each run copies the source directory into a staging area under the
//! destination root, renames it to `<prefix><timestamp>` so a snapshot is
//! never visible half-written, deletes the oldest snapshots beyond a
//! keep-limit, and reports the outcome through a webhook.
//!
//! # Architecture
//!
//! - `backup`: commit, retention, retry, and the per-run orchestrator
//! - `config`: config file resolution and settings
//! - `notify`: outcome notifications
//! - `storage`: the filesystem capability and atomic config writes
//! - `cli`/`display`: command handlers and terminal output
//! - `error`/`logging`: error types and tracing setup

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod notify;
pub mod storage;

pub use error::{SnapkeepError, SnapkeepResult};
