//! Custom error types for snapkeep
//!
//! This module defines the error hierarchy for the backup lifecycle using
//! thiserror. Each variant corresponds to one failure class the orchestrator
//! knows how to report.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for snapkeep operations
#[derive(Error, Debug)]
pub enum SnapkeepError {
    /// Missing or invalid configuration values
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors outside the snapshot lifecycle
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// A stale or leftover staging directory could not be removed
    #[error("Failed to clean up staging directory {}: {reason}", path.display())]
    Cleanup { path: PathBuf, reason: String },

    /// Recursive copy into the staging directory failed
    #[error("Failed to copy {}: {reason}", source_dir.display())]
    Copy { source_dir: PathBuf, reason: String },

    /// The configured timestamp format cannot render the current time
    #[error("Invalid timestamp format '{format}': {reason}")]
    TimestampFormat { format: String, reason: String },

    /// The final snapshot path already exists
    #[error("Folder '{}' already exists.", path.display())]
    RenameCollision { path: PathBuf },

    /// Renaming the staging directory into place failed
    #[error("Failed to rename {} to {}: {reason}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    /// An expired snapshot could not be deleted
    #[error("Failed to delete {}: {reason}", path.display())]
    PruneDeletion { path: PathBuf, reason: String },

    /// Anything that escaped the handled paths
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Coarse classification of a [`SnapkeepError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Configuration,
    Cleanup,
    Copy,
    TimestampFormat,
    Rename,
    PruneDeletion,
    Unexpected,
}

impl SnapkeepError {
    /// Classify this error for notification and exit-code decisions
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Config(_) => FailureKind::Configuration,
            Self::Cleanup { .. } => FailureKind::Cleanup,
            Self::Copy { .. } => FailureKind::Copy,
            Self::TimestampFormat { .. } => FailureKind::TimestampFormat,
            Self::RenameCollision { .. } | Self::Rename { .. } => FailureKind::Rename,
            Self::PruneDeletion { .. } => FailureKind::PruneDeletion,
            Self::Io(_) | Self::Json(_) | Self::Yaml(_) | Self::Unexpected(_) => {
                FailureKind::Unexpected
            }
        }
    }

    /// The underlying failure text, without the variant's framing
    pub fn detail(&self) -> String {
        match self {
            Self::Config(msg)
            | Self::Io(msg)
            | Self::Json(msg)
            | Self::Yaml(msg)
            | Self::Unexpected(msg) => msg.clone(),
            Self::Cleanup { reason, .. }
            | Self::Copy { reason, .. }
            | Self::TimestampFormat { reason, .. }
            | Self::Rename { reason, .. }
            | Self::PruneDeletion { reason, .. } => reason.clone(),
            Self::RenameCollision { .. } => self.to_string(),
        }
    }

    /// Whether the failure is transient and worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RenameCollision { .. } | Self::Rename { .. })
    }
}

impl From<std::io::Error> for SnapkeepError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SnapkeepError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for SnapkeepError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

/// Result type alias for snapkeep operations
pub type SnapkeepResult<T> = Result<T, SnapkeepError>;
