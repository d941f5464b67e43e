//! Backup settings for snapkeep
//!
//! The file layout uses three sections with the key names below, so configs
//! written for earlier tooling keep working:
//!
//! ```json
//! {
//!   "External": { "Discord_Webhook": "", "Message_On_Succeed": "...", "Message_On_Failed": "..." },
//!   "Internal": { "File_Name_Prefix": "backup_", "Timestamp_Format": "%Y%m%d-%H%M%S",
//!                 "Backup_Keep_Limit": 7, "Retry_On_Operation_Failed_Attempts": 3,
//!                 "Delay_Between_Each_Retry_In_Seconds": 5 },
//!   "Task": { "Source_Folder": "/data", "Destination_Base": "/backups" }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backup::retry::RetryPolicy;
use crate::backup::timestamp;
use crate::error::{SnapkeepError, SnapkeepResult};
use crate::storage::{read_config_text, write_atomic};

/// Notification endpoint and messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalSettings {
    /// Webhook URL; empty disables notifications
    #[serde(rename = "Discord_Webhook", default)]
    pub webhook_url: String,

    /// Sent after a snapshot is published
    #[serde(rename = "Message_On_Succeed", default = "default_success_message")]
    pub message_on_succeed: String,

    /// Sent, possibly followed by error detail, when a run fails
    #[serde(rename = "Message_On_Failed", default = "default_failure_message")]
    pub message_on_failed: String,

    /// Upper bound on a single webhook delivery
    #[serde(rename = "Webhook_Timeout_In_Seconds", default = "default_webhook_timeout")]
    pub webhook_timeout_secs: u64,
}

/// Naming, retry, and retention knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalSettings {
    /// Every snapshot directory name starts with this
    #[serde(rename = "File_Name_Prefix", default = "default_prefix")]
    pub file_name_prefix: String,

    /// strftime-style format for the snapshot timestamp
    #[serde(rename = "Timestamp_Format", default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Number of newest snapshots to keep
    #[serde(rename = "Backup_Keep_Limit", default = "default_keep_limit")]
    pub backup_keep_limit: u32,

    /// Attempts for copy, cleanup, and rename operations
    #[serde(
        rename = "Retry_On_Operation_Failed_Attempts",
        default = "default_retry_attempts"
    )]
    pub retry_attempts: u32,

    /// Fixed pause between attempts
    #[serde(
        rename = "Delay_Between_Each_Retry_In_Seconds",
        default = "default_retry_delay"
    )]
    pub retry_delay_secs: f64,
}

/// What to back up and where
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TaskSettings {
    #[serde(rename = "Source_Folder", default)]
    pub source_folder: String,

    #[serde(rename = "Destination_Base", default)]
    pub destination_base: String,
}

/// All settings for one backup job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(rename = "External", default)]
    pub external: ExternalSettings,

    #[serde(rename = "Internal", default)]
    pub internal: InternalSettings,

    #[serde(rename = "Task", default)]
    pub task: TaskSettings,
}

fn default_success_message() -> String {
    "Backup completed successfully.".to_string()
}

fn default_failure_message() -> String {
    "Backup failed.".to_string()
}

fn default_webhook_timeout() -> u64 {
    10
}

fn default_prefix() -> String {
    "backup_".to_string()
}

fn default_timestamp_format() -> String {
    "%Y%m%d-%H%M%S".to_string()
}

fn default_keep_limit() -> u32 {
    7
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay() -> f64 {
    5.0
}

impl Default for ExternalSettings {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            message_on_succeed: default_success_message(),
            message_on_failed: default_failure_message(),
            webhook_timeout_secs: default_webhook_timeout(),
        }
    }
}

impl Default for InternalSettings {
    fn default() -> Self {
        Self {
            file_name_prefix: default_prefix(),
            timestamp_format: default_timestamp_format(),
            backup_keep_limit: default_keep_limit(),
            retry_attempts: default_retry_attempts(),
            retry_delay_secs: default_retry_delay(),
        }
    }
}

impl ExternalSettings {
    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }
}

impl InternalSettings {
    /// The configured delay; invalid values collapse to zero
    pub fn retry_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.retry_delay_secs).unwrap_or(Duration::ZERO)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts, self.retry_delay())
    }

    pub fn keep_limit(&self) -> usize {
        self.backup_keep_limit as usize
    }
}

impl TaskSettings {
    pub fn source_path(&self) -> PathBuf {
        PathBuf::from(&self.source_folder)
    }

    pub fn destination_path(&self) -> PathBuf {
        PathBuf::from(&self.destination_base)
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

impl Settings {
    /// Parse settings from a JSON or YAML string
    pub fn from_json(contents: &str) -> SnapkeepResult<Self> {
        serde_json::from_str(contents)
            .map_err(|e| SnapkeepError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn from_yaml(contents: &str) -> SnapkeepResult<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| SnapkeepError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load settings from disk; `.yaml`/`.yml` files are YAML, anything else JSON
    pub fn load(path: &Path) -> SnapkeepResult<Self> {
        let contents = read_config_text(path)?;
        if is_yaml(path) {
            Self::from_yaml(&contents)
        } else {
            Self::from_json(&contents)
        }
    }

    /// Save settings to disk in the format implied by the extension
    pub fn save(&self, path: &Path) -> SnapkeepResult<()> {
        let contents = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        write_atomic(path, contents.as_bytes())
    }

    /// Problems that make a run pointless before any filesystem work
    fn structural_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.task.source_folder.trim().is_empty() {
            problems.push("Source_Folder is not set".to_string());
        }
        if self.task.destination_base.trim().is_empty() {
            problems.push("Destination_Base is not set".to_string());
        }
        if self.internal.retry_attempts == 0 {
            problems.push("Retry_On_Operation_Failed_Attempts must be at least 1".to_string());
        }
        if self.internal.backup_keep_limit == 0 {
            problems.push("Backup_Keep_Limit must be at least 1".to_string());
        }
        if !self.internal.retry_delay_secs.is_finite() || self.internal.retry_delay_secs < 0.0 {
            problems.push(
                "Delay_Between_Each_Retry_In_Seconds must be a non-negative number".to_string(),
            );
        }

        problems
    }

    /// Fail with a configuration error if a run cannot start
    ///
    /// The timestamp format is deliberately not checked here; it surfaces
    /// when the snapshot is named.
    pub fn check(&self) -> SnapkeepResult<()> {
        let problems = self.structural_problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(SnapkeepError::Config(problems.join("; ")))
        }
    }

    /// Everything wrong with these settings, for display
    pub fn problems(&self) -> Vec<String> {
        let mut problems = self.structural_problems();
        if let Err(e) = timestamp::check_format(&self.internal.timestamp_format) {
            problems.push(e.to_string());
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn configured() -> Settings {
        let mut settings = Settings::default();
        settings.task.source_folder = "/data".to_string();
        settings.task.destination_base = "/backups".to_string();
        settings
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.internal.file_name_prefix, "backup_");
        assert_eq!(settings.internal.timestamp_format, "%Y%m%d-%H%M%S");
        assert_eq!(settings.internal.backup_keep_limit, 7);
        assert_eq!(settings.internal.retry_attempts, 3);
        assert_eq!(settings.internal.retry_delay(), Duration::from_secs(5));
        assert!(settings.external.webhook_url.is_empty());
    }

    #[test]
    fn test_parse_sectioned_json() {
        let json = r#"{
            "External": {
                "Discord_Webhook": "https://example.com/hook",
                "Message_On_Succeed": "ok",
                "Message_On_Failed": "failed"
            },
            "Internal": {
                "File_Name_Prefix": "nightly_",
                "Timestamp_Format": "%Y-%m-%d",
                "Backup_Keep_Limit": 3,
                "Retry_On_Operation_Failed_Attempts": 2,
                "Delay_Between_Each_Retry_In_Seconds": 0.5
            },
            "Task": {
                "Source_Folder": "/srv/data",
                "Destination_Base": "/mnt/backups"
            }
        }"#;

        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.external.webhook_url, "https://example.com/hook");
        assert_eq!(settings.external.message_on_failed, "failed");
        assert_eq!(settings.internal.file_name_prefix, "nightly_");
        assert_eq!(settings.internal.keep_limit(), 3);
        assert_eq!(
            settings.internal.retry_policy(),
            RetryPolicy::new(2, Duration::from_millis(500))
        );
        assert_eq!(settings.task.source_path(), PathBuf::from("/srv/data"));
        assert_eq!(settings.external.webhook_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let settings =
            Settings::from_json(r#"{"Task": {"Source_Folder": "/a", "Destination_Base": "/b"}}"#)
                .unwrap();
        assert_eq!(settings.internal, InternalSettings::default());
        assert!(settings.check().is_ok());
    }

    #[test]
    fn test_only_discord_webhook_key_sets_url() {
        let settings =
            Settings::from_json(r#"{"External": {"Webhook_Url": "https://example.com/hook"}}"#)
                .unwrap();
        assert!(settings.external.webhook_url.is_empty());
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SnapkeepError::Config(_)));
    }

    #[test]
    fn test_save_and_load_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let settings = configured();
        settings.save(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"Source_Folder\": \"/data\""));
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_save_and_load_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");

        let settings = configured();
        settings.save(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Source_Folder"));
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_check_reports_missing_paths() {
        let err = Settings::default().check().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Source_Folder"));
        assert!(message.contains("Destination_Base"));
    }

    #[test]
    fn test_check_rejects_zero_counts() {
        let mut settings = configured();
        settings.internal.retry_attempts = 0;
        settings.internal.backup_keep_limit = 0;
        let message = settings.check().unwrap_err().to_string();
        assert!(message.contains("Retry_On_Operation_Failed_Attempts"));
        assert!(message.contains("Backup_Keep_Limit"));
    }

    #[test]
    fn test_check_rejects_negative_delay() {
        let mut settings = configured();
        settings.internal.retry_delay_secs = -1.0;
        assert!(settings.check().is_err());
        assert_eq!(settings.internal.retry_delay(), Duration::ZERO);
    }

    #[test]
    fn test_bad_format_only_in_problems() {
        let mut settings = configured();
        settings.internal.timestamp_format = "%Y%Q".to_string();
        assert!(settings.check().is_ok());
        assert_eq!(settings.problems().len(), 1);
    }
}
