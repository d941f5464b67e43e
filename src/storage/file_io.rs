//! File I/O utilities with atomic writes
//!
//! Used for the configuration file, which must never be left half-written.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::SnapkeepError;

/// Read a text file, returning a config error naming the path if it is missing
pub fn read_config_text<P: AsRef<Path>>(path: P) -> Result<String, SnapkeepError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SnapkeepError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    fs::read_to_string(path)
        .map_err(|e| SnapkeepError::Io(format!("Failed to read {}: {}", path.display(), e)))
}

/// Write bytes to a file atomically (write to temp, then rename)
///
/// This ensures that the file is either completely written or not modified at all,
/// preventing corruption on crashes or power failures.
pub fn write_atomic<P: AsRef<Path>>(path: P, contents: &[u8]) -> Result<(), SnapkeepError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                SnapkeepError::Io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    // Temp file in the same directory so the rename stays on one filesystem
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = std::path::PathBuf::from(temp_name);

    let file = File::create(&temp_path)
        .map_err(|e| SnapkeepError::Io(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents)
        .map_err(|e| SnapkeepError::Io(format!("Failed to write data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| SnapkeepError::Io(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| SnapkeepError::Io(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        SnapkeepError::Io(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}
