//! Storage layer for snapkeep
//!
//! The backup lifecycle touches the filesystem only through the
//! [`FileSystem`] capability, so tests can substitute a fault-injecting
//! implementation without changing any core logic.

pub mod file_io;
pub mod local;

#[cfg(test)]
pub(crate) mod testing;

pub use file_io::{read_config_text, write_atomic};
pub use local::LocalFileSystem;

use std::io;
use std::path::{Path, PathBuf};

/// A direct child of a directory, as seen by [`FileSystem::list_children`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    /// File name (non-UTF-8 names are never reported)
    pub name: String,
    /// Full path to the entry
    pub path: PathBuf,
    /// Whether the entry is a directory
    pub is_dir: bool,
}

/// Minimal filesystem capability used by the committer and the pruner
pub trait FileSystem {
    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is an existing directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Recursively copy the directory `from` to the not-yet-existing path `to`
    fn copy_tree(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Rename `from` to `to` in a single filesystem operation
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Recursively delete the directory at `path`
    fn remove_tree(&self, path: &Path) -> io::Result<()>;

    /// List the direct children of the directory at `path`
    fn list_children(&self, path: &Path) -> io::Result<Vec<ChildEntry>>;
}
