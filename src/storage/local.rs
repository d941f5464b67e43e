//! [`FileSystem`] backed by the local disk

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use super::{ChildEntry, FileSystem};

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    /// Symlinks are followed and their targets copied, so the snapshot is
    /// self-contained.
    fn copy_tree(&self, from: &Path, to: &Path) -> io::Result<()> {
        if !from.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("source directory {} does not exist", from.display()),
            ));
        }
        if to.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("destination {} already exists", to.display()),
            ));
        }

        for entry in WalkDir::new(from).follow_links(true) {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            let target = to.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                fs::copy(entry.path(), &target)?;
            }
        }

        debug!("Copied {} to {}", from.display(), to.display());
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove_tree(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn list_children(&self, path: &Path) -> io::Result<Vec<ChildEntry>> {
        let mut children = Vec::new();

        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let entry_path = entry.path();
            // Follow symlinks the way a plain directory check would
            let is_dir = entry_path.is_dir();

            children.push(ChildEntry {
                name,
                path: entry_path,
                is_dir,
            });
        }

        Ok(children)
    }
}
