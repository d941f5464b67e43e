//! Fault-injecting filesystem for unit tests

use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{ChildEntry, FileSystem, LocalFileSystem};

/// Wraps the real filesystem and fails selected operations on demand
///
/// Copies set up with [`FlakyFileSystem::fail_copies_partially`] leave a
/// partially populated destination behind, like a copy that died halfway.
#[derive(Default)]
pub(crate) struct FlakyFileSystem {
    inner: LocalFileSystem,
    copy_failures: Cell<u32>,
    partial_copies: Cell<bool>,
    rename_failures: Cell<u32>,
    remove_failures: Cell<u32>,
    always_fail_removing: RefCell<Vec<PathBuf>>,
    panic_on_list: Cell<bool>,
    panic_on_rename: Cell<bool>,
    pub copy_calls: Cell<u32>,
    pub rename_calls: Cell<u32>,
    pub remove_calls: Cell<u32>,
    pub list_calls: Cell<u32>,
}

impl FlakyFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_copies(self, count: u32) -> Self {
        self.copy_failures.set(count);
        self
    }

    pub fn fail_copies_partially(self, count: u32) -> Self {
        self.partial_copies.set(true);
        self.fail_copies(count)
    }

    pub fn fail_renames(self, count: u32) -> Self {
        self.rename_failures.set(count);
        self
    }

    pub fn fail_removals(self, count: u32) -> Self {
        self.remove_failures.set(count);
        self
    }

    pub fn always_fail_removing(self, path: impl Into<PathBuf>) -> Self {
        self.always_fail_removing.borrow_mut().push(path.into());
        self
    }

    pub fn panic_on_rename(self) -> Self {
        self.panic_on_rename.set(true);
        self
    }

    pub fn panic_on_list(self) -> Self {
        self.panic_on_list.set(true);
        self
    }

    /// Total number of calls that could have modified the disk
    pub fn mutating_calls(&self) -> u32 {
        self.copy_calls.get() + self.rename_calls.get() + self.remove_calls.get()
    }

    fn take_failure(counter: &Cell<u32>) -> bool {
        let remaining = counter.get();
        if remaining > 0 {
            counter.set(remaining - 1);
            true
        } else {
            false
        }
    }
}

fn injected(op: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("injected {} failure", op))
}

impl FileSystem for FlakyFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.copy_calls.set(self.copy_calls.get() + 1);
        if Self::take_failure(&self.copy_failures) {
            if self.partial_copies.get() {
                fs::create_dir_all(to)?;
                fs::write(to.join(".partial"), b"")?;
            }
            return Err(injected("copy"));
        }
        self.inner.copy_tree(from, to)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.rename_calls.set(self.rename_calls.get() + 1);
        if self.panic_on_rename.get() {
            panic!("renaming {} blew up", from.display());
        }
        if Self::take_failure(&self.rename_failures) {
            return Err(injected("rename"));
        }
        self.inner.rename(from, to)
    }

    fn remove_tree(&self, path: &Path) -> io::Result<()> {
        self.remove_calls.set(self.remove_calls.get() + 1);
        if self.always_fail_removing.borrow().iter().any(|p| p == path) {
            return Err(injected("remove"));
        }
        if Self::take_failure(&self.remove_failures) {
            return Err(injected("remove"));
        }
        self.inner.remove_tree(path)
    }

    fn list_children(&self, path: &Path) -> io::Result<Vec<ChildEntry>> {
        self.list_calls.set(self.list_calls.get() + 1);
        if self.panic_on_list.get() {
            panic!("listing {} blew up", path.display());
        }
        self.inner.list_children(path)
    }
}
