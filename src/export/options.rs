//! Options and results for export operations.

use std::path::PathBuf;

use crate::format::SIDECAR_FILE_NAME;
use crate::fs::DEFAULT_DIR_MODE;

pub use crate::safety::PathSafety;

/// Policy for symbolic-link entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymlinkPolicy {
    /// Record the link in the sidecar only; nothing is created on disk.
    #[default]
    Record,
    /// Also create the link on disk. Unix only.
    Create,
}

/// Options for export operations.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// File name of the sidecar written at the destination root.
    pub sidecar_name: String,
    /// Permission bits for directories created on disk.
    pub dir_mode: u32,
    /// Symbolic link handling policy.
    pub symlinks: SymlinkPolicy,
    /// Path safety validation policy.
    pub path_safety: PathSafety,
    /// Apply each file's modification time on disk.
    pub preserve_mtime: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            sidecar_name: SIDECAR_FILE_NAME.to_string(),
            dir_mode: DEFAULT_DIR_MODE,
            symlinks: SymlinkPolicy::default(),
            path_safety: PathSafety::default(),
            preserve_mtime: false,
        }
    }
}

impl ExportOptions {
    /// Creates export options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sidecar file name.
    pub fn sidecar_name(mut self, name: impl Into<String>) -> Self {
        self.sidecar_name = name.into();
        self
    }

    /// Sets the mode for created directories.
    pub fn dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = mode;
        self
    }

    /// Sets the symbolic link policy.
    pub fn symlinks(mut self, policy: SymlinkPolicy) -> Self {
        self.symlinks = policy;
        self
    }

    /// Sets the path safety policy.
    pub fn path_safety(mut self, policy: PathSafety) -> Self {
        self.path_safety = policy;
        self
    }

    /// Sets whether file modification times are applied on disk.
    pub fn preserve_mtime(mut self, preserve: bool) -> Self {
        self.preserve_mtime = preserve;
        self
    }
}

/// Summary of a completed export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportResult {
    /// Entries read from the archive (one sidecar line each).
    pub entries: usize,
    /// Directory entries.
    pub directories: usize,
    /// Regular files written.
    pub files: usize,
    /// Symbolic-link entries.
    pub symlinks: usize,
    /// File content bytes written.
    pub bytes_written: u64,
    /// Location of the written sidecar.
    pub sidecar_path: PathBuf,
}
