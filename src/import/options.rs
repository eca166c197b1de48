//! Options and results for import operations.

use crate::format::{HeaderFormat, SIDECAR_FILE_NAME};
use crate::safety::PathSafety;

/// Options for import operations.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// File name of the sidecar read from the source root.
    pub sidecar_name: String,
    /// Header layout of the produced archive.
    pub header_format: HeaderFormat,
    /// Validation of the file names listed in the sidecar before they are
    /// opened.
    pub path_safety: PathSafety,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            sidecar_name: SIDECAR_FILE_NAME.to_string(),
            header_format: HeaderFormat::default(),
            path_safety: PathSafety::default(),
        }
    }
}

impl ImportOptions {
    /// Creates import options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sidecar file name.
    pub fn sidecar_name(mut self, name: impl Into<String>) -> Self {
        self.sidecar_name = name.into();
        self
    }

    /// Sets the header layout.
    pub fn header_format(mut self, format: HeaderFormat) -> Self {
        self.header_format = format;
        self
    }

    /// Sets the path safety policy.
    pub fn path_safety(mut self, policy: PathSafety) -> Self {
        self.path_safety = policy;
        self
    }
}

/// Summary of a completed import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportResult {
    /// Entries written to the archive, hard links included.
    pub entries_written: usize,
    /// Regular files written.
    pub files: usize,
    /// Hard links written after the other entries.
    pub hard_links: usize,
    /// File content bytes written.
    pub bytes_written: u64,
}
