//! The normalized metadata model and its encodings.
//!
//! This module contains the [`Header`] record stored in the sidecar file, the
//! codec that maps it to and from tar headers, the ordering used to keep the
//! sidecar deterministic, and the newline-delimited JSON sidecar format
//! itself.

pub mod codec;
pub mod header;
pub mod mode;
pub mod order;
pub mod sidecar;

pub use codec::{HeaderFormat, NativeHeader};
pub use header::{EntryType, Header};
pub use order::{HeaderComparator, SortKey, sort_by_name, sort_headers};
pub use sidecar::{SIDECAR_FILE_NAME, SidecarReader};

/// Tar header type flag bytes understood by the codec.
///
/// These are the values of the single-byte `typeflag` field of a ustar/GNU
/// header. Any other value is rejected.
pub mod type_flag {
    /// Regular file.
    pub const REGULAR: u8 = b'0';
    /// Regular file, pre-POSIX encoding. Exported as a regular file and never
    /// written back.
    pub const REGULAR_LEGACY: u8 = b'\0';
    /// Hard link.
    pub const LINK: u8 = b'1';
    /// Symbolic link.
    pub const SYMLINK: u8 = b'2';
    /// Character device node.
    pub const CHAR: u8 = b'3';
    /// Block device node.
    pub const BLOCK: u8 = b'4';
    /// Directory.
    pub const DIRECTORY: u8 = b'5';
    /// FIFO node.
    pub const FIFO: u8 = b'6';
}
