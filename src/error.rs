//! Error types for export and import operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when converting between tar streams and directory trees,
//! along with a convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! Every error aborts the current export or import pass in full. There is no
//! partial-success mode and the library never retries; the caller decides how
//! to report the failure.
//!
//! ```rust,no_run
//! use guitar::{Error, ImportOptions, import_to_writer};
//!
//! fn rebuild(dir: &str) -> guitar::Result<Vec<u8>> {
//!     let mut tar = Vec::new();
//!     match import_to_writer(&mut tar, dir, &ImportOptions::default()) {
//!         Ok(_) => Ok(tar),
//!         Err(Error::MissingMetadata { path }) => {
//!             eprintln!("No metadata at {}; was the directory exported?", path.display());
//!             Err(Error::MissingMetadata { path })
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use std::io;
use std::path::PathBuf;

/// The type tag that could not be mapped to a known entry type.
///
/// The export direction sees raw tar type flag bytes, the import direction
/// sees the one-letter codes stored in the sidecar. Both are reported through
/// [`Error::UnrecognizedEntryType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeFlag {
    /// A tar header type flag byte.
    Native(u8),
    /// A sidecar type letter.
    Code(String),
}

impl std::fmt::Display for TypeFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native(byte) if byte.is_ascii_graphic() => {
                write!(f, "type flag '{}' ({:#04x})", *byte as char, byte)
            }
            Self::Native(byte) => write!(f, "type flag {:#04x}", byte),
            Self::Code(code) => write!(f, "type code {:?}", code),
        }
    }
}

/// Why a mode value could not be converted between its octal and
/// decimal-digit forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeFault {
    /// The stored value is negative.
    Negative,
    /// The stored value contains the digit 8 or 9, so it does not spell an
    /// octal number.
    NonOctalDigit,
    /// The value exceeds the largest mode a tar header can carry.
    OutOfRange,
}

impl std::fmt::Display for ModeFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => write!(f, "mode is negative"),
            Self::NonOctalDigit => write!(f, "mode digits are not octal"),
            Self::OutOfRange => write!(f, "mode exceeds 0o7777777"),
        }
    }
}

/// The main error type for export and import operations.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | Codec | [`UnrecognizedEntryType`][Self::UnrecognizedEntryType], [`ModeConversion`][Self::ModeConversion], [`InvalidTimestamp`][Self::InvalidTimestamp] | Headers outside the normalized model |
/// | Metadata | [`MetadataCodec`][Self::MetadataCodec], [`MissingMetadata`][Self::MissingMetadata] | Corrupt or absent sidecar |
/// | Filesystem | [`Filesystem`][Self::Filesystem], [`Io`][Self::Io] | Directory and file operations |
/// | Stream | [`Archive`][Self::Archive] | Reading or writing the tar stream |
/// | Security | [`PathTraversal`][Self::PathTraversal], [`SymlinkTargetEscape`][Self::SymlinkTargetEscape] | Entry names or link targets escaping the destination |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error that is not tied to a specific path or stream operation.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A tar type flag or sidecar type letter is outside the seven known
    /// entry types.
    ///
    /// Unknown types are never coerced to a default; the whole pass fails.
    #[error("Unrecognized {found} for entry '{entry}'")]
    UnrecognizedEntryType {
        /// Name of the offending entry.
        entry: String,
        /// The flag byte or letter that was not recognized.
        found: TypeFlag,
    },

    /// A mode value could not be converted between octal and its
    /// decimal-digit representation.
    #[error("Cannot convert mode {value} of entry '{entry}': {fault}")]
    ModeConversion {
        /// Name of the offending entry.
        entry: String,
        /// The value as it was found (native mode or stored digits).
        value: i64,
        /// What was wrong with the value.
        fault: ModeFault,
    },

    /// A modification time cannot be carried between a tar header and the
    /// sidecar: it predates the Unix epoch, or it lies beyond the last
    /// representable date.
    #[error("Modification time of entry '{entry}' ({secs}s) is outside the range tar can carry")]
    InvalidTimestamp {
        /// Name of the offending entry.
        entry: String,
        /// Seconds relative to the Unix epoch.
        secs: i64,
    },

    /// A filesystem operation on a specific path failed.
    #[error("Failed to {operation} '{}': {source}", path.display())]
    Filesystem {
        /// The operation that failed, e.g. "create file".
        operation: &'static str,
        /// The affected path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A sidecar line could not be encoded or decoded as JSON.
    ///
    /// A corrupt or partially written sidecar is never partially imported.
    #[error("Metadata line {line}: {source}")]
    MetadataCodec {
        /// 1-based line number in the sidecar file.
        line: usize,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The sidecar metadata file does not exist.
    ///
    /// Without metadata no archive can be reconstructed.
    #[error("Metadata file not found at '{}'", path.display())]
    MissingMetadata {
        /// Where the sidecar was expected.
        path: PathBuf,
    },

    /// Reading from or writing to the tar stream failed.
    #[error("Archive error while trying to {context}: {source}")]
    Archive {
        /// What was being done, including the entry name when known.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An entry path is not valid UTF-8 and cannot be stored in the sidecar.
    #[error("Entry path is not valid UTF-8: {}", path.display())]
    NonUtf8Path {
        /// The offending path, lossily displayed.
        path: PathBuf,
    },

    /// An entry name would place a file outside the destination directory.
    #[error("Path traversal detected in entry '{entry}'")]
    PathTraversal {
        /// Name of the offending entry.
        entry: String,
    },

    /// A symbolic link target would point outside the destination directory.
    #[error("Symlink '{entry}' points outside the destination: '{target}'")]
    SymlinkTargetEscape {
        /// Name of the symlink entry.
        entry: String,
        /// The rejected link target.
        target: String,
    },

    /// The requested action is not available on this platform.
    #[error("Unsupported feature: {feature}")]
    UnsupportedFeature {
        /// The name of the unsupported feature.
        feature: &'static str,
    },
}

impl Error {
    /// Returns `true` if this error came from the header codec.
    pub fn is_codec_error(&self) -> bool {
        matches!(
            self,
            Error::UnrecognizedEntryType { .. }
                | Error::ModeConversion { .. }
                | Error::InvalidTimestamp { .. }
        )
    }

    /// Returns `true` if the sidecar metadata was absent or malformed.
    pub fn is_metadata_error(&self) -> bool {
        matches!(
            self,
            Error::MetadataCodec { .. } | Error::MissingMetadata { .. }
        )
    }

    /// Returns the entry name associated with this error, if any.
    ///
    /// # Example
    ///
    /// ```rust
    /// use guitar::Error;
    ///
    /// fn log_error(error: &Error) {
    ///     if let Some(name) = error.entry_name() {
    ///         eprintln!("Error for '{}': {}", name, error);
    ///     }
    /// }
    /// ```
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Error::UnrecognizedEntryType { entry, .. } => Some(entry.as_str()),
            Error::ModeConversion { entry, .. } => Some(entry.as_str()),
            Error::InvalidTimestamp { entry, .. } => Some(entry.as_str()),
            Error::PathTraversal { entry } => Some(entry.as_str()),
            Error::SymlinkTargetEscape { entry, .. } => Some(entry.as_str()),
            _ => None,
        }
    }

    /// Returns the filesystem path associated with this error, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Error::Filesystem { path, .. } => Some(path.as_path()),
            Error::MissingMetadata { path } => Some(path.as_path()),
            Error::NonUtf8Path { path } => Some(path.as_path()),
            _ => None,
        }
    }

    /// Creates a Filesystem error.
    pub fn filesystem(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Filesystem {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Creates an Archive error.
    pub fn archive(context: impl Into<String>, source: io::Error) -> Self {
        Error::Archive {
            context: context.into(),
            source,
        }
    }
}

/// A specialized Result type for guitar operations.
///
/// This is defined as `std::result::Result<T, Error>` for convenience.
pub type Result<T> = std::result::Result<T, Error>;
