//! Exit codes for the CLI tool.

use guitar::{Error, TypeFlag};

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Invalid command line arguments
pub const BAD_ARGS: i32 = 1;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Archive stream is malformed or uses unsupported entries
pub const BAD_ARCHIVE: i32 = 3;
/// Sidecar metadata is missing or malformed
pub const BAD_METADATA: i32 = 4;
/// I/O error
pub const IO_ERROR: i32 = 5;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    BadArgs,
    FatalError,
    BadArchive,
    BadMetadata,
    IoError,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::BadArgs => BAD_ARGS,
            Self::FatalError => FATAL_ERROR,
            Self::BadArchive => BAD_ARCHIVE,
            Self::BadMetadata => BAD_METADATA,
            Self::IoError => IO_ERROR,
        }
    }
}

/// Which way the failed command was converting.
///
/// Header conversion errors come from the archive when exporting and from
/// the sidecar when importing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Export,
    Import,
}

/// Converts a guitar error to an exit code
pub fn error_to_exit_code(error: &Error, direction: Direction) -> ExitCode {
    let input_fault = match direction {
        Direction::Export => ExitCode::BadArchive,
        Direction::Import => ExitCode::BadMetadata,
    };

    match error {
        Error::Io(_) | Error::Filesystem { .. } => ExitCode::IoError,
        Error::MetadataCodec { .. } | Error::MissingMetadata { .. } => ExitCode::BadMetadata,
        Error::UnrecognizedEntryType {
            found: TypeFlag::Native(_),
            ..
        } => ExitCode::BadArchive,
        Error::UnrecognizedEntryType {
            found: TypeFlag::Code(_),
            ..
        } => ExitCode::BadMetadata,
        Error::ModeConversion { .. } | Error::InvalidTimestamp { .. } => input_fault,
        Error::NonUtf8Path { .. } => input_fault,
        // Reading a broken archive on export, writing to a failed sink on import
        Error::Archive { .. } => match direction {
            Direction::Export => ExitCode::BadArchive,
            Direction::Import => ExitCode::IoError,
        },
        Error::PathTraversal { .. } | Error::SymlinkTargetEscape { .. } => ExitCode::FatalError,
        Error::UnsupportedFeature { .. } => ExitCode::FatalError,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}
