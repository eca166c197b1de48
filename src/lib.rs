//! # guitar
//!
//! Convert between tar archives and plain directory trees without losing
//! metadata.
//!
//! A directory tree keeps file content but forgets most of what a tar header
//! carries: permissions, ownership, device numbers, link entries, exact
//! modification times. Version-control systems forget even more. This crate
//! exports an archive into a directory plus a small sidecar file (`.guitar`)
//! that records every entry's header, and imports such a directory back into
//! an equivalent archive.
//!
//! ## Quick Start
//!
//! ### Exporting an Archive
//!
//! ```rust,no_run
//! use guitar::{ExportOptions, Result, export_from_path};
//!
//! fn main() -> Result<()> {
//!     let result = export_from_path("rootfs.tar", "rootfs/", &ExportOptions::default())?;
//!     println!(
//!         "Exported {} entries ({} files, {} bytes)",
//!         result.entries, result.files, result.bytes_written
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ### Importing a Directory
//!
//! ```rust,no_run
//! use guitar::{ImportOptions, Result, import_to_path};
//!
//! fn main() -> Result<()> {
//!     let result = import_to_path("rootfs/", "rootfs.tar", &ImportOptions::default())?;
//!     println!("Wrote {} entries", result.entries_written);
//!     Ok(())
//! }
//! ```
//!
//! ## The Sidecar File
//!
//! One JSON object per line, sorted by entry name:
//!
//! ```text
//! {"Name":"a","Type":"D","Mode":755,"ModTime":"2014-01-01T00:00:00Z"}
//! {"Name":"a/b.txt","Type":"F","Mode":644,"ModTime":"2014-01-01T00:00:00Z"}
//! {"Name":"a/c","Type":"S","Mode":777,"ModTime":"2014-01-01T00:00:00Z","Linkname":"a/b.txt"}
//! ```
//!
//! `Mode` holds the octal permission digits read as a decimal number. Zero
//! and empty fields are left out. See [`format`] for the details.
//!
//! ## What Is Not Preserved
//!
//! - Content size is never stored; import takes it from the live file
//! - The legacy NUL regular-file flag is written back as `'0'`
//! - Entry types other than the seven in [`EntryType`] abort the export
//! - Symbolic links, devices, FIFOs and hard links are recorded in the
//!   sidecar only, unless [`SymlinkPolicy::Create`] is selected
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`]. Every error aborts the whole pass;
//! see [`Error`] for the categories.
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod error;
pub mod export;
pub mod format;
pub mod fs;
pub mod hardlink;
pub mod import;
pub mod safety;
pub mod timestamp;

pub use error::{Error, ModeFault, Result, TypeFlag};
pub use timestamp::ModTime;

pub use format::{EntryType, Header, HeaderFormat, SIDECAR_FILE_NAME};

// Re-export export API at crate root for convenience
pub use export::{
    ExportOptions, ExportResult, SymlinkPolicy, export_archive, export_from_path,
    export_from_reader, for_each_entry,
};

// Re-export import API at crate root for convenience
pub use import::{ImportOptions, ImportResult, import_to_path, import_to_writer};

pub use safety::PathSafety;
