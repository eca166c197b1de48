//! Directory tree to tar stream.
//!
//! Import reads the sidecar at the root of a previously exported tree and
//! writes one archive entry per line. Regular files take their content and
//! size from the live file, so edits made after the export are picked up.
//! Hard links are held back and written after every other entry, because
//! the sidecar order does not guarantee that a link's target comes first.
//!
//! # Example
//!
//! ```rust,no_run
//! use guitar::{ImportOptions, import_to_path};
//!
//! # fn main() -> guitar::Result<()> {
//! let result = import_to_path("release/", "release.tar", &ImportOptions::default())?;
//! println!("{} entries, {} hard links", result.entries_written, result.hard_links);
//! # Ok(())
//! # }
//! ```

mod options;

pub use options::{ImportOptions, ImportResult};

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::format::sidecar::sidecar_path;
use crate::format::{EntryType, NativeHeader, SidecarReader, codec};
use crate::fs;
use crate::hardlink::DeferredLinks;
use crate::safety::resolve_entry_path;
use crate::{Error, Result};

/// Writes the archive described by the tree at `source` into `writer`.
///
/// # Errors
///
/// - [`Error::Filesystem`] if `source` is not an accessible directory or a
///   listed file cannot be read
/// - [`Error::MissingMetadata`] if the tree has no sidecar
/// - [`Error::MetadataCodec`] or [`Error::UnrecognizedEntryType`] for a
///   malformed sidecar line
/// - [`Error::Archive`] if the stream cannot be written
///
/// Nothing is written to `writer` when the sidecar is missing. After a later
/// failure the stream is incomplete.
pub fn import_to_writer<W: Write>(
    writer: W,
    source: impl AsRef<Path>,
    options: &ImportOptions,
) -> Result<ImportResult> {
    let root = fs::resolve_dir(source.as_ref())?;
    let (metadata_path, metadata) = open_metadata(&root, options)?;
    write_archive(writer, &root, &metadata_path, metadata, options)
}

/// Writes the archive described by the tree at `source` to a file.
///
/// An existing file at `archive_path` is truncated, but only once the
/// source directory and its sidecar have been found.
pub fn import_to_path(
    source: impl AsRef<Path>,
    archive_path: impl AsRef<Path>,
    options: &ImportOptions,
) -> Result<ImportResult> {
    let root = fs::resolve_dir(source.as_ref())?;
    let (metadata_path, metadata) = open_metadata(&root, options)?;
    let file = fs::create_file(archive_path.as_ref())?;
    write_archive(BufWriter::new(file), &root, &metadata_path, metadata, options)
}

fn open_metadata(root: &Path, options: &ImportOptions) -> Result<(PathBuf, File)> {
    let metadata_path = sidecar_path(root, &options.sidecar_name);
    match File::open(&metadata_path) {
        Ok(file) => Ok((metadata_path, file)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::MissingMetadata {
            path: metadata_path,
        }),
        Err(e) => Err(Error::filesystem("open metadata", &metadata_path, e)),
    }
}

fn write_archive<W: Write>(
    writer: W,
    root: &Path,
    metadata_path: &Path,
    metadata: File,
    options: &ImportOptions,
) -> Result<ImportResult> {
    let mut builder = tar::Builder::new(writer);
    let mut deferred = DeferredLinks::new();
    let mut result = ImportResult::default();

    log::info!("Importing entries from '{}'", root.display());
    for header in SidecarReader::new(BufReader::new(metadata)) {
        let header = header.map_err(|e| match e {
            Error::Io(e) => Error::filesystem("read metadata", metadata_path, e),
            other => other,
        })?;
        let native = codec::import(&header, options.header_format)?;

        match header.entry_type() {
            EntryType::HardLink => {
                log::debug!("Deferring hard link '{}'", header.name());
                deferred.push(native);
            }
            EntryType::File => {
                log::debug!("{} {}", header.entry_type(), header.name());
                result.bytes_written += append_file(&mut builder, native, root, options)?;
                result.files += 1;
                result.entries_written += 1;
            }
            EntryType::Directory
            | EntryType::Symlink
            | EntryType::CharDevice
            | EntryType::BlockDevice
            | EntryType::Fifo => {
                log::debug!("{} {}", header.entry_type(), header.name());
                append_header(&mut builder, native)?;
                result.entries_written += 1;
            }
        }
    }

    if !deferred.is_empty() {
        log::info!("Writing {} deferred hard links", deferred.len());
    }
    for link in deferred {
        append_header(&mut builder, link)?;
        result.hard_links += 1;
        result.entries_written += 1;
    }

    let mut writer = builder
        .into_inner()
        .map_err(|e| Error::archive("finish archive", e))?;
    writer
        .flush()
        .map_err(|e| Error::archive("flush archive", e))?;

    Ok(result)
}

fn append_file<W: Write>(
    builder: &mut tar::Builder<W>,
    native: NativeHeader,
    root: &Path,
    options: &ImportOptions,
) -> Result<u64> {
    let path = resolve_entry_path(native.path(), root, options.path_safety)?;
    let (file, size) = fs::open_file(&path)?;

    let (mut header, name, _) = native.into_parts();
    header.set_size(size);
    builder
        .append_data(&mut header, &name, file.take(size))
        .map_err(|e| Error::archive(format!("write file '{}'", name), e))?;
    Ok(size)
}

fn append_header<W: Write>(builder: &mut tar::Builder<W>, native: NativeHeader) -> Result<()> {
    let (mut header, name, link_name) = native.into_parts();
    let outcome = match link_name {
        Some(target) => builder.append_link(&mut header, &name, &target),
        None => builder.append_data(&mut header, &name, io::empty()),
    };
    outcome.map_err(|e| Error::archive(format!("write header of '{}'", name), e))
}
