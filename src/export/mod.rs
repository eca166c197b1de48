//! Tar stream to directory tree.
//!
//! Export reads an archive entry by entry, writes directories and file
//! content under the destination, and records every entry's header in the
//! sidecar file at the destination root. The sidecar is written last, sorted
//! by name, so the same set of entries always produces the same bytes.
//!
//! # Example
//!
//! ```rust,no_run
//! use guitar::{ExportOptions, export_from_path};
//!
//! # fn main() -> guitar::Result<()> {
//! let result = export_from_path("release.tar", "release/", &ExportOptions::default())?;
//! println!("{} entries, {} files", result.entries, result.files);
//! # Ok(())
//! # }
//! ```

mod options;

pub use options::{ExportOptions, ExportResult, PathSafety, SymlinkPolicy};

use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

use crate::format::sidecar::{sidecar_path, write_sidecar};
use crate::format::{EntryType, Header, NativeHeader, codec, sort_by_name};
use crate::fs;
use crate::safety::{resolve_entry_path, resolve_link_path, validate_symlink_target};
use crate::{Error, Result};

/// Calls `f` for every entry of the archive, in stream order.
///
/// Each entry is handed over together with its [`NativeHeader`]; the entry
/// itself is the body reader. Stream failures abort with
/// [`Error::Archive`].
pub fn for_each_entry<R, F>(archive: &mut tar::Archive<R>, mut f: F) -> Result<()>
where
    R: Read,
    F: FnMut(&mut tar::Entry<'_, R>, NativeHeader) -> Result<()>,
{
    let entries = archive
        .entries()
        .map_err(|e| Error::archive("read archive entries", e))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| Error::archive("read next entry", e))?;
        let native = NativeHeader::from_entry(&entry)?;
        f(&mut entry, native)?;
    }
    Ok(())
}

/// Exports an open archive into `dest`.
///
/// The destination is created if it does not exist. Existing directories and
/// files are reused or overwritten.
///
/// # Errors
///
/// Any codec, path, filesystem or stream error aborts the export. Content
/// written before the failure stays on disk and no sidecar is written.
pub fn export_archive<R: Read>(
    archive: &mut tar::Archive<R>,
    dest: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<ExportResult> {
    let dest = dest.as_ref();
    fs::create_dir_all(dest, options.dir_mode)?;

    let mut headers = Vec::new();
    let mut result = ExportResult::default();

    log::info!("Exporting entries to '{}'", dest.display());
    for_each_entry(archive, |entry, native| {
        let header = codec::export(&native)?;
        log::debug!("{} {}", header.entry_type(), header.name());
        if header.name() == options.sidecar_name {
            log::warn!(
                "Entry '{}' has the sidecar's name and will be replaced by it",
                header.name()
            );
        }
        materialize(entry, &header, dest, options, &mut result)?;
        headers.push(header);
        Ok(())
    })?;

    result.entries = headers.len();
    sort_by_name(&mut headers);

    let sidecar = sidecar_path(dest, &options.sidecar_name);
    log::info!(
        "Writing metadata for {} entries to '{}'",
        headers.len(),
        sidecar.display()
    );
    write_metadata(&sidecar, &headers)?;
    result.sidecar_path = sidecar;

    Ok(result)
}

/// Exports a tar stream into `dest`.
pub fn export_from_reader<R: Read>(
    reader: R,
    dest: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<ExportResult> {
    let mut archive = tar::Archive::new(reader);
    export_archive(&mut archive, dest, options)
}

/// Exports the tar file at `archive_path` into `dest`.
pub fn export_from_path(
    archive_path: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<ExportResult> {
    let archive_path = archive_path.as_ref();
    let file = File::open(archive_path)
        .map_err(|e| Error::filesystem("open archive", archive_path, e))?;
    export_from_reader(BufReader::new(file), dest, options)
}

fn materialize<R: Read>(
    body: &mut R,
    header: &Header,
    dest: &Path,
    options: &ExportOptions,
    result: &mut ExportResult,
) -> Result<()> {
    match header.entry_type() {
        EntryType::Directory => {
            let path = resolve_entry_path(header.name(), dest, options.path_safety)?;
            fs::create_dir_all(&path, options.dir_mode)?;
            result.directories += 1;
        }
        EntryType::File => {
            let path = resolve_entry_path(header.name(), dest, options.path_safety)?;
            fs::create_parent_dirs(&path, options.dir_mode)?;
            let mut file = fs::create_file(&path)?;
            result.bytes_written += fs::copy_to_file(body, &mut file, &path)?;
            drop(file);

            if options.preserve_mtime {
                if let Some(mod_time) = header.mod_time() {
                    fs::apply_mtime(&path, mod_time);
                }
            }
            result.files += 1;
        }
        EntryType::Symlink => {
            result.symlinks += 1;
            match options.symlinks {
                SymlinkPolicy::Record => {
                    log::debug!(
                        "Recording symlink '{}' -> '{}' in metadata only",
                        header.name(),
                        header.linkname()
                    );
                }
                SymlinkPolicy::Create => {
                    if options.path_safety != PathSafety::Disabled {
                        validate_symlink_target(header.name(), header.linkname())?;
                    }
                    let path = resolve_link_path(header.name(), dest, options.path_safety)?;
                    fs::create_parent_dirs(&path, options.dir_mode)?;
                    fs::create_symlink(header.linkname(), &path)?;
                }
            }
        }
        EntryType::HardLink
        | EntryType::CharDevice
        | EntryType::BlockDevice
        | EntryType::Fifo => {
            log::debug!(
                "Recording {} entry '{}' in metadata only",
                header.entry_type(),
                header.name()
            );
        }
    }
    Ok(())
}

fn write_metadata(path: &Path, headers: &[Header]) -> Result<()> {
    let file = fs::create_file(path)?;
    match write_sidecar(BufWriter::new(file), headers) {
        Err(Error::Io(e)) => Err(Error::filesystem("write metadata", path, e)),
        other => other,
    }
}
