//! Filesystem primitives used by export and import.
//!
//! Thin wrappers over `std::fs` that attach the affected path and the name of
//! the failed operation to every error, so that a failure deep inside an
//! export can be reported as "Failed to create file 'out/a/b.txt': ...".

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::timestamp::ModTime;
use crate::{Error, Result};

/// Permission bits for directories created during export.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Creates a directory and all missing ancestors.
///
/// Newly created directories get `mode` (before the umask) on Unix. Existing
/// directories are left untouched, so the call is idempotent.
pub fn create_dir_all(path: &Path, mode: u32) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder
        .create(path)
        .map_err(|e| Error::filesystem("create directory", path, e))
}

/// Creates the missing ancestors of `path`.
pub fn create_parent_dirs(path: &Path, mode: u32) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir_all(parent, mode),
        _ => Ok(()),
    }
}

/// Creates (or truncates) a file for writing.
pub fn create_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| Error::filesystem("create file", path, e))
}

/// Opens a file for reading and returns it with its current size.
pub fn open_file(path: &Path) -> Result<(File, u64)> {
    let file = File::open(path).map_err(|e| Error::filesystem("open file", path, e))?;
    let size = file
        .metadata()
        .map_err(|e| Error::filesystem("stat file", path, e))?
        .len();
    Ok((file, size))
}

/// Copies all bytes from `reader` into `writer`, naming `path` on failure.
pub fn copy_to_file<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    path: &Path,
) -> Result<u64> {
    io::copy(reader, writer).map_err(|e| Error::filesystem("write file", path, e))
}

/// Returns the absolute path of a directory with all symbolic links
/// resolved.
pub fn resolve_dir(path: &Path) -> Result<PathBuf> {
    let resolved = path
        .canonicalize()
        .map_err(|e| Error::filesystem("resolve directory", path, e))?;
    if !resolved.is_dir() {
        return Err(Error::filesystem(
            "resolve directory",
            path,
            io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        ));
    }
    Ok(resolved)
}

/// Creates a symbolic link at `link` pointing to `target`.
///
/// A symbolic link already present at `link` is replaced.
#[cfg(unix)]
pub fn create_symlink(target: &str, link: &Path) -> Result<()> {
    if fs::symlink_metadata(link).is_ok_and(|m| m.file_type().is_symlink()) {
        fs::remove_file(link).map_err(|e| Error::filesystem("replace symlink", link, e))?;
    }
    std::os::unix::fs::symlink(target, link)
        .map_err(|e| Error::filesystem("create symlink", link, e))
}

/// Creates a symbolic link at `link` pointing to `target`.
///
/// Not supported on this platform.
#[cfg(not(unix))]
pub fn create_symlink(_target: &str, _link: &Path) -> Result<()> {
    Err(Error::UnsupportedFeature {
        feature: "symlink creation",
    })
}

/// Sets the modification time of a file.
///
/// Failures are logged and otherwise ignored; the content is already on disk
/// and the time is still recorded in the sidecar.
pub fn apply_mtime(path: &Path, mod_time: ModTime) {
    let mtime = FileTime::from_system_time(mod_time.as_system_time());
    if let Err(e) = filetime::set_file_mtime(path, mtime) {
        log::warn!(
            "Failed to set modification time on '{}': {}",
            path.display(),
            e
        );
    }
}
