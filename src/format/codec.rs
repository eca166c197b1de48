//! Conversion between tar headers and normalized [`Header`] records.
//!
//! Both directions consult the same flag table and report failures through
//! the same error variants, so a type that cannot be exported can never be
//! imported either.
//!
//! # Example
//!
//! ```rust
//! use guitar::format::codec::{self, HeaderFormat, NativeHeader};
//! use guitar::format::{EntryType, Header};
//!
//! # fn main() -> guitar::Result<()> {
//! let header = Header::new("a/b.txt", EntryType::File).with_mode(644);
//! let native = codec::import(&header, HeaderFormat::Gnu)?;
//! assert_eq!(native.header().mode()?, 0o644);
//!
//! let back = codec::export(&native)?;
//! assert_eq!(back, header);
//! # Ok(())
//! # }
//! ```

use std::io::Read;
use std::path::Path;

use super::header::{EntryType, Header};
use super::mode::{decode_mode, encode_mode};
use super::type_flag;
use crate::error::TypeFlag;
use crate::timestamp::ModTime;
use crate::{Error, Result};

/// The single mapping between entry types and tar type flags.
///
/// Export searches by flag, import by type and takes the first match, so the
/// legacy regular-file flag is accepted but never produced.
const TYPE_FLAGS: [(EntryType, u8); 8] = [
    (EntryType::File, type_flag::REGULAR),
    (EntryType::File, type_flag::REGULAR_LEGACY),
    (EntryType::HardLink, type_flag::LINK),
    (EntryType::Symlink, type_flag::SYMLINK),
    (EntryType::CharDevice, type_flag::CHAR),
    (EntryType::BlockDevice, type_flag::BLOCK),
    (EntryType::Directory, type_flag::DIRECTORY),
    (EntryType::Fifo, type_flag::FIFO),
];

/// Looks up the entry type for a tar type flag.
pub fn type_for_flag(flag: u8) -> Option<EntryType> {
    TYPE_FLAGS
        .iter()
        .find(|(_, f)| *f == flag)
        .map(|(entry_type, _)| *entry_type)
}

/// Looks up the tar type flag written for an entry type.
pub fn flag_for_type(entry_type: EntryType) -> Option<u8> {
    TYPE_FLAGS
        .iter()
        .find(|(t, _)| *t == entry_type)
        .map(|(_, flag)| *flag)
}

/// Which tar header layout the import direction produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderFormat {
    /// GNU headers; long names use the GNU `L`/`K` extensions.
    #[default]
    Gnu,
    /// POSIX ustar headers.
    Ustar,
}

impl HeaderFormat {
    fn new_header(self) -> tar::Header {
        match self {
            Self::Gnu => tar::Header::new_gnu(),
            Self::Ustar => tar::Header::new_ustar(),
        }
    }
}

/// A tar header together with the entry's full path and link target.
///
/// The fixed-size name fields of a tar header hold at most 100 bytes; longer
/// names travel in extension records that the `tar` crate resolves on read
/// and emits on write. The full strings are therefore carried next to the
/// raw header rather than inside it.
#[derive(Debug, Clone)]
pub struct NativeHeader {
    header: tar::Header,
    path: String,
    link_name: Option<String>,
}

impl NativeHeader {
    /// Creates a native header from its parts.
    pub fn new(header: tar::Header, path: impl Into<String>, link_name: Option<String>) -> Self {
        Self {
            header,
            path: path.into(),
            link_name,
        }
    }

    /// Creates a native header, reading path and link target from the header
    /// fields themselves.
    pub fn from_header(header: tar::Header) -> Result<Self> {
        let path = header
            .path()
            .map_err(|e| Error::archive("read entry path", e))
            .and_then(|p| path_to_string(&p))?;
        let link_name = match header
            .link_name()
            .map_err(|e| Error::archive(format!("read link target of '{}'", path), e))?
        {
            Some(link) => Some(path_to_string(&link)?),
            None => None,
        };
        Ok(Self::new(header, path, link_name))
    }

    /// Creates a native header from an entry being read, including any long
    /// name extensions that preceded it.
    pub fn from_entry<R: Read>(entry: &tar::Entry<'_, R>) -> Result<Self> {
        let path = entry
            .path()
            .map_err(|e| Error::archive("read entry path", e))
            .and_then(|p| path_to_string(&p))?;
        let link_name = match entry
            .link_name()
            .map_err(|e| Error::archive(format!("read link target of '{}'", path), e))?
        {
            Some(link) => Some(path_to_string(&link)?),
            None => None,
        };
        Ok(Self::new(entry.header().clone(), path, link_name))
    }

    /// The raw tar header.
    pub fn header(&self) -> &tar::Header {
        &self.header
    }

    /// Mutable access to the raw tar header, e.g. to set the content size.
    pub fn header_mut(&mut self) -> &mut tar::Header {
        &mut self.header
    }

    /// Full entry path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Full link target, if any.
    pub fn link_name(&self) -> Option<&str> {
        self.link_name.as_deref()
    }

    /// The raw type flag byte, before any normalization by the `tar` crate.
    pub fn type_flag(&self) -> u8 {
        self.header.as_old().linkflag[0]
    }

    /// Splits into header, path and link target.
    pub fn into_parts(self) -> (tar::Header, String, Option<String>) {
        (self.header, self.path, self.link_name)
    }
}

fn path_to_string(path: &Path) -> Result<String> {
    path.to_str()
        .map(str::to_owned)
        .ok_or_else(|| Error::NonUtf8Path {
            path: path.to_path_buf(),
        })
}

/// Strips the trailing slash tar uses to mark directories.
fn normalize_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { path } else { trimmed }
}

/// Converts a tar header into a normalized [`Header`].
///
/// # Errors
///
/// - [`Error::UnrecognizedEntryType`] for type flags outside the seven known
///   entry types (GNU sparse files, PAX global headers, contiguous files, ...)
/// - [`Error::ModeConversion`] when the mode exceeds the ustar range
/// - [`Error::InvalidTimestamp`] when the mtime lies beyond the last date a
///   [`ModTime`] can hold
/// - [`Error::Archive`] when a numeric header field cannot be parsed
pub fn export(native: &NativeHeader) -> Result<Header> {
    let name = normalize_name(native.path()).to_string();
    let hdr = native.header();

    let flag = native.type_flag();
    let entry_type = type_for_flag(flag).ok_or_else(|| Error::UnrecognizedEntryType {
        entry: name.clone(),
        found: TypeFlag::Native(flag),
    })?;

    let field_error = |field: &str, e| Error::archive(format!("read {} of '{}'", field, name), e);

    let raw_mode = hdr.mode().map_err(|e| field_error("mode", e))?;
    let mode = encode_mode(raw_mode).map_err(|fault| Error::ModeConversion {
        entry: name.clone(),
        value: i64::from(raw_mode),
        fault,
    })?;
    let mtime = hdr.mtime().map_err(|e| field_error("mtime", e))?;
    let uid = hdr.uid().map_err(|e| field_error("uid", e))?;
    let gid = hdr.gid().map_err(|e| field_error("gid", e))?;

    // Only device nodes are required to carry parseable device numbers;
    // many writers leave the fields blank for everything else.
    let (devmajor, devminor) = if entry_type.is_device() {
        (
            hdr.device_major()
                .map_err(|e| field_error("device major", e))?
                .unwrap_or(0),
            hdr.device_minor()
                .map_err(|e| field_error("device minor", e))?
                .unwrap_or(0),
        )
    } else {
        (
            hdr.device_major().ok().flatten().unwrap_or(0),
            hdr.device_minor().ok().flatten().unwrap_or(0),
        )
    };

    // Zero means the archive carried no time; only whole seconds are kept.
    let mod_time = match mtime {
        0 => None,
        secs => Some(
            ModTime::from_tar_mtime(secs).ok_or_else(|| Error::InvalidTimestamp {
                entry: name.clone(),
                secs: i64::try_from(secs).unwrap_or(i64::MAX),
            })?,
        ),
    };

    Ok(Header::new(name, entry_type)
        .with_mode(mode)
        .with_mod_time(mod_time)
        .with_owner(uid, gid)
        .with_linkname(native.link_name().unwrap_or_default())
        .with_device(devmajor, devminor))
}

/// Converts a normalized [`Header`] back into a tar header.
///
/// The content size is left at zero; the importer sets it from the live file
/// for regular files.
///
/// # Errors
///
/// - [`Error::ModeConversion`] when the stored mode digits are not octal or
///   out of range
/// - [`Error::InvalidTimestamp`] for modification times before the epoch
/// - [`Error::Archive`] when the header layout cannot hold a field
pub fn import(header: &Header, format: HeaderFormat) -> Result<NativeHeader> {
    let name = header.name();

    let flag = flag_for_type(header.entry_type()).ok_or_else(|| Error::UnrecognizedEntryType {
        entry: name.to_string(),
        found: TypeFlag::Code(header.entry_type().code().to_string()),
    })?;

    let mode = decode_mode(header.mode()).map_err(|fault| Error::ModeConversion {
        entry: name.to_string(),
        value: header.mode(),
        fault,
    })?;

    let mtime = match header.mod_time() {
        Some(ts) => ts.as_tar_mtime().ok_or_else(|| Error::InvalidTimestamp {
            entry: name.to_string(),
            secs: ts.as_unix_secs(),
        })?,
        None => 0,
    };

    let mut native = format.new_header();
    native.set_entry_type(tar::EntryType::new(flag));
    native.set_mode(mode);
    native.set_mtime(mtime);
    native.set_uid(header.uid());
    native.set_gid(header.gid());
    native.set_size(0);

    let field_error = |field: &str, e| Error::archive(format!("set {} of '{}'", field, name), e);
    native
        .set_device_major(header.devmajor())
        .map_err(|e| field_error("device major", e))?;
    native
        .set_device_minor(header.devminor())
        .map_err(|e| field_error("device minor", e))?;

    let link_name = (!header.linkname().is_empty()).then(|| header.linkname().to_string());
    // Directories get back the trailing slash tar writers put on them.
    let path = match header.entry_type() {
        EntryType::Directory if !name.ends_with('/') => format!("{}/", name),
        _ => name.to_string(),
    };
    Ok(NativeHeader::new(native, path, link_name))
}
