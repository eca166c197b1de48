//! Shared test utilities for integration tests.
//!
//! Archive creation and inspection helpers are consolidated here to avoid
//! duplication.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::io::{self, Cursor, Read};
use std::path::Path;

use guitar::Header;
use guitar::format::codec;

/// Modification time used for every generated entry (2014-01-01T00:00:00Z).
pub const MTIME: u64 = 1_388_534_400;

/// Creates a GNU header with every numeric field initialized.
pub fn tar_header(kind: tar::EntryType, mode: u32, size: u64) -> tar::Header {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(kind);
    header.set_mode(mode);
    header.set_mtime(MTIME);
    header.set_uid(0);
    header.set_gid(0);
    header.set_size(size);
    header.set_device_major(0).unwrap();
    header.set_device_minor(0).unwrap();
    header
}

/// Builds tar archives in memory, one entry per call.
pub struct ArchiveBuilder {
    builder: tar::Builder<Vec<u8>>,
    owner: (u64, u64),
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
            owner: (0, 0),
        }
    }

    /// Sets uid and gid for the following entries.
    pub fn owner(mut self, uid: u64, gid: u64) -> Self {
        self.owner = (uid, gid);
        self
    }

    fn header(&self, kind: tar::EntryType, mode: u32, size: u64) -> tar::Header {
        let mut header = tar_header(kind, mode, size);
        header.set_uid(self.owner.0);
        header.set_gid(self.owner.1);
        header
    }

    pub fn dir(mut self, path: &str, mode: u32) -> Self {
        let mut header = self.header(tar::EntryType::Directory, mode, 0);
        self.builder
            .append_data(&mut header, path, io::empty())
            .unwrap();
        self
    }

    pub fn file(mut self, path: &str, mode: u32, data: &[u8]) -> Self {
        let mut header = self.header(tar::EntryType::Regular, mode, data.len() as u64);
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    pub fn symlink(mut self, path: &str, target: &str) -> Self {
        let mut header = self.header(tar::EntryType::Symlink, 0o777, 0);
        self.builder
            .append_link(&mut header, path, target)
            .unwrap();
        self
    }

    pub fn hard_link(mut self, path: &str, target: &str) -> Self {
        let mut header = self.header(tar::EntryType::Link, 0o644, 0);
        self.builder
            .append_link(&mut header, path, target)
            .unwrap();
        self
    }

    pub fn device(mut self, path: &str, kind: tar::EntryType, major: u32, minor: u32) -> Self {
        let mut header = self.header(kind, 0o660, 0);
        header.set_device_major(major).unwrap();
        header.set_device_minor(minor).unwrap();
        self.builder
            .append_data(&mut header, path, io::empty())
            .unwrap();
        self
    }

    pub fn fifo(mut self, path: &str) -> Self {
        let mut header = self.header(tar::EntryType::Fifo, 0o600, 0);
        self.builder
            .append_data(&mut header, path, io::empty())
            .unwrap();
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }
}

/// The parts of an archive entry the tests look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub path: String,
    pub kind: tar::EntryType,
    pub mode: u32,
    pub size: u64,
    pub link_name: Option<String>,
    pub body: Vec<u8>,
}

/// Reads every entry of an archive, in stream order.
pub fn read_entries(data: &[u8]) -> Vec<EntrySummary> {
    let mut archive = tar::Archive::new(Cursor::new(data));
    archive
        .entries()
        .unwrap()
        .map(|entry| {
            let mut entry = entry.unwrap();
            let mut body = Vec::new();
            entry.read_to_end(&mut body).unwrap();
            EntrySummary {
                path: entry.path().unwrap().to_string_lossy().into_owned(),
                kind: entry.header().entry_type(),
                mode: entry.header().mode().unwrap(),
                size: entry.header().size().unwrap(),
                link_name: entry
                    .link_name()
                    .unwrap()
                    .map(|l| l.to_string_lossy().into_owned()),
                body,
            }
        })
        .collect()
}

/// Converts every entry of an archive to a normalized header, in stream
/// order.
pub fn archive_headers(data: &[u8]) -> Vec<Header> {
    let mut archive = tar::Archive::new(Cursor::new(data));
    let mut headers = Vec::new();
    guitar::for_each_entry(&mut archive, |_, native| {
        headers.push(codec::export(&native)?);
        Ok(())
    })
    .unwrap();
    headers
}

/// Reads the default sidecar of an exported tree.
pub fn sidecar_headers(root: &Path) -> Vec<Header> {
    let file = std::fs::File::open(root.join(guitar::SIDECAR_FILE_NAME)).unwrap();
    guitar::format::sidecar::read_sidecar(io::BufReader::new(file)).unwrap()
}

/// Reads the default sidecar of an exported tree as raw text.
pub fn sidecar_text(root: &Path) -> String {
    std::fs::read_to_string(root.join(guitar::SIDECAR_FILE_NAME)).unwrap()
}

/// Exports `data` into `dest` with default options.
pub fn export(data: &[u8], dest: &Path) -> guitar::ExportResult {
    guitar::export_from_reader(Cursor::new(data), dest, &guitar::ExportOptions::default())
        .unwrap()
}

/// Imports the tree at `root` into memory with default options.
pub fn import(root: &Path) -> Vec<u8> {
    let mut out = Vec::new();
    guitar::import_to_writer(&mut out, root, &guitar::ImportOptions::default()).unwrap();
    out
}

/// Writes sidecar text verbatim into a fresh tree.
pub fn tree_with_sidecar(text: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(guitar::SIDECAR_FILE_NAME), text).unwrap();
    dir
}
