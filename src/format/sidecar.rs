//! The newline-delimited JSON sidecar file.
//!
//! One [`Header`] per line, each line terminated by `\n`. The exporter writes
//! the lines sorted by name so that the file is deterministic and diffs well.
//!
//! ```text
//! {"Name":"a","Type":"D","Mode":755,"ModTime":"2014-01-01T00:00:00Z"}
//! {"Name":"a/b.txt","Type":"F","Mode":644,"ModTime":"2014-01-01T00:00:00Z"}
//! {"Name":"a/c","Type":"S","Mode":777,"ModTime":"2014-01-01T00:00:00Z","Linkname":"a/b.txt"}
//! ```
//!
//! Decoding is strict. A line that is not valid JSON fails with
//! [`Error::MetadataCodec`] and a `Type` letter outside the seven known codes
//! fails with [`Error::UnrecognizedEntryType`]. Missing numeric fields read as
//! zero and unknown keys are ignored.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::header::{EntryType, Header};
use crate::error::TypeFlag;
use crate::timestamp::ModTime;
use crate::{Error, Result};

/// Default file name of the sidecar, placed at the root of the exported tree.
pub const SIDECAR_FILE_NAME: &str = ".guitar";

/// Returns where the sidecar named `name` lives for the tree at `root`.
pub fn sidecar_path(root: impl AsRef<Path>, name: &str) -> PathBuf {
    root.as_ref().join(name)
}

/// The on-disk shape of a line, before the type letter is validated.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct SidecarRecord {
    name: String,
    #[serde(rename = "Type")]
    entry_type: String,
    mode: i64,
    mod_time: Option<ModTime>,
    uid: u64,
    gid: u64,
    linkname: String,
    devmajor: u32,
    devminor: u32,
}

impl TryFrom<SidecarRecord> for Header {
    type Error = Error;

    fn try_from(record: SidecarRecord) -> Result<Self> {
        let entry_type = EntryType::from_code(&record.entry_type).ok_or_else(|| {
            Error::UnrecognizedEntryType {
                entry: record.name.clone(),
                found: TypeFlag::Code(record.entry_type.clone()),
            }
        })?;

        Ok(Header::new(record.name, entry_type)
            .with_mode(record.mode)
            .with_mod_time(record.mod_time)
            .with_owner(record.uid, record.gid)
            .with_linkname(record.linkname)
            .with_device(record.devmajor, record.devminor))
    }
}

fn encode_at(header: &Header, line: usize) -> Result<String> {
    serde_json::to_string(header).map_err(|source| Error::MetadataCodec { line, source })
}

/// Encodes one header as a JSON line, without the trailing newline.
///
/// Errors report line 1.
pub fn encode_line(header: &Header) -> Result<String> {
    encode_at(header, 1)
}

/// Decodes one sidecar line. `line` is the 1-based line number used in
/// error messages.
pub fn decode_line(text: &str, line: usize) -> Result<Header> {
    decode_bytes(text.as_bytes(), line)
}

fn decode_bytes(bytes: &[u8], line: usize) -> Result<Header> {
    let record: SidecarRecord =
        serde_json::from_slice(bytes).map_err(|source| Error::MetadataCodec { line, source })?;
    Header::try_from(record)
}

/// Writes headers as sidecar lines, in slice order.
///
/// Stream failures are returned as [`Error::Io`].
pub fn write_sidecar<W: Write>(mut writer: W, headers: &[Header]) -> Result<()> {
    for (index, header) in headers.iter().enumerate() {
        let line = encode_at(header, index + 1)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads every header from a sidecar stream.
pub fn read_sidecar<R: BufRead>(reader: R) -> Result<Vec<Header>> {
    SidecarReader::new(reader).collect()
}

/// Iterator over the headers of a sidecar stream.
///
/// Every line, including a final line without a terminating newline, must
/// decode. The iterator stops after the first error.
pub struct SidecarReader<R> {
    reader: R,
    buf: Vec<u8>,
    line: usize,
    failed: bool,
}

impl<R: BufRead> SidecarReader<R> {
    /// Creates a reader over a buffered stream.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line: 0,
            failed: false,
        }
    }

    fn next_header(&mut self) -> Option<Result<Header>> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(e) => return Some(Err(Error::Io(e))),
        }
        self.line += 1;

        let text = self.buf.strip_suffix(b"\n").unwrap_or(&self.buf);
        Some(decode_bytes(text, self.line))
    }
}

impl<R: BufRead> Iterator for SidecarReader<R> {
    type Item = Result<Header>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.next_header();
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}
