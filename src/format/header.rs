//! The normalized header record stored in the sidecar file.

use serde::{Serialize, Serializer};

use crate::timestamp::ModTime;

/// The kind of an archive entry, stored as a single upper-case letter.
///
/// Tar identifies entry kinds with a numeric type flag (`'0'`, `'5'`, ...)
/// that says little to a human reading the metadata. The sidecar stores one
/// of seven letters instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    /// Regular file (`F`).
    ///
    /// Both the POSIX `'0'` flag and the legacy NUL flag collapse into this
    /// variant. The distinction is not recoverable.
    File,
    /// Directory (`D`).
    Directory,
    /// Symbolic link (`S`).
    Symlink,
    /// Hard link (`H`).
    HardLink,
    /// Character device node (`C`).
    CharDevice,
    /// Block device node (`B`).
    BlockDevice,
    /// FIFO node (`P`).
    Fifo,
}

impl EntryType {
    /// All entry types, in letter order of the sidecar documentation.
    pub const ALL: [EntryType; 7] = [
        EntryType::File,
        EntryType::Directory,
        EntryType::Symlink,
        EntryType::HardLink,
        EntryType::CharDevice,
        EntryType::BlockDevice,
        EntryType::Fifo,
    ];

    /// Returns the sidecar letter for this type.
    pub fn code(self) -> &'static str {
        match self {
            Self::File => "F",
            Self::Directory => "D",
            Self::Symlink => "S",
            Self::HardLink => "H",
            Self::CharDevice => "C",
            Self::BlockDevice => "B",
            Self::Fifo => "P",
        }
    }

    /// Parses a sidecar letter.
    ///
    /// Returns `None` for anything other than the seven known letters;
    /// lower-case letters are not accepted.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Returns true for device nodes, which carry major/minor numbers.
    pub fn is_device(self) -> bool {
        matches!(self, Self::CharDevice | Self::BlockDevice)
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for EntryType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// One archive entry's metadata in normalized form.
///
/// This is a subset of the tar header: the fields a plain directory tree or
/// a version-control system would lose. Content size is deliberately absent;
/// it is always taken from the live file on import.
///
/// Fields serialize in declaration order under their `PascalCase` names.
/// Zero and empty optional fields are omitted to keep the sidecar quiet.
///
/// A `Header` is immutable once built. The codec produces them from tar
/// headers and the sidecar reader produces them from JSON lines; the
/// `with_*` methods exist for constructing records by hand.
///
/// # Example
///
/// ```rust
/// use guitar::format::{EntryType, Header};
///
/// let header = Header::new("a/b.txt", EntryType::File).with_mode(644);
/// assert_eq!(
///     guitar::format::sidecar::encode_line(&header).unwrap(),
///     r#"{"Name":"a/b.txt","Type":"F","Mode":644}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Header {
    name: String,
    #[serde(rename = "Type")]
    entry_type: EntryType,
    mode: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    mod_time: Option<ModTime>,
    #[serde(skip_serializing_if = "is_zero")]
    uid: u64,
    #[serde(skip_serializing_if = "is_zero")]
    gid: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    linkname: String,
    #[serde(skip_serializing_if = "is_zero")]
    devmajor: u32,
    #[serde(skip_serializing_if = "is_zero")]
    devminor: u32,
}

fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

impl Header {
    /// Creates a header with the given name and type and all other fields
    /// zero.
    pub fn new(name: impl Into<String>, entry_type: EntryType) -> Self {
        Self {
            name: name.into(),
            entry_type,
            mode: 0,
            mod_time: None,
            uid: 0,
            gid: 0,
            linkname: String::new(),
            devmajor: 0,
            devminor: 0,
        }
    }

    /// Sets the mode, given in decimal-digits-of-octal form (`644`).
    pub fn with_mode(mut self, mode: i64) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the modification time.
    pub fn with_mod_time(mut self, mod_time: Option<ModTime>) -> Self {
        self.mod_time = mod_time;
        self
    }

    /// Sets the owner and group ids.
    pub fn with_owner(mut self, uid: u64, gid: u64) -> Self {
        self.uid = uid;
        self.gid = gid;
        self
    }

    /// Sets the link target.
    pub fn with_linkname(mut self, linkname: impl Into<String>) -> Self {
        self.linkname = linkname.into();
        self
    }

    /// Sets the device numbers.
    pub fn with_device(mut self, major: u32, minor: u32) -> Self {
        self.devmajor = major;
        self.devminor = minor;
        self
    }

    /// Entry path, relative, without a trailing slash.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry type.
    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    /// Mode in decimal-digits-of-octal form.
    pub fn mode(&self) -> i64 {
        self.mode
    }

    /// Modification time, if the archive carried one.
    pub fn mod_time(&self) -> Option<ModTime> {
        self.mod_time
    }

    /// Owner user id.
    pub fn uid(&self) -> u64 {
        self.uid
    }

    /// Owner group id.
    pub fn gid(&self) -> u64 {
        self.gid
    }

    /// Link target; empty for entries that are not links.
    pub fn linkname(&self) -> &str {
        &self.linkname
    }

    /// Device major number.
    pub fn devmajor(&self) -> u32 {
        self.devmajor
    }

    /// Device minor number.
    pub fn devminor(&self) -> u32 {
        self.devminor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_codes() {
        for ty in EntryType::ALL {
            assert_eq!(EntryType::from_code(ty.code()), Some(ty));
        }
    }

    #[test]
    fn test_entry_type_rejects_unknown() {
        assert_eq!(EntryType::from_code("Z"), None);
        assert_eq!(EntryType::from_code("f"), None);
        assert_eq!(EntryType::from_code(""), None);
        assert_eq!(EntryType::from_code("FF"), None);
    }

    #[test]
    fn test_entry_type_predicates() {
        assert!(EntryType::CharDevice.is_device());
        assert!(EntryType::BlockDevice.is_device());
        assert!(!EntryType::Fifo.is_device());
    }

    #[test]
    fn test_zero_fields_omitted() {
        let header = Header::new("dir", EntryType::Directory).with_mode(755);
        let json = serde_json::to_string(&header).unwrap();
        assert_eq!(json, r#"{"Name":"dir","Type":"D","Mode":755}"#);
    }

    #[test]
    fn test_all_fields_in_order() {
        let header = Header::new("dev/tty0", EntryType::CharDevice)
            .with_mode(620)
            .with_mod_time(ModTime::from_unix_secs(1_388_534_400))
            .with_owner(1000, 5)
            .with_linkname("unused")
            .with_device(4, 1);
        let json = serde_json::to_string(&header).unwrap();
        assert_eq!(
            json,
            r#"{"Name":"dev/tty0","Type":"C","Mode":620,"ModTime":"2014-01-01T00:00:00Z","Uid":1000,"Gid":5,"Linkname":"unused","Devmajor":4,"Devminor":1}"#
        );
    }

    #[test]
    fn test_zero_mode_is_kept() {
        let header = Header::new("locked", EntryType::File);
        let json = serde_json::to_string(&header).unwrap();
        assert!(json.contains(r#""Mode":0"#));
    }
}
