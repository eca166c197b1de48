//! Deferred hard links for archive reconstruction.
//!
//! A hard-link entry in a tar stream refers to an entry that must already have
//! been written. The sidecar is sorted by name, so a link can precede its
//! target; the importer therefore holds every hard link back and appends them
//! after all other entries.
//!
//! # Example
//!
//! ```rust
//! use guitar::format::{EntryType, Header, HeaderFormat, codec};
//! use guitar::hardlink::DeferredLinks;
//!
//! # fn main() -> guitar::Result<()> {
//! let mut deferred = DeferredLinks::new();
//! let link = Header::new("a/link", EntryType::HardLink).with_linkname("z/target");
//! deferred.push(codec::import(&link, HeaderFormat::Gnu)?);
//!
//! let names: Vec<String> = deferred.into_iter().map(|n| n.path().to_string()).collect();
//! assert_eq!(names, ["a/link"]);
//! # Ok(())
//! # }
//! ```

use crate::format::NativeHeader;

/// Hard-link headers waiting to be written, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct DeferredLinks {
    links: Vec<NativeHeader>,
}

impl DeferredLinks {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds back a converted hard-link header.
    pub fn push(&mut self, header: NativeHeader) {
        self.links.push(header);
    }

    /// Number of deferred links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true if no links are deferred.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Iterates over the deferred links in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, NativeHeader> {
        self.links.iter()
    }
}

impl IntoIterator for DeferredLinks {
    type Item = NativeHeader;
    type IntoIter = std::vec::IntoIter<NativeHeader>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}

impl<'a> IntoIterator for &'a DeferredLinks {
    type Item = &'a NativeHeader;
    type IntoIter = std::slice::Iter<'a, NativeHeader>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{EntryType, Header, HeaderFormat, codec};

    fn link(name: &str, target: &str) -> NativeHeader {
        let header = Header::new(name, EntryType::HardLink)
            .with_mode(644)
            .with_linkname(target);
        codec::import(&header, HeaderFormat::Gnu).unwrap()
    }

    #[test]
    fn test_empty() {
        let deferred = DeferredLinks::new();
        assert!(deferred.is_empty());
        assert_eq!(deferred.len(), 0);
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut deferred = DeferredLinks::new();
        deferred.push(link("c", "x"));
        deferred.push(link("a", "y"));
        deferred.push(link("b", "z"));
        assert_eq!(deferred.len(), 3);

        let borrowed: Vec<&str> = deferred.iter().map(NativeHeader::path).collect();
        assert_eq!(borrowed, ["c", "a", "b"]);

        let targets: Vec<String> = deferred
            .into_iter()
            .filter_map(|n| n.link_name().map(str::to_owned))
            .collect();
        assert_eq!(targets, ["x", "y", "z"]);
    }
}
