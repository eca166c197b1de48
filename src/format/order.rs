//! Ordering of header lists.
//!
//! The sidecar must be byte-identical no matter in which order the archive
//! listed its entries, so headers are sorted before they are written.

use std::cmp::Ordering;

use super::header::Header;

/// Compares two headers for sidecar ordering.
pub trait HeaderComparator {
    /// Returns the relative order of `a` and `b`.
    fn compare(&self, a: &Header, b: &Header) -> Ordering;
}

/// The fields a header list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Byte-wise comparison of the entry name.
    #[default]
    Name,
}

impl HeaderComparator for SortKey {
    fn compare(&self, a: &Header, b: &Header) -> Ordering {
        match self {
            Self::Name => a.name().as_bytes().cmp(b.name().as_bytes()),
        }
    }
}

/// Sorts headers in place with the given comparator.
///
/// The sort is stable: headers that compare equal keep their input order.
pub fn sort_headers<C: HeaderComparator + ?Sized>(headers: &mut [Header], comparator: &C) {
    headers.sort_by(|a, b| comparator.compare(a, b));
}

/// Sorts headers in place by name.
pub fn sort_by_name(headers: &mut [Header]) {
    sort_headers(headers, &SortKey::Name);
}
