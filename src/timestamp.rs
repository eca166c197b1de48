//! Modification time handling.
//!
//! This module provides the [`ModTime`] type used for the `ModTime` field of
//! sidecar records. Tar headers store modification times as whole seconds
//! since the Unix epoch; the sidecar stores them as RFC 3339 text in UTC so
//! that the metadata stays readable and diffs cleanly under version control.
//!
//! # Precision
//!
//! - Tar `mtime` fields carry whole seconds only
//! - Sidecar text keeps sub-second digits when present (e.g. written by hand
//!   or by another tool); they are truncated when converted back to a header
//! - Offsets other than `Z` are accepted on input and normalized to UTC
//!
//! # Example
//!
//! ```rust
//! use guitar::ModTime;
//!
//! let ts = ModTime::from_unix_secs(1_388_534_400).unwrap();
//! assert_eq!(ts.to_string(), "2014-01-01T00:00:00Z");
//!
//! let parsed: ModTime = "2014-01-01T01:00:00+01:00".parse().unwrap();
//! assert_eq!(parsed, ts);
//! ```

use std::str::FromStr;
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A modification time, always held in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModTime(DateTime<Utc>);

impl ModTime {
    /// Creates a timestamp from Unix seconds (since January 1, 1970).
    ///
    /// Returns `None` if the value is outside the representable range.
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }

    /// Creates a timestamp from Unix seconds and nanoseconds.
    pub fn from_unix_secs_nanos(secs: i64, nanos: u32) -> Option<Self> {
        DateTime::from_timestamp(secs, nanos).map(Self)
    }

    /// Creates a timestamp from a `SystemTime`.
    pub fn from_system_time(time: SystemTime) -> Self {
        Self(DateTime::<Utc>::from(time))
    }

    /// Creates a timestamp from a tar header `mtime` value.
    ///
    /// Returns `None` if the value lies beyond the last representable date.
    pub fn from_tar_mtime(mtime: u64) -> Option<Self> {
        i64::try_from(mtime).ok().and_then(Self::from_unix_secs)
    }

    /// Returns the timestamp as Unix seconds, truncating sub-second digits.
    ///
    /// Returns negative values for timestamps before the Unix epoch.
    pub fn as_unix_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Returns the sub-second portion as nanoseconds.
    pub fn sub_second_nanos(&self) -> u32 {
        self.0.timestamp_subsec_nanos()
    }

    /// Returns the value for a tar header `mtime` field.
    ///
    /// Returns `None` for times before the Unix epoch, which tar cannot
    /// represent.
    pub fn as_tar_mtime(&self) -> Option<u64> {
        u64::try_from(self.as_unix_secs()).ok()
    }

    /// Converts to a `SystemTime`.
    pub fn as_system_time(&self) -> SystemTime {
        SystemTime::from(self.0)
    }

}

impl std::fmt::Display for ModTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl FromStr for ModTime {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTime::parse_from_rfc3339(s).map(|dt| Self(dt.with_timezone(&Utc)))
    }
}

impl From<DateTime<Utc>> for ModTime {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<ModTime> for SystemTime {
    fn from(ts: ModTime) -> SystemTime {
        ts.as_system_time()
    }
}

impl Serialize for ModTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_tar_mtime_range() {
        assert_eq!(ModTime::from_tar_mtime(0).map(|t| t.as_unix_secs()), Some(0));
        assert_eq!(ModTime::from_tar_mtime(u64::MAX), None);
        assert_eq!(ModTime::from_tar_mtime(i64::MAX as u64), None);
    }

    #[test]
    fn test_tar_mtime_roundtrip() {
        let ts = ModTime::from_tar_mtime(1_234_567_890).unwrap();
        assert_eq!(ts.as_unix_secs(), 1_234_567_890);
        assert_eq!(ts.as_tar_mtime(), Some(1_234_567_890));
    }

    #[test]
    fn test_rfc3339_text() {
        let ts = ModTime::from_unix_secs(1_388_534_400).unwrap();
        assert_eq!(ts.to_string(), "2014-01-01T00:00:00Z");
    }

    #[test]
    fn test_subsecond_text() {
        let ts = ModTime::from_unix_secs_nanos(1_388_534_400, 500_000_000).unwrap();
        assert_eq!(ts.to_string(), "2014-01-01T00:00:00.500Z");
        assert_eq!(ts.as_tar_mtime(), Some(1_388_534_400));
    }

    #[test]
    fn test_offset_normalized_to_utc() {
        let ts: ModTime = "2014-01-01T05:30:00+05:30".parse().unwrap();
        assert_eq!(ts.to_string(), "2014-01-01T00:00:00Z");
    }

    #[test]
    fn test_before_unix_epoch() {
        let ts = ModTime::from_unix_secs(-86400).unwrap();
        assert_eq!(ts.as_unix_secs(), -86400);
        assert_eq!(ts.as_tar_mtime(), None);
    }

    #[test]
    fn test_roundtrip_system_time() {
        let original = UNIX_EPOCH + Duration::new(1_234_567_890, 123_456_789);
        let ts = ModTime::from_system_time(original);
        assert_eq!(ts.as_system_time(), original);
        assert_eq!(ts.sub_second_nanos(), 123_456_789);
    }

    #[test]
    fn test_serde_json() {
        let ts = ModTime::from_unix_secs(1_388_534_400).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2014-01-01T00:00:00Z\"");
        let back: ModTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_serde_rejects_garbage() {
        assert!(serde_json::from_str::<ModTime>("\"yesterday\"").is_err());
    }
}
