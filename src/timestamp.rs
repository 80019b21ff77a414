//! Entry timestamps.
//!
//! This module provides the [`Timestamp`] type used for the created and
//! modified times of archive entries.
//!
//! # Precision
//!
//! A timestamp holds whole Unix seconds plus a sub-second nanosecond part.
//! Tar headers only store whole seconds:
//! - The modified time maps to the `mtime` header field
//! - The created time maps to the GNU `ctime` field (GNU headers only)
//!
//! The nanosecond part is therefore dropped when an entry is written, and
//! timestamps read back from an archive always have zero nanoseconds.
//! Times before the Unix epoch cannot be stored in a tar header and are
//! clamped to the epoch on write.
//!
//! # Example
//!
//! ```rust
//! use tarkit::Timestamp;
//! use std::time::SystemTime;
//!
//! let ts = Timestamp::from_unix_secs(1_700_000_000);
//! assert_eq!(ts.as_unix_secs(), 1_700_000_000);
//!
//! let epoch = Timestamp::from_system_time(SystemTime::UNIX_EPOCH);
//! assert_eq!(epoch.as_unix_secs(), 0);
//! ```

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// A point in time with nanosecond resolution, relative to the Unix epoch.
///
/// Negative second counts represent times before the epoch; the nanosecond
/// part always counts forward from the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    secs: i64,
    nanos: u32,
}

impl Timestamp {
    /// The Unix epoch (1970-01-01T00:00:00Z).
    pub const UNIX_EPOCH: Timestamp = Timestamp { secs: 0, nanos: 0 };

    /// Creates a timestamp from whole Unix seconds.
    #[inline]
    pub const fn from_unix_secs(secs: i64) -> Self {
        Self { secs, nanos: 0 }
    }

    /// Creates a timestamp from Unix seconds and a sub-second part.
    ///
    /// Returns `None` if `nanos` is not below one second.
    pub const fn from_unix_secs_nanos(secs: i64, nanos: u32) -> Option<Self> {
        if nanos >= NANOS_PER_SECOND {
            return None;
        }
        Some(Self { secs, nanos })
    }

    /// Creates a timestamp from a `SystemTime`.
    ///
    /// Times too far from the epoch to fit in an `i64` second count saturate.
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self {
                secs: i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
                nanos: after.subsec_nanos(),
            },
            Err(e) => {
                let before = e.duration();
                let secs = i64::try_from(before.as_secs()).unwrap_or(i64::MAX);
                if before.subsec_nanos() == 0 {
                    Self {
                        secs: -secs,
                        nanos: 0,
                    }
                } else {
                    Self {
                        secs: -secs - 1,
                        nanos: NANOS_PER_SECOND - before.subsec_nanos(),
                    }
                }
            }
        }
    }

    /// Returns the current time.
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    /// Returns the whole Unix seconds.
    #[inline]
    pub const fn as_unix_secs(&self) -> i64 {
        self.secs
    }

    /// Returns the sub-second part in nanoseconds.
    #[inline]
    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// Returns this timestamp truncated to whole seconds.
    ///
    /// This is the value a tar header can represent.
    #[inline]
    pub const fn truncated(&self) -> Self {
        Self {
            secs: self.secs,
            nanos: 0,
        }
    }

    /// Converts to a `SystemTime`.
    pub fn as_system_time(&self) -> SystemTime {
        if self.secs >= 0 {
            UNIX_EPOCH + Duration::new(self.secs as u64, self.nanos)
        } else {
            UNIX_EPOCH - Duration::from_secs(self.secs.unsigned_abs())
                + Duration::from_nanos(u64::from(self.nanos))
        }
    }

    /// Returns the value stored in a tar time field.
    ///
    /// Pre-epoch times clamp to zero and report `clamped = true`.
    pub(crate) fn to_header_secs(self) -> (u64, bool) {
        if self.secs < 0 {
            (0, true)
        } else {
            (self.secs as u64, false)
        }
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        Self::from_system_time(time)
    }
}

impl From<Timestamp> for SystemTime {
    fn from(ts: Timestamp) -> Self {
        ts.as_system_time()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nanos == 0 {
            write!(f, "{}", self.secs)
        } else {
            write!(f, "{}.{:09}", self.secs, self.nanos)
        }
    }
}
