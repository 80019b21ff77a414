//! Archive members: listing metadata and in-memory entries.

use std::fmt;
use std::ops::Range;

use crate::ArchivePath;
use crate::engine::RawHeader;
use crate::format::Filter;
use crate::timestamp::Timestamp;

/// Metadata of one archive member, as produced by listing.
///
/// An item holds no reference to the session that produced it.
///
/// This struct is marked `#[non_exhaustive]` to allow adding new fields
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ArchiveItem {
    /// The path within the archive, verbatim.
    pub path: ArchivePath,
    /// Byte offset of the content within the decompressed tar stream.
    ///
    /// For uncompressed archives this is also the offset within the file.
    pub offset: u64,
    /// Content size in bytes.
    pub size: u64,
    /// Creation time, when the header stores one (GNU format only).
    pub created: Option<Timestamp>,
    /// Modification time.
    pub modified: Option<Timestamp>,
    /// Whether the archive the item was listed from is compressed.
    ///
    /// When true, [`offset`](Self::offset) does not address the file.
    pub compressed: bool,
}

impl ArchiveItem {
    pub(crate) fn from_header(header: RawHeader, filter: Filter) -> Self {
        Self {
            path: ArchivePath::from(header.path),
            offset: header.offset,
            size: header.size,
            created: header.ctime.map(secs_to_timestamp),
            modified: header.mtime.map(secs_to_timestamp),
            compressed: filter.is_compressed(),
        }
    }

    /// Returns the byte range of the content within the decompressed stream.
    ///
    /// The end saturates at `u64::MAX`.
    pub fn range(&self) -> Range<u64> {
        self.offset..self.offset.saturating_add(self.size)
    }

    /// Returns the file name (last component of the path).
    pub fn name(&self) -> &str {
        self.path.file_name()
    }
}

impl fmt::Display for ArchiveItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes", self.path, self.size)?;
        if self.compressed {
            f.write_str(", compressed")?;
        }
        if let Some(modified) = self.modified {
            write!(f, ", modified {modified}")?;
        }
        f.write_str(")")
    }
}

/// An archive member with its full content in memory.
///
/// Returned by iteration and accepted by the writer.
///
/// # Example
///
/// ```rust
/// use tarkit::{ArchiveEntry, Timestamp};
///
/// let entry = ArchiveEntry::new("notes/todo.txt", b"buy milk".to_vec())
///     .with_modified(Timestamp::from_unix_secs(1_700_000_000));
/// assert_eq!(entry.size(), 8);
/// assert!(entry.created.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ArchiveEntry {
    /// The path within the archive.
    pub path: ArchivePath,
    /// The full content.
    pub data: Vec<u8>,
    /// Creation time.
    pub created: Option<Timestamp>,
    /// Modification time. Entries written without one are stamped with the
    /// current time.
    pub modified: Option<Timestamp>,
}

impl ArchiveEntry {
    /// Creates an entry without timestamps.
    pub fn new(path: impl Into<ArchivePath>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
            created: None,
            modified: None,
        }
    }

    /// Sets the creation time.
    pub fn with_created(mut self, created: Timestamp) -> Self {
        self.created = Some(created);
        self
    }

    /// Sets the modification time.
    pub fn with_modified(mut self, modified: Timestamp) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Returns the content size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub(crate) fn from_raw(header: RawHeader, data: Vec<u8>) -> Self {
        Self {
            path: ArchivePath::from(header.path),
            data,
            created: header.ctime.map(secs_to_timestamp),
            modified: header.mtime.map(secs_to_timestamp),
        }
    }
}

fn secs_to_timestamp(secs: u64) -> Timestamp {
    Timestamp::from_unix_secs(i64::try_from(secs).unwrap_or(i64::MAX))
}
