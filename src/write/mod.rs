//! Creating and appending to tar archives.
//!
//! An [`ArchiveWriter`] writes one fully materialized entry per call. The
//! archive is only valid once the writer is closed: closing writes the
//! end-of-archive marker, finishes the compression stream and flushes the
//! file.
//!
//! # Example
//!
//! ```rust,no_run
//! use tarkit::{ArchiveEntry, ArchiveWriter, Timestamp, WriteOptions};
//!
//! let mut writer = ArchiveWriter::create_path_with_options("site.tar.gz", WriteOptions::gzipped())?;
//! writer.write_bytes("index.html", b"<h1>hello</h1>")?;
//! writer.write_entry(
//!     &ArchiveEntry::new("style.css", b"h1 { color: red }".to_vec())
//!         .with_modified(Timestamp::from_unix_secs(1_700_000_000)),
//! )?;
//! let result = writer.finish()?;
//! assert_eq!(result.entries_written, 2);
//! # Ok::<(), tarkit::Error>(())
//! ```

mod options;
mod writer_init;

pub use options::{WriteOptions, WriteResult};

use std::path::PathBuf;

use log::{debug, warn};

use crate::engine::{EntryHeader, RawWriter};
use crate::format::{ContainerFormat, Filter};
use crate::session::SessionMode;
use crate::timestamp::Timestamp;
use crate::{ArchiveEntry, ArchivePath, Error, Result};

/// A write or append session over one tar archive.
///
/// The session owns its engine handle exclusively. The handle is released
/// by [`close`](Self::close), [`finish`](Self::finish) or when the writer
/// is dropped; errors while closing on drop are logged, not reported.
pub struct ArchiveWriter {
    handle: Option<RawWriter>,
    mode: SessionMode,
    filter: Filter,
    format: ContainerFormat,
    path: PathBuf,
    entries_written: usize,
    bytes_written: u64,
}

impl std::fmt::Debug for ArchiveWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveWriter")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("filter", &self.filter)
            .field("format", &self.format)
            .field("entries_written", &self.entries_written)
            .field("open", &self.handle.is_some())
            .finish()
    }
}

impl ArchiveWriter {
    /// Returns the mode the writer was opened in.
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Returns the compression filter of the output.
    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Returns the header format used for new entries.
    pub fn format(&self) -> ContainerFormat {
        self.format
    }

    /// Returns the number of entries written by this session.
    pub fn entries_written(&self) -> usize {
        self.entries_written
    }

    /// Returns true until the writer is closed.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Writes one entry: a header followed by the full content.
    ///
    /// Entries without a modified time are stamped with the current time.
    /// The created time is stored only by GNU headers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the path is invalid (empty, containing
    /// NUL, absolute or with `..` components) or the output could not be
    /// written. After an I/O failure the archive is incomplete; close the
    /// writer and discard the file.
    pub fn write_entry(&mut self, entry: &ArchiveEntry) -> Result<()> {
        let modified = entry.modified.unwrap_or_else(Timestamp::now);
        let header = EntryHeader {
            path: &entry.path,
            mtime: header_secs(&entry.path, "modified", modified),
            ctime: entry
                .created
                .map(|created| header_secs(&entry.path, "created", created)),
        };

        let handle = self.handle.as_mut().ok_or_else(|| Error::closed("write_entry"))?;
        handle.write_entry(header, &entry.data)?;

        self.entries_written += 1;
        self.bytes_written += entry.size();
        Ok(())
    }

    /// Writes `data` under `path`, stamped with the current time.
    pub fn write_bytes(&mut self, path: impl Into<ArchivePath>, data: &[u8]) -> Result<()> {
        self.write_entry(&ArchiveEntry::new(path, data))
    }

    /// Writes every entry in order, stopping at the first failure.
    pub fn write_entries<'a, I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a ArchiveEntry>,
    {
        for entry in entries {
            self.write_entry(entry)?;
        }
        Ok(())
    }

    /// Finalizes the archive and releases the handle.
    ///
    /// Closing an already closed writer does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the end marker, compression trailer or
    /// final flush could not be written.
    pub fn close(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        handle.close()?;
        debug!(
            "closed {} after {} {} entries",
            self.path.display(),
            self.entries_written,
            self.mode
        );
        Ok(())
    }
}

impl Drop for ArchiveWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("failed to finalize {}: {e}", self.path.display());
        }
    }
}

fn header_secs(path: &ArchivePath, field: &str, ts: Timestamp) -> u64 {
    let (secs, clamped) = ts.to_header_secs();
    if clamped {
        warn!("{field} time {ts} of {path} predates the Unix epoch; storing 0");
    }
    secs
}
