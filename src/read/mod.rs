//! Reading tar archives.
//!
//! An [`ArchiveReader`] is a forward-only session over one archive. All of
//! its read operations share a single cursor:
//!
//! - [`read_next`](ArchiveReader::read_next) returns the entry under the
//!   cursor and advances past it
//! - [`read_data`](ArchiveReader::read_data) scans forward from the cursor
//!   until it finds the requested path
//! - [`items`](ArchiveReader::items) lists everything after the cursor
//!
//! A lookup for an entry the cursor has already passed reports
//! [`Error::NotFound`](crate::Error::NotFound). Use
//! [`Tarball`](crate::Tarball) for repeatable lookups.
//!
//! # Example
//!
//! ```rust,no_run
//! use tarkit::ArchiveReader;
//!
//! let mut reader = ArchiveReader::open_path("backup.tar.gz")?;
//! while let Some(entry) = reader.read_next()? {
//!     println!("{}: {} bytes", entry.path, entry.size());
//! }
//! reader.close()?;
//! # Ok::<(), tarkit::Error>(())
//! ```

mod archive_open;
mod archive_query;
mod options;

pub use options::ReadOptions;

use std::iter::FusedIterator;
use std::path::PathBuf;

use log::debug;

use crate::engine::RawReader;
use crate::format::{ContainerFormat, Filter};
use crate::session::SessionMode;
use crate::{ArchiveEntry, Error, Result};

/// A read session over one tar archive.
///
/// The session owns its engine handle exclusively; the handle is released
/// by [`close`](Self::close) or when the reader is dropped. Operations on a
/// closed reader fail with [`Error::Internal`].
pub struct ArchiveReader {
    handle: Option<RawReader>,
    filter: Filter,
    format: ContainerFormat,
    options: ReadOptions,
    source: Option<PathBuf>,
}

impl std::fmt::Debug for ArchiveReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveReader")
            .field("source", &self.source)
            .field("filter", &self.filter)
            .field("format", &self.format)
            .field("open", &self.handle.is_some())
            .finish()
    }
}

impl ArchiveReader {
    fn from_handle(handle: RawReader, options: ReadOptions, source: Option<PathBuf>) -> Self {
        debug!(
            "opened {} for reading ({}, {})",
            source
                .as_deref()
                .map_or_else(|| "stream".into(), |p| p.display().to_string()),
            handle.filter(),
            handle.format()
        );
        Self {
            filter: handle.filter(),
            format: handle.format(),
            handle: Some(handle),
            options,
            source,
        }
    }

    /// Returns the compression filter detected at open.
    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Returns the container format of the first header.
    pub fn format(&self) -> ContainerFormat {
        self.format
    }

    /// Returns [`SessionMode::Read`].
    pub fn mode(&self) -> SessionMode {
        SessionMode::Read
    }

    /// Returns the options the reader was opened with.
    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Returns true until the reader is closed.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Releases the engine handle.
    ///
    /// Closing an already closed reader does nothing.
    pub fn close(&mut self) -> Result<()> {
        if self.handle.take().is_some() {
            debug!("closed reader ({})", self.filter);
        }
        Ok(())
    }

    pub(crate) fn handle(&mut self, operation: &str) -> Result<&mut RawReader> {
        self.handle.as_mut().ok_or_else(|| Error::closed(operation))
    }
}

impl Drop for ArchiveReader {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Iterator over the remaining entries of an [`ArchiveReader`].
///
/// Created by [`ArchiveReader::entries`]. Each step is one
/// [`read_next`](ArchiveReader::read_next) call, so the iterator and the
/// reader share the cursor. Iteration stops after the first error.
#[derive(Debug)]
pub struct Entries<'a> {
    reader: &'a mut ArchiveReader,
    done: bool,
}

impl<'a> Entries<'a> {
    pub(crate) fn new(reader: &'a mut ArchiveReader) -> Self {
        Self {
            reader,
            done: false,
        }
    }
}

impl Iterator for Entries<'_> {
    type Item = Result<ArchiveEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.reader.read_next().transpose();
        if !matches!(next, Some(Ok(_))) {
            self.done = true;
        }
        next
    }
}

impl FusedIterator for Entries<'_> {}
