//! Write options and results.

use crate::engine::{BZIP2_DEFAULT_LEVEL, GZIP_DEFAULT_LEVEL};
use crate::format::{ContainerFormat, Filter};
use crate::session::SessionMode;

/// Options for creating an archive.
///
/// # Example
///
/// ```rust
/// use tarkit::{ContainerFormat, Filter, WriteOptions};
///
/// let options = WriteOptions::gzipped().level(9);
/// assert_eq!(options.filter, Filter::Gzip);
/// assert_eq!(options.format, ContainerFormat::Gnu);
///
/// // Levels are clamped to what the codec accepts
/// let options = WriteOptions::bzipped().level(0);
/// assert_eq!(options.effective_level(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Compression filter for the output stream.
    ///
    /// [`Filter::Unsupported`] is rejected when the writer is created.
    pub filter: Filter,
    /// Header format for new entries.
    ///
    /// Only [`ContainerFormat::Gnu`] stores created times.
    /// [`ContainerFormat::Empty`] is treated as GNU.
    pub format: ContainerFormat,
    /// Compression level; `None` selects the codec's default
    /// (gzip 6, bzip2 9).
    pub level: Option<u32>,
}

impl WriteOptions {
    /// Creates options for a plain GNU tar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for a gzip-compressed GNU tar.
    pub fn gzipped() -> Self {
        Self::new().filter(Filter::Gzip)
    }

    /// Creates options for a bzip2-compressed GNU tar.
    pub fn bzipped() -> Self {
        Self::new().filter(Filter::Bzip2)
    }

    /// Sets the compression filter.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the header format.
    pub fn format(mut self, format: ContainerFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the compression level.
    ///
    /// The value is clamped to the filter's range when the writer is
    /// created: 0-9 for gzip, 1-9 for bzip2. Ignored for plain archives.
    pub fn level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    /// Returns the level the encoder will use.
    pub fn effective_level(&self) -> u32 {
        match self.filter {
            Filter::Gzip => self.level.unwrap_or(GZIP_DEFAULT_LEVEL).min(9),
            Filter::Bzip2 => self.level.unwrap_or(BZIP2_DEFAULT_LEVEL).clamp(1, 9),
            Filter::None | Filter::Unsupported => 0,
        }
    }
}

/// Summary returned by [`ArchiveWriter::finish`](crate::ArchiveWriter::finish).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteResult {
    /// Mode the writer was opened in.
    pub mode: SessionMode,
    /// Number of entries written by this session.
    pub entries_written: usize,
    /// Total content bytes written by this session, before compression.
    pub bytes_written: u64,
}
