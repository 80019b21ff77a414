//! Writer construction and finalization.

use std::path::Path;

use log::debug;

use super::{ArchiveWriter, WriteOptions, WriteResult};
use crate::Result;
use crate::engine::RawWriter;
use crate::session::SessionMode;

impl ArchiveWriter {
    /// Creates a plain GNU tar at `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`](crate::Error::Open) if the file could not be
    /// created.
    pub fn create_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::create_path_with_options(path, WriteOptions::default())
    }

    /// Creates an archive at `path` with the given filter, format and level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`](crate::Error::Open) if the file could not be
    /// created or the filter is unsupported or not compiled in. In the
    /// latter case the file is left untouched.
    pub fn create_path_with_options(path: impl AsRef<Path>, options: WriteOptions) -> Result<Self> {
        let path = path.as_ref();
        let handle = RawWriter::create(
            path,
            options.filter,
            options.format,
            options.effective_level(),
        )?;
        debug!(
            "created {} ({}, {}, level {})",
            path.display(),
            options.filter,
            handle.format(),
            options.effective_level()
        );
        Ok(Self::from_handle(handle, SessionMode::Write, path))
    }

    /// Opens an existing uncompressed archive to add entries at its end.
    ///
    /// Existing entries are kept; new headers use the format of the
    /// archive's first header. An empty file is treated as an empty archive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`](crate::Error::Open) if the file is missing,
    /// compressed, or its headers cannot be parsed.
    pub fn append_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let handle = RawWriter::append(path)?;
        Ok(Self::from_handle(handle, SessionMode::Append, path))
    }

    fn from_handle(handle: RawWriter, mode: SessionMode, path: &Path) -> Self {
        Self {
            mode,
            filter: handle.filter(),
            format: handle.format(),
            handle: Some(handle),
            path: path.to_path_buf(),
            entries_written: 0,
            bytes_written: 0,
        }
    }

    /// Closes the writer and reports what this session wrote.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`](crate::Error::Write) if finalization failed.
    pub fn finish(mut self) -> Result<WriteResult> {
        self.close()?;
        Ok(WriteResult {
            mode: self.mode,
            entries_written: self.entries_written,
            bytes_written: self.bytes_written,
        })
    }
}
