//! Archive opening methods.

use std::io::Read;
use std::path::Path;

use crate::Result;
use crate::engine::RawReader;

use super::{ArchiveReader, ReadOptions};

impl ArchiveReader {
    /// Opens the archive at `path` for reading.
    ///
    /// The compression filter and container format are detected from the
    /// file content; the extension is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`](crate::Error::Open) if the file is missing or
    /// unreadable, empty, compressed with a filter this build cannot decode,
    /// or does not start with a valid tar header.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use tarkit::{ArchiveReader, Filter};
    ///
    /// let reader = ArchiveReader::open_path("logs.tar.bz2")?;
    /// assert_eq!(reader.filter(), Filter::Bzip2);
    /// # Ok::<(), tarkit::Error>(())
    /// ```
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_path_with_options(path, ReadOptions::default())
    }

    /// Opens the archive at `path` with custom options.
    pub fn open_path_with_options(path: impl AsRef<Path>, options: ReadOptions) -> Result<Self> {
        let path = path.as_ref();
        let handle = RawReader::open(path, options.max_entry_size)?;
        Ok(Self::from_handle(handle, options, Some(path.to_path_buf())))
    }

    /// Opens an archive from a byte stream.
    ///
    /// Detection works as for [`open_path`](Self::open_path).
    pub fn open<R>(reader: R) -> Result<Self>
    where
        R: Read + Send + 'static,
    {
        Self::open_with_options(reader, ReadOptions::default())
    }

    /// Opens an archive from a byte stream with custom options.
    pub fn open_with_options<R>(reader: R, options: ReadOptions) -> Result<Self>
    where
        R: Read + Send + 'static,
    {
        let handle = RawReader::from_reader(reader, options.max_entry_size)?;
        Ok(Self::from_handle(handle, options, None))
    }
}
