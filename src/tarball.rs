//! Path-bound, stateless archive access.

use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use log::debug;

use crate::engine;
use crate::read::{ArchiveReader, ReadOptions};
use crate::{ArchiveEntry, ArchiveItem, Error, Result};

/// An archive on disk, read through a fresh session per operation.
///
/// Unlike [`ArchiveReader`], lookups are repeatable and independent of each
/// other: every call opens the archive, does its work and closes it again.
/// Constructing a `Tarball` does no I/O.
///
/// # Example
///
/// ```rust,no_run
/// use tarkit::Tarball;
///
/// let tarball = Tarball::new("release.tar");
/// for item in tarball.items()? {
///     // Uncompressed archives are read straight from the item's byte range
///     let data = tarball.read_item(&item)?;
///     assert_eq!(data.len() as u64, item.size);
/// }
/// let readme = tarball.read("README.md")?;
/// let again = tarball.read("README.md")?;
/// assert_eq!(readme, again);
/// # Ok::<(), tarkit::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Tarball {
    path: PathBuf,
    options: ReadOptions,
}

impl Tarball {
    /// Binds to the archive at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, ReadOptions::default())
    }

    /// Binds to the archive at `path`, opening every session with `options`.
    pub fn with_options(path: impl Into<PathBuf>, options: ReadOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    /// Returns the archive path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<ArchiveReader> {
        ArchiveReader::open_path_with_options(&self.path, self.options)
    }

    /// Lists every entry of the archive.
    pub fn items(&self) -> Result<Vec<ArchiveItem>> {
        self.open()?.items()
    }

    /// Returns the content of the first entry named `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no entry has that path, and the usual
    /// open and read errors otherwise.
    pub fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.open()?.read_data(path)
    }

    /// Returns the content of a listed item.
    ///
    /// For uncompressed archives the item's byte range is read directly
    /// from the file without parsing any headers. For compressed archives
    /// this is a lookup by the item's path.
    pub fn read_item(&self, item: &ArchiveItem) -> Result<Vec<u8>> {
        if item.compressed {
            return self.read(item.path.as_str());
        }
        if let Some(limit) = self.options.max_entry_size {
            if item.size > limit {
                return Err(Error::Read(format!(
                    "entry {:?} is {} bytes, above the limit of {limit}",
                    item.path.as_str(),
                    item.size
                )));
            }
        }
        debug!(
            "reading {} bytes of {} at offset {}",
            item.size,
            self.path.display(),
            item.offset
        );
        Ok(engine::read_range(&self.path, item.range())?)
    }

    /// Returns an iterator over all entries, owning its own session.
    pub fn entries(&self) -> Result<TarballEntries> {
        Ok(TarballEntries {
            reader: self.open()?,
            done: false,
        })
    }
}

/// Owning iterator over the entries of a [`Tarball`].
///
/// Iteration stops after the first error.
#[derive(Debug)]
pub struct TarballEntries {
    reader: ArchiveReader,
    done: bool,
}

impl Iterator for TarballEntries {
    type Item = Result<ArchiveEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.reader.read_next().transpose();
        if !matches!(next, Some(Ok(_))) {
            self.done = true;
            let _ = self.reader.close();
        }
        next
    }
}

impl FusedIterator for TarballEntries {}
