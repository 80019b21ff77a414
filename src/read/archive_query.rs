//! Lookup, iteration and listing.

use log::trace;

use super::{ArchiveReader, Entries};
use crate::{ArchiveEntry, ArchiveItem, Error, Result};

impl ArchiveReader {
    /// Returns the content of the first entry named `path` after the cursor.
    ///
    /// Entries before the match are skipped without being read into memory.
    /// The cursor ends up just past the match, or at the end of the archive
    /// when nothing matched.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no remaining entry has that path
    /// - [`Error::Next`] if a header could not be read
    /// - [`Error::Read`] if the matching entry's content could not be read
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use tarkit::ArchiveReader;
    ///
    /// let mut reader = ArchiveReader::open_path("site.tar")?;
    /// let index = reader.read_data("public/index.html")?;
    /// // The cursor has moved past index.html; this only finds later entries.
    /// let style = reader.read_data("public/style.css");
    /// # Ok::<(), tarkit::Error>(())
    /// ```
    pub fn read_data(&mut self, path: &str) -> Result<Vec<u8>> {
        let handle = self.handle("read_data")?;
        loop {
            let found = handle.next_entry(|header| header.path == path)?;
            match found {
                None => {
                    return Err(Error::NotFound {
                        path: path.to_string(),
                    });
                }
                Some(entry) => {
                    if let Some(data) = entry.data {
                        return Ok(data);
                    }
                    trace!("lookup for {path:?} skipped {:?}", entry.header.path);
                }
            }
        }
    }

    /// Reads the entry under the cursor and advances past it.
    ///
    /// Returns `Ok(None)` at the end of the archive, and on every later call.
    ///
    /// # Errors
    ///
    /// - [`Error::Next`] if the header could not be read
    /// - [`Error::Read`] if the content could not be read
    pub fn read_next(&mut self) -> Result<Option<ArchiveEntry>> {
        let handle = self.handle("read_next")?;
        let Some(entry) = handle.next_entry(|_| true)? else {
            return Ok(None);
        };
        let data = entry.data.unwrap_or_default();
        Ok(Some(ArchiveEntry::from_raw(entry.header, data)))
    }

    /// Returns an iterator over the remaining entries.
    ///
    /// The iterator borrows the reader and advances its cursor.
    ///
    /// ```rust,no_run
    /// use tarkit::ArchiveReader;
    ///
    /// let mut reader = ArchiveReader::open_path("photos.tar")?;
    /// let total: u64 = reader
    ///     .entries()
    ///     .map(|entry| entry.map(|e| e.size()))
    ///     .sum::<tarkit::Result<u64>>()?;
    /// # Ok::<(), tarkit::Error>(())
    /// ```
    pub fn entries(&mut self) -> Entries<'_> {
        Entries::new(self)
    }

    /// Lists the remaining entries without reading their content.
    ///
    /// Items are returned in archive order. Afterwards the cursor is at the
    /// end of the archive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Next`] if a header could not be read.
    pub fn items(&mut self) -> Result<Vec<ArchiveItem>> {
        let filter = self.filter;
        let handle = self.handle("items")?;
        let mut items = Vec::new();
        while let Some(entry) = handle.next_entry(|_| false)? {
            items.push(ArchiveItem::from_header(entry.header, filter));
        }
        Ok(items)
    }
}
