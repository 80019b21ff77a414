//! Read options.

/// Options for opening an archive for reading.
///
/// # Example
///
/// ```rust
/// use tarkit::ReadOptions;
///
/// // Refuse to materialize any entry above 64 MiB
/// let options = ReadOptions::new().max_entry_size(64 * 1024 * 1024);
/// assert_eq!(options.max_entry_size, Some(64 * 1024 * 1024));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Largest entry content, in bytes, that will be read into memory.
    ///
    /// Reading a larger entry fails with [`Error::Read`](crate::Error::Read)
    /// and ends the session. Listing is not affected. `None` means no limit.
    pub max_entry_size: Option<u64>,
}

impl ReadOptions {
    /// Creates options with no limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the largest entry size that will be read into memory.
    pub fn max_entry_size(mut self, bytes: u64) -> Self {
        self.max_entry_size = Some(bytes);
        self
    }
}
