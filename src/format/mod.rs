//! Compression filters and tar container formats.
//!
//! A tar archive on disk is a container format (the layout of its 512-byte
//! header blocks) wrapped in an optional compression filter. Both are
//! detected when an archive is opened for reading and chosen explicitly
//! through [`WriteOptions`](crate::WriteOptions) when one is created.

pub mod detect;

use std::fmt;

pub use detect::{detect_container, detect_filter};

/// Size of one tar block in bytes.
pub const BLOCK_SIZE: u64 = 512;

/// The compression filter wrapping a tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    /// Plain, uncompressed tar.
    #[default]
    None,
    /// gzip (RFC 1952), possibly multi-member.
    Gzip,
    /// bzip2, possibly multi-stream.
    Bzip2,
    /// A recognized compression signature this crate cannot decode
    /// (xz, zstd, lz4, lzip, Unix compress).
    ///
    /// Opening such an archive hands the raw bytes to the tar parser, which
    /// normally rejects them.
    Unsupported,
}

impl Filter {
    /// Returns the conventional file extension suffix for this filter.
    pub fn extension(&self) -> &'static str {
        match self {
            Filter::None => "tar",
            Filter::Gzip => "tar.gz",
            Filter::Bzip2 => "tar.bz2",
            Filter::Unsupported => "",
        }
    }

    /// Returns a human-readable name for this filter.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::None => "none",
            Filter::Gzip => "gzip",
            Filter::Bzip2 => "bzip2",
            Filter::Unsupported => "unsupported",
        }
    }

    /// Returns true if the archive content is compressed.
    ///
    /// Entry offsets of a compressed archive refer to the decompressed
    /// stream and cannot be used to address the file directly.
    pub fn is_compressed(&self) -> bool {
        !matches!(self, Filter::None)
    }

    /// Returns true if this build can decode and encode the filter.
    pub fn is_available(&self) -> bool {
        match self {
            Filter::None => true,
            Filter::Gzip => cfg!(feature = "gzip"),
            Filter::Bzip2 => cfg!(feature = "bzip2"),
            Filter::Unsupported => false,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The header layout of a tar container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContainerFormat {
    /// GNU tar headers (`"ustar  \0"` magic). Stores the created time.
    #[default]
    Gnu,
    /// POSIX ustar headers (`"ustar\0" "00"` magic).
    Ustar,
    /// Pre-POSIX Unix V7 headers without a magic field.
    V7,
    /// The archive holds no entries; its first block is an end marker.
    Empty,
}

impl ContainerFormat {
    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            ContainerFormat::Gnu => "GNU tar",
            ContainerFormat::Ustar => "POSIX ustar",
            ContainerFormat::V7 => "V7 tar",
            ContainerFormat::Empty => "empty",
        }
    }

    /// Returns true if headers in this format can store a created time.
    pub fn stores_created_time(&self) -> bool {
        matches!(self, ContainerFormat::Gnu)
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rounds a byte count up to a whole number of tar blocks, or `None` if the
/// rounded value does not fit in a `u64`.
#[inline]
pub(crate) fn align_block(size: u64) -> Option<u64> {
    size.div_ceil(BLOCK_SIZE).checked_mul(BLOCK_SIZE)
}
