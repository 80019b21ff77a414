//! Session modes.

use std::fmt;

/// The mode a session was opened in.
///
/// The mode is fixed for the lifetime of the session. Reading is done by
/// [`ArchiveReader`](crate::ArchiveReader); writing and appending by
/// [`ArchiveWriter`](crate::ArchiveWriter), so calling an operation that
/// does not belong to the session's mode is a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionMode {
    /// Sequential and by-path reading of an existing archive.
    Read,
    /// Writing a new archive, replacing any existing file.
    Write,
    /// Adding entries to the end of an existing uncompressed archive.
    Append,
}

impl SessionMode {
    /// Returns true for the output modes.
    pub fn is_output(&self) -> bool {
        matches!(self, SessionMode::Write | SessionMode::Append)
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionMode::Read => "read",
            SessionMode::Write => "write",
            SessionMode::Append => "append",
        })
    }
}
