//! Error types for tar archive sessions.
//!
//! This module provides the [`Error`] enum, the closed set of failures a
//! session can report, along with the [`ErrorKind`] classification and a
//! convenient [`Result<T>`] type alias.
//!
//! Every failure raised by the underlying archive engine is translated into
//! one of these variants at the point where the engine call failed. The
//! engine's diagnostic text is kept in the error message, but the variant
//! alone decides how a caller should react.
//!
//! # Handling Errors
//!
//! ```rust,no_run
//! use tarkit::{ArchiveReader, Error};
//!
//! fn read_optional(path: &str, name: &str) -> tarkit::Result<Option<Vec<u8>>> {
//!     let mut reader = ArchiveReader::open_path(path)?;
//!     match reader.read_data(name) {
//!         Ok(data) => Ok(Some(data)),
//!         // Expected outcome: the archive simply doesn't contain the file
//!         Err(Error::NotFound { .. }) => Ok(None),
//!         // Corrupt archive, I/O failure, ...
//!         Err(e) => Err(e),
//!     }
//! }
//! ```
//!
//! # Error Codes
//!
//! Each kind has a stable numeric code, useful when errors cross an FFI or
//! process boundary:
//!
//! | Kind | Code | Typical Cause |
//! |------|------|---------------|
//! | [`Internal`][ErrorKind::Internal] | 1 | Operation on a closed session |
//! | [`Open`][ErrorKind::Open] | 2 | Missing file, unrecognized format |
//! | [`Next`][ErrorKind::Next] | 3 | Corrupt or truncated header |
//! | [`Read`][ErrorKind::Read] | 4 | Corrupt or truncated entry data |
//! | [`Write`][ErrorKind::Write] | 5 | Disk full, invalid entry path |
//! | [`NotFound`][ErrorKind::NotFound] | 6 | Lookup found no matching entry |

use std::fmt;

use crate::engine::{EngineCall, EngineError, Status};

/// The failure class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An invariant was violated; indicates a bug rather than bad input.
    Internal,
    /// Opening, creating or positioning the archive stream failed.
    Open,
    /// Advancing to or decoding the next entry header failed.
    Next,
    /// Reading an entry's content failed after its header was read.
    Read,
    /// Writing an entry or finalizing the archive failed.
    Write,
    /// A lookup by path scanned the remaining archive without a match.
    NotFound,
}

impl ErrorKind {
    /// Returns the stable numeric code for this kind.
    pub const fn code(self) -> i32 {
        match self {
            Self::Internal => 1,
            Self::Open => 2,
            Self::Next => 3,
            Self::Read => 4,
            Self::Write => 5,
            Self::NotFound => 6,
        }
    }

    /// Returns a short lowercase name for this kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Open => "open",
            Self::Next => "next",
            Self::Read => "read",
            Self::Write => "write",
            Self::NotFound => "not found",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The error type for all archive session operations.
///
/// The set of variants is closed: callers can match exhaustively.
/// [`NotFound`](Error::NotFound) is the only variant expected during normal
/// operation; the others point to a malformed archive, a resource problem or
/// a bug, and carry the engine's diagnostic message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An invariant was violated.
    ///
    /// Returned, for example, when an operation is invoked on a session that
    /// has already been closed. Treat it as a bug signal.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Opening, creating or positioning the archive failed.
    ///
    /// Common causes:
    /// - The file does not exist or is not readable
    /// - The first header is not a valid tar header
    /// - The compression filter is not compiled into this build
    /// - Appending to a compressed archive
    #[error("Failed to open archive: {0}")]
    Open(String),

    /// Reading the next entry header failed.
    ///
    /// Usually caused by corrupt archive framing or a truncated stream.
    #[error("Failed to read entry header: {0}")]
    Next(String),

    /// Reading an entry's content failed after its header was read.
    ///
    /// Covers corrupt data sections, decompression failures, truncated
    /// content and entries larger than
    /// [`ReadOptions::max_entry_size`](crate::ReadOptions::max_entry_size).
    #[error("Failed to read entry data: {0}")]
    Read(String),

    /// Writing an entry or finalizing the archive failed.
    ///
    /// After this error the output stream is in an undefined trailing state;
    /// the writer should be dropped.
    #[error("Failed to write entry: {0}")]
    Write(String),

    /// No entry with the requested path was found.
    #[error("Entry not found: {path}")]
    NotFound {
        /// The path that was looked up.
        path: String,
    },
}

impl Error {
    /// Returns the failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Internal(_) => ErrorKind::Internal,
            Error::Open(_) => ErrorKind::Open,
            Error::Next(_) => ErrorKind::Next,
            Error::Read(_) => ErrorKind::Read,
            Error::Write(_) => ErrorKind::Write,
            Error::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// Returns the diagnostic message carried by this error.
    ///
    /// For [`NotFound`](Error::NotFound) this is the path that was looked up.
    pub fn message(&self) -> &str {
        match self {
            Error::Internal(msg)
            | Error::Open(msg)
            | Error::Next(msg)
            | Error::Read(msg)
            | Error::Write(msg) => msg,
            Error::NotFound { path } => path,
        }
    }

    /// Returns true if this error is a lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Creates the error returned when a closed session is used.
    pub(crate) fn closed(operation: &str) -> Self {
        Error::Internal(format!("{operation} called on a closed session"))
    }
}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        if err.status() == Status::Ok {
            return Error::Internal(format!(
                "{} reported success as a failure: {}",
                err.call(),
                err.message()
            ));
        }

        let message = err.to_string();
        match err.call() {
            EngineCall::OpenRead | EngineCall::OpenWrite | EngineCall::OpenAppend => {
                Error::Open(message)
            }
            EngineCall::ReadHeader => Error::Next(message),
            EngineCall::ReadData => Error::Read(message),
            EngineCall::WriteHeader | EngineCall::WriteData | EngineCall::Close => {
                Error::Write(message)
            }
        }
    }
}

/// A specialized Result type for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_kind_codes_are_stable() {
        assert_eq!(ErrorKind::Internal.code(), 1);
        assert_eq!(ErrorKind::Open.code(), 2);
        assert_eq!(ErrorKind::Next.code(), 3);
        assert_eq!(ErrorKind::Read.code(), 4);
        assert_eq!(ErrorKind::Write.code(), 5);
        assert_eq!(ErrorKind::NotFound.code(), 6);
    }

    #[test]
    fn test_not_found() {
        let err = Error::NotFound {
            path: "docs/readme.txt".into(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "docs/readme.txt");
        assert_eq!(err.to_string(), "Entry not found: docs/readme.txt");
    }

    #[test]
    fn test_closed_session() {
        let err = Error::closed("read_next");
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.message().contains("read_next"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_maps_open_calls() {
        for call in [
            EngineCall::OpenRead,
            EngineCall::OpenWrite,
            EngineCall::OpenAppend,
        ] {
            let io_err = io::Error::new(io::ErrorKind::NotFound, "no such file");
            let err: Error = EngineError::io(call, &io_err).into();
            assert_eq!(err.kind(), ErrorKind::Open, "{call:?}");
            assert!(err.message().contains("no such file"));
        }
    }

    #[test]
    fn test_maps_read_calls() {
        let err: Error =
            EngineError::new(EngineCall::ReadHeader, Status::Fatal, "checksum mismatch").into();
        assert_eq!(err.kind(), ErrorKind::Next);

        let err: Error =
            EngineError::new(EngineCall::ReadData, Status::Fatal, "truncated data").into();
        assert_eq!(err.kind(), ErrorKind::Read);
        assert!(err.to_string().contains("truncated data"));
    }

    #[test]
    fn test_maps_write_calls() {
        for call in [
            EngineCall::WriteHeader,
            EngineCall::WriteData,
            EngineCall::Close,
        ] {
            let err: Error = EngineError::new(call, Status::Failed, "disk full").into();
            assert_eq!(err.kind(), ErrorKind::Write, "{call:?}");
        }
    }

    #[test]
    fn test_ok_status_is_internal() {
        let err: Error = EngineError::new(EngineCall::ReadData, Status::Ok, "spurious").into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.message(), "read-data reported success as a failure: spurious");
    }

    #[test]
    fn test_message_keeps_status_code() {
        let err: Error =
            EngineError::new(EngineCall::ReadHeader, Status::Fatal, "bad header").into();
        assert!(err.message().contains("-30"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
