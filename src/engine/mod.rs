//! The archive engine boundary.
//!
//! Everything that touches the `tar`, `flate2` and `bzip2` crates lives
//! here. The rest of the crate sees a narrow, libarchive-shaped interface:
//! open a read/write/append handle, step through headers, read data, write
//! entries and close. Every failure is reported as an [`EngineError`]
//! carrying the failing [`EngineCall`], a [`Status`] and a message; the
//! session layer turns it into a domain [`Error`](crate::Error).

mod counting;
mod filters;
mod reader;
mod writer;

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::ops::Range;
use std::path::Path;

pub(crate) use filters::{BZIP2_DEFAULT_LEVEL, GZIP_DEFAULT_LEVEL};
pub(crate) use reader::RawReader;
pub(crate) use writer::{EntryHeader, RawWriter};

/// Engine status codes, numbered like libarchive's `ARCHIVE_*` constants.
#[allow(dead_code)] // Eof and Warn are never reported as failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Operation succeeded.
    Ok,
    /// End of archive reached.
    Eof,
    /// Transient condition; the call may succeed if repeated.
    Retry,
    /// Operation succeeded with a partial problem.
    Warn,
    /// This operation failed; the handle is still usable.
    Failed,
    /// The handle is unusable.
    Fatal,
}

impl Status {
    /// Returns the numeric status code.
    pub const fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Eof => 1,
            Status::Retry => -10,
            Status::Warn => -20,
            Status::Failed => -25,
            Status::Fatal => -30,
        }
    }

    /// Derives a status from an I/O error.
    pub fn from_io(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                Status::Retry
            }
            io::ErrorKind::InvalidInput => Status::Failed,
            _ => Status::Fatal,
        }
    }
}

/// The engine call that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineCall {
    /// Open a file for reading and probe the first header.
    OpenRead,
    /// Create a file and install encoder and builder.
    OpenWrite,
    /// Open an existing archive and position after its last entry.
    OpenAppend,
    /// Advance to the next entry header.
    ReadHeader,
    /// Read the content of the current entry.
    ReadData,
    /// Validate and encode an entry header.
    WriteHeader,
    /// Write an entry header and content.
    WriteData,
    /// Write the end marker, finish the encoder and flush.
    Close,
}

impl EngineCall {
    fn name(self) -> &'static str {
        match self {
            EngineCall::OpenRead => "open-read",
            EngineCall::OpenWrite => "open-write",
            EngineCall::OpenAppend => "open-append",
            EngineCall::ReadHeader => "read-header",
            EngineCall::ReadData => "read-data",
            EngineCall::WriteHeader => "write-header",
            EngineCall::WriteData => "write-data",
            EngineCall::Close => "close",
        }
    }
}

impl fmt::Display for EngineCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A failure reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    call: EngineCall,
    status: Status,
    message: String,
}

impl EngineError {
    pub(crate) fn new(call: EngineCall, status: Status, message: impl Into<String>) -> Self {
        Self {
            call,
            status,
            message: message.into(),
        }
    }

    pub(crate) fn io(call: EngineCall, err: &io::Error) -> Self {
        Self::new(call, Status::from_io(err.kind()), err.to_string())
    }

    /// Returns the failing call.
    pub fn call(&self) -> EngineCall {
        self.call
    }

    /// Returns the reported status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the engine's diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (status {})",
            self.call,
            self.message,
            self.status.code()
        )
    }
}

impl std::error::Error for EngineError {}

pub(crate) type EngineResult<T> = std::result::Result<T, EngineError>;

/// Header fields of one archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawHeader {
    pub path: String,
    pub size: u64,
    /// Content offset within the decompressed tar stream.
    pub offset: u64,
    pub mtime: Option<u64>,
    pub ctime: Option<u64>,
}

/// A header plus its content, when the caller asked for it.
#[derive(Debug)]
pub(crate) struct RawEntry {
    pub header: RawHeader,
    pub data: Option<Vec<u8>>,
}

/// Reads `range` straight from an uncompressed archive file.
pub(crate) fn read_range(path: &Path, range: Range<u64>) -> EngineResult<Vec<u8>> {
    let open = |e: io::Error| EngineError::io(EngineCall::OpenRead, &e);
    let mut file = File::open(path).map_err(open)?;
    file.seek(SeekFrom::Start(range.start)).map_err(open)?;

    let len = range.end.saturating_sub(range.start);
    let mut data = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
    file.take(len)
        .read_to_end(&mut data)
        .map_err(|e| EngineError::io(EngineCall::ReadData, &e))?;
    if data.len() as u64 != len {
        return Err(EngineError::new(
            EngineCall::ReadData,
            Status::Fatal,
            format!(
                "truncated entry data: expected {len} bytes, found {}",
                data.len()
            ),
        ));
    }
    Ok(data)
}
