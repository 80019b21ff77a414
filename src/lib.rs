//! # tarkit
//!
//! Read, iterate, create and append tar archives, optionally compressed with
//! gzip or bzip2, through one small entity model.
//!
//! The crate offers three ways in:
//!
//! - [`ArchiveReader`]: a forward-only read session with lookup by path,
//!   sequential iteration and listing over one shared cursor
//! - [`ArchiveWriter`]: a create or append session writing one fully
//!   materialized entry per call
//! - [`Tarball`]: a path-bound facade opening a fresh session per call,
//!   with direct byte-range reads for uncompressed archives
//!
//! Compression is detected from the archive content when reading and chosen
//! through [`WriteOptions`] when writing. Every failure is reported as one of
//! the six [`Error`] variants.
//!
//! ## Quick Start
//!
//! ### Creating an Archive
//!
//! ```rust,no_run
//! use tarkit::{ArchiveWriter, Result, WriteOptions};
//!
//! fn main() -> Result<()> {
//!     let mut writer = ArchiveWriter::create_path_with_options(
//!         "notes.tar.gz",
//!         WriteOptions::gzipped(),
//!     )?;
//!     writer.write_bytes("hello.txt", b"Hello, World!")?;
//!     writer.write_bytes("todo/today.txt", b"write more tests")?;
//!
//!     let result = writer.finish()?;
//!     println!("Wrote {} entries", result.entries_written);
//!     Ok(())
//! }
//! ```
//!
//! ### Reading an Archive
//!
//! ```rust,no_run
//! use tarkit::{ArchiveReader, Result};
//!
//! fn main() -> Result<()> {
//!     let mut reader = ArchiveReader::open_path("notes.tar.gz")?;
//!     println!("filter: {}, format: {}", reader.filter(), reader.format());
//!
//!     for entry in reader.entries() {
//!         let entry = entry?;
//!         println!("{}: {} bytes", entry.path, entry.size());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Appending
//!
//! Only uncompressed archives can be appended to:
//!
//! ```rust,no_run
//! use tarkit::{ArchiveWriter, Result};
//!
//! fn main() -> Result<()> {
//!     let mut writer = ArchiveWriter::append_path("log.tar")?;
//!     writer.write_bytes("2024-06-01.log", b"all quiet")?;
//!     writer.close()
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `gzip` | Yes | gzip filter (via `flate2`) |
//! | `bzip2` | Yes | bzip2 filter (via `bzip2`) |
//!
//! With a filter's feature disabled, detection still recognizes it but
//! opening or creating such an archive fails with [`Error::Open`].
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade and installs no logger.
//! Sessions log at `debug` level when opened and closed, entries at `trace`
//! level, and recoverable oddities at `warn` level.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod archive_path;
mod engine;
mod entry;
pub mod error;
pub mod format;
pub mod read;
mod session;
mod tarball;
pub mod timestamp;
pub mod write;

pub use archive_path::ArchivePath;
pub use entry::{ArchiveEntry, ArchiveItem};
pub use error::{Error, ErrorKind, Result};
pub use format::{ContainerFormat, Filter};
pub use session::SessionMode;
pub use tarball::{Tarball, TarballEntries};
pub use timestamp::Timestamp;

// Re-export reading API at crate root for convenience
pub use read::{ArchiveReader, Entries, ReadOptions};

// Re-export writing API at crate root for convenience
pub use write::{ArchiveWriter, WriteOptions, WriteResult};
