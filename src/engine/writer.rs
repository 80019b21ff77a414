//! Write handle: create, append and entry encoding.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom};
use std::path::Path;

use log::debug;

use super::filters::FilterSink;
use super::{EngineCall, EngineError, EngineResult, Status};
use crate::archive_path::ArchivePath;
use crate::format::detect::{FILTER_PROBE_LEN, container_of};
use crate::format::{ContainerFormat, Filter, align_block, detect_filter};

/// Permission bits stored for every written entry.
const ENTRY_MODE: u32 = 0o644;

/// Header fields for one entry to be written.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EntryHeader<'a> {
    pub path: &'a ArchivePath,
    pub mtime: u64,
    pub ctime: Option<u64>,
}

/// An open write handle.
pub(crate) struct RawWriter {
    builder: tar::Builder<FilterSink<BufWriter<File>>>,
    filter: Filter,
    format: ContainerFormat,
}

impl std::fmt::Debug for RawWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawWriter")
            .field("filter", &self.filter)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl RawWriter {
    /// Creates or truncates `path` and starts a new archive.
    pub fn create(
        path: &Path,
        filter: Filter,
        format: ContainerFormat,
        level: u32,
    ) -> EngineResult<Self> {
        if !filter.is_available() {
            // Fail before touching the file system.
            FilterSink::new(io::sink(), filter, level)
                .map_err(|msg| EngineError::new(EngineCall::OpenWrite, Status::Failed, msg))?;
        }
        let file = File::create(path).map_err(|e| EngineError::io(EngineCall::OpenWrite, &e))?;
        let sink = FilterSink::new(BufWriter::new(file), filter, level)
            .map_err(|msg| EngineError::new(EngineCall::OpenWrite, Status::Failed, msg))?;

        Ok(Self {
            builder: tar::Builder::new(sink),
            filter,
            format: normalize(format),
        })
    }

    /// Opens an existing plain archive and positions it after its last entry.
    ///
    /// The end-of-archive marker is cut off; new entries use the container
    /// format of the existing first header. An empty file starts a fresh GNU
    /// archive.
    pub fn append(path: &Path) -> EngineResult<Self> {
        let open_err = |e: io::Error| EngineError::io(EngineCall::OpenAppend, &e);

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(open_err)?;

        let (end, format) = locate_end(&file)?;
        debug!("appending to {} at offset {end} ({format})", path.display());

        file.set_len(end).map_err(open_err)?;
        file.seek(SeekFrom::Start(end)).map_err(open_err)?;

        Ok(Self {
            builder: tar::Builder::new(FilterSink::Plain(BufWriter::new(file))),
            filter: Filter::None,
            format,
        })
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn format(&self) -> ContainerFormat {
        self.format
    }

    /// Writes one regular-file entry with its full content.
    pub fn write_entry(&mut self, entry: EntryHeader<'_>, data: &[u8]) -> EngineResult<()> {
        entry
            .path
            .check_writable()
            .map_err(|msg| EngineError::new(EngineCall::WriteHeader, Status::Failed, msg))?;

        let mut header = match self.format {
            ContainerFormat::Ustar => tar::Header::new_ustar(),
            ContainerFormat::V7 => tar::Header::new_old(),
            ContainerFormat::Gnu | ContainerFormat::Empty => tar::Header::new_gnu(),
        };
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(data.len() as u64);
        header.set_mode(ENTRY_MODE);
        header.set_uid(0);
        header.set_gid(0);
        header.set_mtime(entry.mtime);
        if let Some(ctime) = entry.ctime {
            if let Some(gnu) = header.as_gnu_mut() {
                gnu.set_ctime(ctime);
            }
        }

        self.builder
            .append_data(&mut header, Path::new(entry.path.as_str()), data)
            .map_err(|e| EngineError::io(EngineCall::WriteData, &e))
    }

    /// Writes the end marker, finishes the encoder and flushes the file.
    pub fn close(self) -> EngineResult<()> {
        let close_err = |e: io::Error| EngineError::io(EngineCall::Close, &e);

        let sink = self.builder.into_inner().map_err(close_err)?;
        let buffered = sink.finish().map_err(close_err)?;
        let file = buffered
            .into_inner()
            .map_err(|e| close_err(e.into_error()))?;
        file.sync_data().map_err(close_err)
    }
}

fn normalize(format: ContainerFormat) -> ContainerFormat {
    match format {
        ContainerFormat::Empty => ContainerFormat::Gnu,
        other => other,
    }
}

/// Finds the end of the last entry of a plain archive and its header format.
fn locate_end(file: &File) -> EngineResult<(u64, ContainerFormat)> {
    let open_err = |e: io::Error| EngineError::io(EngineCall::OpenAppend, &e);

    let mut magic = Vec::with_capacity(FILTER_PROBE_LEN);
    (&mut &*file)
        .take(FILTER_PROBE_LEN as u64)
        .read_to_end(&mut magic)
        .map_err(open_err)?;
    if magic.is_empty() {
        return Ok((0, ContainerFormat::Gnu));
    }
    let filter = detect_filter(&magic);
    if filter.is_compressed() {
        return Err(EngineError::new(
            EngineCall::OpenAppend,
            Status::Failed,
            format!("cannot append to a compressed archive ({filter})"),
        ));
    }

    (&mut &*file).seek(SeekFrom::Start(0)).map_err(open_err)?;
    let mut archive = tar::Archive::new(BufReader::new(file));
    let mut end = 0;
    let mut format = None;
    for entry in archive.entries().map_err(open_err)? {
        let entry = entry.map_err(open_err)?;
        let stored = entry.header().entry_size().map_err(open_err)?;
        end = align_block(stored)
            .and_then(|aligned| entry.raw_file_position().checked_add(aligned))
            .ok_or_else(|| {
                EngineError::new(
                    EngineCall::OpenAppend,
                    Status::Fatal,
                    "entry size overflows the archive file",
                )
            })?;
        if format.is_none() {
            format = Some(container_of(entry.header()));
        }
    }

    Ok((end, format.unwrap_or(ContainerFormat::Gnu)))
}
