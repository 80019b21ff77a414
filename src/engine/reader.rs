//! Read handle: filter detection, header probing and entry stepping.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::Path;

use log::{trace, warn};

use super::counting::CountingReader;
use super::filters;
use super::{EngineCall, EngineError, EngineResult, RawEntry, RawHeader, Status};
use crate::format::detect::FILTER_PROBE_LEN;
use crate::format::{
    BLOCK_SIZE, ContainerFormat, Filter, align_block, detect_container, detect_filter,
};

/// Preallocation cap for entry content; larger entries grow on demand.
const MAX_PREALLOC: u64 = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    Headers,
    Finished,
    Failed,
}

/// An open read handle over a decompressed tar stream.
pub(crate) struct RawReader {
    stream: CountingReader<Box<dyn Read + Send>>,
    filter: Filter,
    format: ContainerFormat,
    max_entry_size: Option<u64>,
    state: ReadState,
}

impl std::fmt::Debug for RawReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawReader")
            .field("filter", &self.filter)
            .field("format", &self.format)
            .field("position", &self.stream.position())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl RawReader {
    /// Opens the archive file at `path`.
    pub fn open(path: &Path, max_entry_size: Option<u64>) -> EngineResult<Self> {
        let file = File::open(path).map_err(|e| EngineError::io(EngineCall::OpenRead, &e))?;
        Self::from_reader(BufReader::new(file), max_entry_size)
    }

    /// Opens an archive from an arbitrary byte stream.
    pub fn from_reader<R>(mut raw: R, max_entry_size: Option<u64>) -> EngineResult<Self>
    where
        R: Read + Send + 'static,
    {
        let open_err = |e: io::Error| EngineError::io(EngineCall::OpenRead, &e);

        let mut magic = Vec::with_capacity(FILTER_PROBE_LEN);
        (&mut raw)
            .take(FILTER_PROBE_LEN as u64)
            .read_to_end(&mut magic)
            .map_err(open_err)?;
        if magic.is_empty() {
            return Err(EngineError::new(
                EngineCall::OpenRead,
                Status::Fatal,
                "archive is empty",
            ));
        }

        let filter = detect_filter(&magic);
        if filter == Filter::Unsupported {
            warn!("unsupported compression filter detected; reading the stream as plain tar");
        }
        let mut decoded = filters::decoder(filter, Cursor::new(magic).chain(raw))
            .map_err(|msg| EngineError::new(EngineCall::OpenRead, Status::Failed, msg))?;

        let mut block = Vec::with_capacity(BLOCK_SIZE as usize);
        (&mut decoded)
            .take(BLOCK_SIZE)
            .read_to_end(&mut block)
            .map_err(open_err)?;
        let format = detect_container(&block)
            .map_err(|msg| EngineError::new(EngineCall::OpenRead, Status::Fatal, msg))?;

        let replayed: Box<dyn Read + Send> = Box::new(Cursor::new(block).chain(decoded));
        Ok(Self {
            stream: CountingReader::new(replayed),
            filter,
            format,
            max_entry_size,
            state: ReadState::Headers,
        })
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn format(&self) -> ContainerFormat {
        self.format
    }

    /// Advances to the next entry.
    ///
    /// `want_data` sees the header and decides whether the content is
    /// materialized; skipped content is discarded without buffering.
    /// Returns `Ok(None)` at the end marker or end of stream, and keeps
    /// returning it afterwards. After any error the handle is poisoned and
    /// every later call fails with a fatal `ReadHeader` error.
    pub fn next_entry<F>(&mut self, want_data: F) -> EngineResult<Option<RawEntry>>
    where
        F: FnMut(&RawHeader) -> bool,
    {
        match self.state {
            ReadState::Finished => return Ok(None),
            ReadState::Failed => {
                return Err(EngineError::new(
                    EngineCall::ReadHeader,
                    Status::Fatal,
                    "archive stream is unusable after an earlier failure",
                ));
            }
            ReadState::Headers => {}
        }

        let result = self.step(want_data);
        match &result {
            Ok(Some(_)) => {}
            Ok(None) => self.state = ReadState::Finished,
            Err(_) => self.state = ReadState::Failed,
        }
        result
    }

    fn step<F>(&mut self, mut want_data: F) -> EngineResult<Option<RawEntry>>
    where
        F: FnMut(&RawHeader) -> bool,
    {
        let header_err = |e: io::Error| EngineError::io(EngineCall::ReadHeader, &e);
        let limit = self.max_entry_size;

        loop {
            let base = self.stream.position();
            let (end, entry) = {
                // Fresh parser per step: tar's entry iterator borrows the
                // archive, so it cannot live inside the handle itself.
                let mut archive = tar::Archive::new(&mut self.stream);
                let mut entries = archive.entries().map_err(header_err)?;
                let Some(entry) = entries.next() else {
                    return Ok(None);
                };
                let mut entry = entry.map_err(header_err)?;

                let stored = entry.header().entry_size().map_err(header_err)?;
                let offset = base.checked_add(entry.raw_file_position());
                let Some((offset, end)) = offset.and_then(|offset| {
                    let end = offset.checked_add(align_block(stored)?)?;
                    Some((offset, end))
                }) else {
                    return Err(EngineError::new(
                        EngineCall::ReadHeader,
                        Status::Fatal,
                        format!("entry size overflows the archive stream at offset {base}"),
                    ));
                };

                if entry.header().entry_type().is_pax_global_extensions() {
                    trace!("skipping pax global header at offset {base}");
                    (end, None)
                } else {
                    let header = RawHeader {
                        path: String::from_utf8_lossy(&entry.path_bytes()).into_owned(),
                        size: entry.size(),
                        offset,
                        mtime: entry.header().mtime().ok(),
                        ctime: entry
                            .header()
                            .as_gnu()
                            .and_then(|gnu| gnu.ctime().ok())
                            .filter(|&secs| secs != 0),
                    };
                    trace!(
                        "entry {:?} ({} bytes at offset {})",
                        header.path, header.size, header.offset
                    );

                    let data = if want_data(&header) {
                        Some(read_content(&mut entry, &header, limit)?)
                    } else {
                        None
                    };
                    (end, Some(RawEntry { header, data }))
                }
            };

            let skipped_from = self.stream.position();
            let skipped = self.stream.skip_to(end).map_err(header_err)?;
            if skipped_from + skipped < end {
                return Err(EngineError::new(
                    EngineCall::ReadHeader,
                    Status::Fatal,
                    format!("unexpected end of archive at offset {}", self.stream.position()),
                ));
            }

            if entry.is_some() {
                return Ok(entry);
            }
        }
    }
}

fn read_content<R: Read>(
    entry: &mut R,
    header: &RawHeader,
    limit: Option<u64>,
) -> EngineResult<Vec<u8>> {
    if let Some(limit) = limit {
        if header.size > limit {
            return Err(EngineError::new(
                EngineCall::ReadData,
                Status::Failed,
                format!(
                    "entry {:?} is {} bytes, above the limit of {limit}",
                    header.path, header.size
                ),
            ));
        }
    }

    let mut data = Vec::with_capacity(header.size.min(MAX_PREALLOC) as usize);
    entry
        .read_to_end(&mut data)
        .map_err(|e| EngineError::io(EngineCall::ReadData, &e))?;
    if data.len() as u64 != header.size {
        return Err(EngineError::new(
            EngineCall::ReadData,
            Status::Fatal,
            format!(
                "truncated entry data for {:?}: expected {} bytes, found {}",
                header.path,
                header.size,
                data.len()
            ),
        ));
    }
    Ok(data)
}
