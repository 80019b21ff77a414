//! Fuzz target for opening and iterating arbitrary bytes as an archive.
//!
//! Exercises filter detection, header probing, entry stepping and the
//! resynchronization after each entry. Any panic or hang is a bug; errors
//! are expected.
//!
//! Run with: cargo +nightly fuzz run archive_open

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use tarkit::{ArchiveReader, ReadOptions};

fuzz_target!(|data: &[u8]| {
    let options = ReadOptions::new().max_entry_size(1 << 20);

    if let Ok(mut reader) = ArchiveReader::open_with_options(Cursor::new(data.to_vec()), options) {
        for entry in reader.entries() {
            match entry {
                Ok(entry) => {
                    let _ = entry.path.file_name();
                    let _ = entry.size();
                }
                Err(_) => break,
            }
        }
    }

    if let Ok(mut reader) = ArchiveReader::open_with_options(Cursor::new(data.to_vec()), options) {
        if let Ok(items) = reader.items() {
            for item in items {
                let _ = item.range();
            }
        }
    }
});
