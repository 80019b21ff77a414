//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tarkit::{ArchiveWriter, WriteOptions, WriteResult};
use tempfile::TempDir;

/// A small set of entries with distinct sizes, including an empty one and
/// one that spans several tar blocks.
pub fn sample_entries() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("hello.txt", b"Hello, World!".to_vec()),
        ("docs/readme.md", b"# Readme\n\nSome text.\n".to_vec()),
        ("empty.bin", Vec::new()),
        ("data/blocks.bin", pseudo_random(3000, 7)),
    ]
}

/// Deterministic, poorly compressible bytes.
pub fn pseudo_random(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

/// Writes `entries` to a new archive at `path`.
pub fn write_archive(
    path: &Path,
    options: WriteOptions,
    entries: &[(&str, Vec<u8>)],
) -> tarkit::Result<WriteResult> {
    let mut writer = ArchiveWriter::create_path_with_options(path, options)?;
    for (name, data) in entries {
        writer.write_bytes(*name, data)?;
    }
    writer.finish()
}

/// Creates an archive named `name` inside `dir` holding `entries`.
pub fn archive_in(
    dir: &TempDir,
    name: &str,
    options: WriteOptions,
    entries: &[(&str, Vec<u8>)],
) -> PathBuf {
    let path = dir.path().join(name);
    write_archive(&path, options, entries).expect("failed to write test archive");
    path
}

/// Builds plain tar bytes directly with the `tar` crate.
pub fn raw_tar(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(1_234_567_890);
        builder
            .append_data(&mut header, path, *data)
            .expect("failed to build tar");
    }
    builder.into_inner().expect("failed to finish tar")
}

/// Writes raw bytes to a file named `name` inside `dir`.
pub fn file_in(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("failed to write test file");
    path
}
