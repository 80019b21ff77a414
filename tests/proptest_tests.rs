//! Property-based tests using proptest.
//!
//! These tests verify invariants of the tarkit library using randomly
//! generated inputs.

use proptest::prelude::*;
use tarkit::format::detect_filter;
use tarkit::{ArchivePath, ArchiveReader, ArchiveWriter, WriteOptions};

/// Strategy for generating entry paths the tar encoder accepts.
///
/// - 1-4 components separated by '/'
/// - each component 1-10 characters, never "." or ".."
fn entry_path_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-zA-Z0-9][a-zA-Z0-9_.-]{0,9}", 1..5)
        .prop_map(|parts| parts.join("/"))
        .prop_filter("must not contain dot segments", |s| {
            !s.split('/').any(|seg| seg == "." || seg == "..")
        })
}

/// Strategy for a list of entries with arbitrary binary content.
fn entries_strategy() -> impl Strategy<Value = Vec<(String, Vec<u8>)>> {
    proptest::collection::vec(
        (
            entry_path_strategy(),
            proptest::collection::vec(any::<u8>(), 0..2048),
        ),
        0..8,
    )
}

fn roundtrip(options: WriteOptions, entries: &[(String, Vec<u8>)]) -> Vec<(String, Vec<u8>)> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prop.tar");

    let mut writer = ArchiveWriter::create_path_with_options(&path, options).unwrap();
    for (name, data) in entries {
        writer.write_bytes(name.as_str(), data).unwrap();
    }
    writer.finish().unwrap();

    let mut reader = ArchiveReader::open_path(&path).unwrap();
    reader
        .entries()
        .map(|entry| {
            let entry = entry.unwrap();
            (entry.path.into_string(), entry.data)
        })
        .collect()
}

proptest! {
    /// Written content reads back byte-identical and in order.
    #[test]
    fn plain_content_roundtrips(entries in entries_strategy()) {
        prop_assert_eq!(roundtrip(WriteOptions::new(), &entries), entries);
    }

    /// Listing reports one item per entry with the written size.
    #[test]
    fn items_match_written_sizes(entries in entries_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.tar");
        let mut writer = ArchiveWriter::create_path(&path).unwrap();
        for (name, data) in &entries {
            writer.write_bytes(name.as_str(), data).unwrap();
        }
        writer.finish().unwrap();

        let items = ArchiveReader::open_path(&path).unwrap().items().unwrap();
        prop_assert_eq!(items.len(), entries.len());
        let mut last = 0;
        for (item, (name, data)) in items.iter().zip(&entries) {
            prop_assert_eq!(item.path.as_str(), name.as_str());
            prop_assert_eq!(item.size, data.len() as u64);
            prop_assert!(item.offset >= last);
            last = item.offset;
        }
    }

    /// Filter detection accepts any input without panicking.
    #[test]
    fn detect_filter_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let _ = detect_filter(&bytes);
    }

    /// Opening arbitrary bytes either succeeds or fails cleanly.
    #[test]
    fn open_arbitrary_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
        if let Ok(mut reader) = ArchiveReader::open(std::io::Cursor::new(bytes)) {
            let _ = reader.items();
        }
    }

    /// A parent path followed by the file name rebuilds the path.
    #[test]
    fn parent_and_file_name_rebuild_path(path in entry_path_strategy()) {
        let archive_path = ArchivePath::new(path.clone());
        let rebuilt = match archive_path.parent() {
            Some(parent) => format!("{}/{}", parent, archive_path.file_name()),
            None => archive_path.file_name().to_string(),
        };
        prop_assert_eq!(rebuilt, path);
    }
}

#[cfg(feature = "gzip")]
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn gzip_content_roundtrips(entries in entries_strategy()) {
        prop_assert_eq!(roundtrip(WriteOptions::gzipped().level(1), &entries), entries);
    }
}

#[cfg(feature = "bzip2")]
proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn bzip2_content_roundtrips(entries in entries_strategy()) {
        prop_assert_eq!(roundtrip(WriteOptions::bzipped().level(1), &entries), entries);
    }
}
