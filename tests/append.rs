//! Append-mode sessions.

mod common;

use common::{archive_in, file_in, sample_entries};
use tarkit::{
    ArchiveReader, ArchiveWriter, ContainerFormat, ErrorKind, SessionMode, WriteOptions,
};
use tempfile::tempdir;

fn names(path: &std::path::Path) -> Vec<String> {
    ArchiveReader::open_path(path)
        .unwrap()
        .items()
        .unwrap()
        .into_iter()
        .map(|item| item.path.into_string())
        .collect()
}

#[test]
fn test_append_keeps_existing_entries() {
    let dir = tempdir().unwrap();
    let path = archive_in(&dir, "grow.tar", WriteOptions::new(), &sample_entries());

    let mut writer = ArchiveWriter::append_path(&path).unwrap();
    assert_eq!(writer.mode(), SessionMode::Append);
    writer.write_bytes("added.txt", b"appended").unwrap();
    let result = writer.finish().unwrap();
    assert_eq!(result.mode, SessionMode::Append);
    assert_eq!(result.entries_written, 1);

    let mut expected: Vec<String> = sample_entries()
        .into_iter()
        .map(|(name, _)| name.to_string())
        .collect();
    expected.push("added.txt".into());
    assert_eq!(names(&path), expected);

    let mut reader = ArchiveReader::open_path(&path).unwrap();
    assert_eq!(reader.read_data("hello.txt").unwrap(), b"Hello, World!");
    assert_eq!(reader.read_data("added.txt").unwrap(), b"appended");
}

#[test]
fn test_append_twice() {
    let dir = tempdir().unwrap();
    let path = archive_in(
        &dir,
        "twice.tar",
        WriteOptions::new(),
        &[("one.txt", b"1".to_vec())],
    );

    for name in ["two.txt", "three.txt"] {
        let mut writer = ArchiveWriter::append_path(&path).unwrap();
        writer.write_bytes(name, name.as_bytes()).unwrap();
        writer.close().unwrap();
    }

    assert_eq!(names(&path), ["one.txt", "two.txt", "three.txt"]);
}

#[test]
fn test_append_without_writes_keeps_archive_valid() {
    let dir = tempdir().unwrap();
    let path = archive_in(&dir, "noop.tar", WriteOptions::new(), &sample_entries());

    ArchiveWriter::append_path(&path).unwrap().close().unwrap();
    assert_eq!(names(&path).len(), sample_entries().len());
}

#[test]
fn test_append_matches_existing_format() {
    let dir = tempdir().unwrap();
    let options = WriteOptions::new().format(ContainerFormat::Ustar);
    let path = archive_in(&dir, "ustar.tar", options, &[("u.txt", b"u".to_vec())]);

    let mut writer = ArchiveWriter::append_path(&path).unwrap();
    assert_eq!(writer.format(), ContainerFormat::Ustar);
    writer.write_bytes("v.txt", b"v").unwrap();
    writer.close().unwrap();

    let mut reader = ArchiveReader::open_path(&path).unwrap();
    assert_eq!(reader.format(), ContainerFormat::Ustar);
    assert_eq!(reader.read_data("v.txt").unwrap(), b"v");
}

#[test]
fn test_append_to_empty_file() {
    let dir = tempdir().unwrap();
    let path = file_in(&dir, "blank.tar", b"");

    let mut writer = ArchiveWriter::append_path(&path).unwrap();
    assert_eq!(writer.format(), ContainerFormat::Gnu);
    writer.write_bytes("first.txt", b"first").unwrap();
    writer.close().unwrap();

    assert_eq!(names(&path), ["first.txt"]);
}

#[test]
fn test_append_to_entryless_archive() {
    let dir = tempdir().unwrap();
    let path = archive_in(&dir, "none.tar", WriteOptions::new(), &[]);

    let mut writer = ArchiveWriter::append_path(&path).unwrap();
    writer.write_bytes("only.txt", b"only").unwrap();
    writer.close().unwrap();

    assert_eq!(names(&path), ["only.txt"]);
}

#[cfg(feature = "gzip")]
#[test]
fn test_append_to_gzip_is_refused() {
    let dir = tempdir().unwrap();
    let path = archive_in(&dir, "packed.tgz", WriteOptions::gzipped(), &sample_entries());
    let before = std::fs::read(&path).unwrap();

    let err = ArchiveWriter::append_path(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Open);
    assert!(err.to_string().contains("compressed"));
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[cfg(feature = "bzip2")]
#[test]
fn test_append_to_bzip2_is_refused() {
    let dir = tempdir().unwrap();
    let path = archive_in(&dir, "packed.tbz", WriteOptions::bzipped(), &sample_entries());

    let err = ArchiveWriter::append_path(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Open);
}

#[test]
fn test_append_to_missing_file() {
    let dir = tempdir().unwrap();
    let err = ArchiveWriter::append_path(dir.path().join("absent.tar")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Open);
}

#[test]
fn test_append_to_garbage() {
    let dir = tempdir().unwrap();
    let path = file_in(&dir, "garbage.tar", &[b'z'; 1024]);
    let err = ArchiveWriter::append_path(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Open);
}
