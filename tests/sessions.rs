//! Session lifecycle: closing, dropping, modes and error taxonomy.

mod common;

use common::{archive_in, sample_entries};
use tarkit::{
    ArchiveEntry, ArchiveReader, ArchiveWriter, ErrorKind, Filter, SessionMode, Tarball,
    WriteOptions,
};
use tempfile::tempdir;

#[test]
fn test_sessions_are_send() {
    fn assert_send<T: Send>() {}
    assert_send::<ArchiveReader>();
    assert_send::<ArchiveWriter>();
    assert_send::<Tarball>();
}

#[test]
fn test_reader_double_close() {
    let dir = tempdir().unwrap();
    let path = archive_in(&dir, "close.tar", WriteOptions::new(), &sample_entries());

    let mut reader = ArchiveReader::open_path(&path).unwrap();
    assert!(reader.is_open());
    reader.close().unwrap();
    assert!(!reader.is_open());
    reader.close().unwrap();
}

#[test]
fn test_reader_operations_after_close() {
    let dir = tempdir().unwrap();
    let path = archive_in(&dir, "closed.tar", WriteOptions::new(), &sample_entries());

    let mut reader = ArchiveReader::open_path(&path).unwrap();
    reader.close().unwrap();

    assert_eq!(reader.read_next().unwrap_err().kind(), ErrorKind::Internal);
    assert_eq!(
        reader.read_data("hello.txt").unwrap_err().kind(),
        ErrorKind::Internal
    );
    assert_eq!(reader.items().unwrap_err().kind(), ErrorKind::Internal);

    let mut entries = reader.entries();
    assert_eq!(
        entries.next().unwrap().unwrap_err().kind(),
        ErrorKind::Internal
    );
    assert!(entries.next().is_none());
}

#[test]
fn test_writer_double_close() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("twice.tar");

    let mut writer = ArchiveWriter::create_path(&path).unwrap();
    writer.write_bytes("a.txt", b"a").unwrap();
    writer.close().unwrap();
    writer.close().unwrap();
    assert!(!writer.is_open());

    let mut reader = ArchiveReader::open_path(&path).unwrap();
    assert_eq!(reader.read_data("a.txt").unwrap(), b"a");
}

#[test]
fn test_writer_operations_after_close() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("closed.tar");

    let mut writer = ArchiveWriter::create_path(&path).unwrap();
    writer.close().unwrap();

    let err = writer.write_bytes("late.txt", b"late").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.to_string().contains("closed"));
    assert_eq!(writer.entries_written(), 0);

    let result = writer.finish().unwrap();
    assert_eq!(result.entries_written, 0);
}

#[test]
fn test_drop_finalizes_writer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dropped.tar");

    {
        let mut writer = ArchiveWriter::create_path(&path).unwrap();
        writer.write_bytes("kept.txt", b"still here").unwrap();
    }

    let mut reader = ArchiveReader::open_path(&path).unwrap();
    assert_eq!(reader.read_data("kept.txt").unwrap(), b"still here");
}

#[cfg(feature = "gzip")]
#[test]
fn test_drop_finalizes_compressed_writer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dropped.tgz");

    {
        let mut writer =
            ArchiveWriter::create_path_with_options(&path, WriteOptions::gzipped()).unwrap();
        writer.write_bytes("kept.txt", b"compressed").unwrap();
    }

    let mut reader = ArchiveReader::open_path(&path).unwrap();
    assert_eq!(reader.filter(), Filter::Gzip);
    assert_eq!(reader.read_data("kept.txt").unwrap(), b"compressed");
}

#[test]
fn test_drop_after_close() {
    let dir = tempdir().unwrap();
    let path = archive_in(&dir, "drop.tar", WriteOptions::new(), &sample_entries());

    let mut reader = ArchiveReader::open_path(&path).unwrap();
    reader.close().unwrap();
    drop(reader);

    let mut writer = ArchiveWriter::append_path(&path).unwrap();
    writer.close().unwrap();
    drop(writer);
}

#[test]
fn test_modes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("modes.tar");

    let writer = ArchiveWriter::create_path(&path).unwrap();
    assert_eq!(writer.mode(), SessionMode::Write);
    assert!(writer.mode().is_output());
    writer.finish().unwrap();

    let writer = ArchiveWriter::append_path(&path).unwrap();
    assert_eq!(writer.mode(), SessionMode::Append);
    writer.finish().unwrap();

    let reader = ArchiveReader::open_path(&path).unwrap();
    assert_eq!(reader.mode(), SessionMode::Read);
    assert!(!reader.mode().is_output());
}

#[test]
fn test_create_unsupported_filter() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("never.tar.xz");
    let options = WriteOptions::new().filter(Filter::Unsupported);

    let err = ArchiveWriter::create_path_with_options(&path, options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Open);
    assert!(!path.exists());
}

#[test]
fn test_create_in_missing_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no/such/dir/out.tar");
    let err = ArchiveWriter::create_path(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Open);
}

#[test]
fn test_invalid_entry_paths() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("paths.tar");
    let mut writer = ArchiveWriter::create_path(&path).unwrap();

    let long_parent = format!("{}../escape.txt", "d/".repeat(60));
    let long_absolute = format!("/{}escape.txt", "d/".repeat(60));
    for bad in [
        "",
        "nul\0byte",
        "../escape.txt",
        "/etc/passwd",
        long_parent.as_str(),
        long_absolute.as_str(),
    ] {
        let err = writer.write_bytes(bad, b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Write, "{bad:?}");
    }
    assert_eq!(writer.entries_written(), 0);

    writer
        .write_entry(&ArchiveEntry::new("fine.txt", b"ok".to_vec()))
        .unwrap();
    writer.close().unwrap();

    let items = ArchiveReader::open_path(&path).unwrap().items().unwrap();
    assert_eq!(items.len(), 1);
    assert!(items.iter().all(|item| !item.path.as_str().contains("..")));
}

#[test]
fn test_error_codes() {
    let dir = tempdir().unwrap();
    let path = archive_in(&dir, "codes.tar", WriteOptions::new(), &sample_entries());

    let mut reader = ArchiveReader::open_path(&path).unwrap();
    let not_found = reader.read_data("absent").unwrap_err();
    assert_eq!(not_found.kind().code(), 6);

    let open = ArchiveReader::open_path(dir.path().join("absent.tar")).unwrap_err();
    assert_eq!(open.kind().code(), 2);
    assert_ne!(open.kind(), not_found.kind());
}

#[test]
fn test_sessions_move_across_threads() {
    let dir = tempdir().unwrap();
    let path = archive_in(&dir, "threads.tar", WriteOptions::new(), &sample_entries());

    let reader = ArchiveReader::open_path(&path).unwrap();
    let data = std::thread::spawn(move || {
        let mut reader = reader;
        reader.read_data("hello.txt")
    })
    .join()
    .unwrap()
    .unwrap();
    assert_eq!(data, b"Hello, World!");
}
