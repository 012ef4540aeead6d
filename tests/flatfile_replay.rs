use std::fs;

use tempfile::TempDir;

use libcatalog::{
    catalog::{Catalog, CatalogError},
    codec::CodecError,
    config::CatalogConfig,
    persist::{CatalogSink, PersistError, RecordKind, flatfile::FlatFileSink},
};

fn sink_in(tmp: &TempDir) -> FlatFileSink {
    FlatFileSink::new(tmp.path().join("books.txt"), tmp.path().join("members.txt"))
}

#[test]
fn missing_files_load_as_empty_catalog() {
    let tmp = TempDir::new().expect("tmp");
    let mut catalog = Catalog::new(sink_in(&tmp));

    let report = catalog.load().expect("load");
    assert_eq!(report.books_loaded, 0);
    assert_eq!(report.members_loaded, 0);
    assert!(report.skipped.is_empty());
    assert_eq!(catalog.store().next_book_id(), 100);
    assert_eq!(catalog.store().next_member_id(), 1000);
}

#[test]
fn malformed_line_is_skipped_and_reported() {
    let tmp = TempDir::new().expect("tmp");
    let sink = sink_in(&tmp);
    fs::write(sink.books_path(), "100|Dune|Frank Herbert|SciFi|1\nabc|bad\n\n").expect("write");

    let mut catalog = Catalog::new(sink);
    let report = catalog.load().expect("load");

    assert_eq!(report.books_loaded, 1);
    assert_eq!(report.skipped.len(), 1);
    let skipped = &report.skipped[0];
    assert_eq!(skipped.kind, RecordKind::Book);
    assert_eq!(skipped.line_no, 2);
    assert_eq!(skipped.line, "abc|bad");
    assert_eq!(
        skipped.error,
        CodecError::InvalidId {
            raw: "abc".to_string()
        }
    );

    let book = catalog.store().book(100).expect("book 100");
    assert_eq!(book.title, "Dune");
    assert!(book.is_issued);
    assert_eq!(catalog.store().next_book_id(), 101);
    assert_eq!(catalog.store().categories(), vec!["SciFi"]);
}

#[test]
fn non_utf8_line_is_skipped_not_fatal() {
    let tmp = TempDir::new().expect("tmp");
    let sink = sink_in(&tmp);
    let mut bytes = b"1000|Ada|ada@example.com|\n".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
    bytes.extend_from_slice(b"1003|Bo|bo@example.com|\n");
    fs::write(sink.members_path(), bytes).expect("write");

    let mut catalog = Catalog::new(sink);
    let report = catalog.load().expect("load");
    assert_eq!(report.members_loaded, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].error, CodecError::InvalidUtf8);
    assert_eq!(catalog.store().next_member_id(), 1004);
}

#[test]
fn load_then_save_reproduces_equivalent_records() {
    let tmp = TempDir::new().expect("tmp");
    let sink = sink_in(&tmp);
    fs::write(
        sink.books_path(),
        "101|Emma|Jane Austen|Classic|0\n100|Pipe \\| Dream|A\\nB|Misc|1\n",
    )
    .expect("write books");
    fs::write(sink.members_path(), "1000|Ada|ada@example.com|100\n").expect("write members");

    let mut catalog = Catalog::new(sink.clone());
    catalog.load().expect("load");
    let before = catalog.store().export_snapshot();
    catalog.save().expect("save");

    let mut reloaded = Catalog::new(sink);
    let report = reloaded.load().expect("reload");
    assert!(report.skipped.is_empty());
    assert!(report.inconsistencies.is_empty());
    assert_eq!(reloaded.store().export_snapshot(), before);
    assert_eq!(reloaded.store().book(100).expect("book").author, "A\nB");
}

#[test]
fn mutations_are_persisted_immediately() {
    let tmp = TempDir::new().expect("tmp");
    let mut catalog = Catalog::new(sink_in(&tmp));
    catalog.load().expect("load");

    let book = catalog.add_book("Dune", "Frank Herbert", "SciFi").expect("add book");
    let member = catalog.add_member("Alice", "a.b@example.co").expect("add member");
    catalog.issue_book(member, book).expect("issue");

    let books = fs::read_to_string(tmp.path().join("books.txt")).expect("read books");
    let members = fs::read_to_string(tmp.path().join("members.txt")).expect("read members");
    assert_eq!(books, "100|Dune|Frank Herbert|SciFi|1\n");
    assert_eq!(members, "1000|Alice|a.b@example.co|100\n");

    catalog.return_book(member, book).expect("return");
    let members = fs::read_to_string(tmp.path().join("members.txt")).expect("read members");
    assert_eq!(members, "1000|Alice|a.b@example.co|\n");
}

#[test]
fn counters_resume_above_loaded_ids() {
    let tmp = TempDir::new().expect("tmp");
    let sink = sink_in(&tmp);
    fs::write(sink.books_path(), "250|Old|Someone|Misc|0\n").expect("write");
    fs::write(sink.members_path(), "1200|Ann|ann@example.com|\n").expect("write");

    let mut catalog = Catalog::new(sink);
    catalog.load().expect("load");
    assert_eq!(catalog.add_book("New", "Author", "Misc").expect("add"), 251);
    assert_eq!(catalog.add_member("Ben", "ben@example.com").expect("add"), 1201);
}

#[test]
fn in_place_writes_produce_same_files() {
    let tmp = TempDir::new().expect("tmp");
    let cfg = CatalogConfig {
        books_path: tmp.path().join("b.txt"),
        members_path: tmp.path().join("m.txt"),
        atomic_writes: false,
    };
    let mut catalog = Catalog::new(FlatFileSink::from_config(&cfg));
    catalog.add_book("Dune", "Frank Herbert", "SciFi").expect("add");

    let books = fs::read_to_string(&cfg.books_path).expect("read");
    assert_eq!(books, "100|Dune|Frank Herbert|SciFi|0\n");
    assert_eq!(fs::read_to_string(&cfg.members_path).expect("read"), "");
}

#[test]
fn atomic_write_leaves_no_temp_files() {
    let tmp = TempDir::new().expect("tmp");
    let mut catalog = Catalog::new(sink_in(&tmp));
    catalog.add_book("Dune", "Frank Herbert", "SciFi").expect("add");
    catalog.add_book("Emma", "Jane Austen", "Classic").expect("add");

    let mut names: Vec<String> = fs::read_dir(tmp.path())
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["books.txt", "members.txt"]);
}

#[test]
fn write_failure_keeps_mutation_in_memory() {
    let tmp = TempDir::new().expect("tmp");
    let missing_dir = tmp.path().join("no-such-dir");
    let sink = FlatFileSink::new(missing_dir.join("books.txt"), missing_dir.join("members.txt"));
    let mut catalog = Catalog::new(sink);

    let err = catalog.add_book("Dune", "Frank Herbert", "SciFi").unwrap_err();
    match err {
        CatalogError::Unsaved { event, source } => {
            assert_eq!(event.to_string(), "Book added successfully with ID: 100");
            assert!(matches!(source, PersistError::Io { .. }));
        }
        other => panic!("expected unsaved error, got {other:?}"),
    }
    assert!(catalog.store().book(100).is_some());
    assert_eq!(catalog.store().next_book_id(), 101);
}

#[test]
fn one_failing_file_does_not_stop_the_other() {
    let tmp = TempDir::new().expect("tmp");
    let sink = sink_in(&tmp);
    fs::create_dir(sink.books_path()).expect("dir in place of books file");
    let books_path = sink.books_path().to_path_buf();
    let mut catalog = Catalog::new(sink);

    match catalog.add_member("Ann", "ann@example.com") {
        Err(CatalogError::Unsaved { event, source }) => {
            assert_eq!(event.to_string(), "Member added successfully with ID: 1000");
            match source {
                PersistError::Io { path, .. } => assert_eq!(path, books_path),
                other => panic!("expected io error, got {other:?}"),
            }
        }
        other => panic!("expected unsaved error, got {other:?}"),
    }
    let members = fs::read_to_string(tmp.path().join("members.txt")).expect("read members");
    assert_eq!(members, "1000|Ann|ann@example.com|\n");
}

#[test]
fn unreadable_books_path_is_an_io_error() {
    let tmp = TempDir::new().expect("tmp");
    let sink = FlatFileSink::new(tmp.path(), tmp.path().join("members.txt"));

    match sink.read_records() {
        Err(PersistError::Io { path, .. }) => assert_eq!(path, tmp.path()),
        other => panic!("expected io error, got {other:?}"),
    }
}
