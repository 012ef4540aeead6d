use crate::core::store::CatalogStore;

use super::{
    CatalogSink, LoadedRecords, PersistError, PersistResult, RecordKind, read_lines,
    write_book_lines, write_member_lines,
};

/// [`CatalogSink`] holding both record files as in-memory text.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    books: String,
    members: String,
    fail_writes: bool,
    writes: usize,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink pre-populated with file contents.
    pub fn with_contents(books: impl Into<String>, members: impl Into<String>) -> Self {
        Self {
            books: books.into(),
            members: members.into(),
            ..Self::default()
        }
    }

    /// Makes every subsequent write fail without touching stored text.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Current books text.
    pub fn books_text(&self) -> &str {
        &self.books
    }

    /// Current members text.
    pub fn members_text(&self) -> &str {
        &self.members
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl CatalogSink for MemorySink {
    fn read_records(&self) -> PersistResult<LoadedRecords> {
        let mut out = LoadedRecords::default();
        read_lines(RecordKind::Book, self.books.as_bytes(), &mut out)
            .map_err(|e| PersistError::Message(e.to_string()))?;
        read_lines(RecordKind::Member, self.members.as_bytes(), &mut out)
            .map_err(|e| PersistError::Message(e.to_string()))?;
        Ok(out)
    }

    fn write_store(&mut self, store: &CatalogStore) -> PersistResult<()> {
        if self.fail_writes {
            return Err(PersistError::Message("memory sink writes disabled".to_string()));
        }

        let mut books = Vec::new();
        let mut members = Vec::new();
        write_book_lines(&mut books, store).map_err(|e| PersistError::Message(e.to_string()))?;
        write_member_lines(&mut members, store).map_err(|e| PersistError::Message(e.to_string()))?;

        self.books = String::from_utf8_lossy(&books).into_owned();
        self.members = String::from_utf8_lossy(&members).into_owned();
        self.writes += 1;
        Ok(())
    }
}
