//! Store plus sink: every successful mutation is written out immediately.

use crate::{
    core::store::{CatalogStore, Inconsistency, StoreError},
    events::CatalogEvent,
    persist::{CatalogSink, PersistError, SkippedLine},
    record::{BookDraft, MemberDraft},
    types::{BookId, MemberId},
};

/// Failure of a [`Catalog`] operation.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The store rejected the operation; nothing changed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Reading or writing storage failed.
    #[error("storage error: {0}")]
    Persist(#[from] PersistError),
    /// The mutation was applied in memory but could not be saved.
    #[error("{event}, but saving failed: {source}")]
    Unsaved {
        /// Applied mutation.
        event: CatalogEvent,
        /// Save failure.
        #[source]
        source: PersistError,
    },
}

/// Outcome of [`Catalog::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Book lines decoded, duplicate ids included.
    pub books_loaded: usize,
    /// Member lines decoded, duplicate ids included.
    pub members_loaded: usize,
    /// Lines that failed to decode.
    pub skipped: Vec<SkippedLine>,
    /// Issued-state disagreements present after loading.
    pub inconsistencies: Vec<Inconsistency>,
}

/// A [`CatalogStore`] bound to its backing [`CatalogSink`].
pub struct Catalog<S> {
    store: CatalogStore,
    sink: S,
}

impl<S: CatalogSink> Catalog<S> {
    /// Creates an empty catalog over `sink`. Call [`Catalog::load`] next.
    pub fn new(sink: S) -> Self {
        Self {
            store: CatalogStore::new(),
            sink,
        }
    }

    /// Read-only view of the records.
    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Backing sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Backing sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Merges every readable record from the sink into the store.
    ///
    /// Malformed lines are skipped and reported, never fatal. Counters are
    /// raised past the highest loaded ids; loaded records are not altered.
    pub fn load(&mut self) -> Result<LoadReport, CatalogError> {
        let loaded = self.sink.read_records()?;
        let mut report = LoadReport {
            books_loaded: loaded.books.len(),
            members_loaded: loaded.members.len(),
            skipped: loaded.skipped,
            inconsistencies: Vec::new(),
        };

        for book in loaded.books {
            let id = book.id;
            if self.store.restore_book(book).is_some() {
                tracing::warn!(id, "duplicate book id; later line wins");
            }
        }
        for member in loaded.members {
            let id = member.id;
            if self.store.restore_member(member).is_some() {
                tracing::warn!(id, "duplicate member id; later line wins");
            }
        }

        report.inconsistencies = self.store.check_consistency();
        for finding in &report.inconsistencies {
            tracing::warn!(?finding, "inconsistent issued state");
        }

        tracing::info!(
            books = report.books_loaded,
            members = report.members_loaded,
            skipped = report.skipped.len(),
            "catalog loaded"
        );
        Ok(report)
    }

    /// Writes the whole store to the sink.
    pub fn save(&mut self) -> Result<(), CatalogError> {
        self.sink.write_store(&self.store)?;
        tracing::info!(
            books = self.store.book_count(),
            members = self.store.member_count(),
            "catalog saved"
        );
        Ok(())
    }

    /// Adds a book and saves. See [`CatalogStore::add_book`].
    pub fn add_book(&mut self, title: &str, author: &str, category: &str) -> Result<BookId, CatalogError> {
        let (id, event) = self.store.add_book(BookDraft::new(title, author, category))?;
        self.persist(event)?;
        Ok(id)
    }

    /// Registers a member and saves. See [`CatalogStore::add_member`].
    pub fn add_member(&mut self, name: &str, email: &str) -> Result<MemberId, CatalogError> {
        let (id, event) = self.store.add_member(MemberDraft::new(name, email))?;
        self.persist(event)?;
        Ok(id)
    }

    /// Issues a book and saves. See [`CatalogStore::issue_book`].
    pub fn issue_book(&mut self, member_id: MemberId, book_id: BookId) -> Result<CatalogEvent, CatalogError> {
        let event = self.store.issue_book(member_id, book_id)?;
        self.persist(event)?;
        Ok(event)
    }

    /// Returns a book and saves. See [`CatalogStore::return_book`].
    pub fn return_book(&mut self, member_id: MemberId, book_id: BookId) -> Result<CatalogEvent, CatalogError> {
        let event = self.store.return_book(member_id, book_id)?;
        self.persist(event)?;
        Ok(event)
    }

    fn persist(&mut self, event: CatalogEvent) -> Result<(), CatalogError> {
        tracing::debug!(?event, "applied");
        self.sink
            .write_store(&self.store)
            .map_err(|source| CatalogError::Unsaved { event, source })
    }
}
