use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::{
    events::CatalogEvent,
    record::{Book, BookDraft, Member, MemberDraft, is_valid_email},
    types::{BookId, FIRST_BOOK_ID, FIRST_MEMBER_ID, MemberId, SearchField, SortKey},
};

use super::indices::OrderedMap;

/// Rejected input for an add operation. Nothing is mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field is empty after trimming.
    #[error("{field} is required")]
    BlankField {
        /// Name of the blank field.
        field: &'static str,
    },
    /// The email does not match `local@domain.tld`.
    #[error("invalid email format: {0:?}")]
    InvalidEmail(String),
}

/// Failure of a store operation. Every variant leaves the store unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No book has this id.
    #[error("book {0} not found")]
    BookNotFound(BookId),
    /// No member has this id.
    #[error("member {0} not found")]
    MemberNotFound(MemberId),
    /// The book is already flagged as issued.
    #[error("book {0} is already issued")]
    AlreadyIssued(BookId),
    /// The member does not hold the book.
    #[error("member {member} does not have book {book} issued")]
    NotIssuedToMember {
        /// Member attempting the return.
        member: MemberId,
        /// Book being returned.
        book: BookId,
    },
    /// The id counter has no unused id left to hand out.
    #[error("no {kind} ids left")]
    IdsExhausted {
        /// `"book"` or `"member"`.
        kind: &'static str,
    },
}

/// Issued-state disagreement between books and members found by
/// [`CatalogStore::check_consistency`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Inconsistency {
    /// Book flagged issued but no member holds it.
    IssuedWithoutHolder {
        /// Affected book.
        book: BookId,
    },
    /// Member holds a book that is not flagged issued.
    HeldButAvailable {
        /// Affected book.
        book: BookId,
        /// Holding member.
        member: MemberId,
    },
    /// More than one member holds the same book.
    MultipleHolders {
        /// Affected book.
        book: BookId,
        /// All holders, in member order.
        members: Vec<MemberId>,
    },
    /// Member holds an id that names no book.
    UnknownBook {
        /// Holding member.
        member: MemberId,
        /// Dangling book id.
        book: BookId,
    },
}

/// Serializable copy of the whole catalog, records in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// All books.
    pub books: Vec<Book>,
    /// All members.
    pub members: Vec<Member>,
}

/// In-memory catalog of books and members.
///
/// Owns the id counters and enforces the issue/return pairing: a book's
/// issued flag and the holding member's issued set always change together.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    books: OrderedMap<BookId, Book>,
    members: OrderedMap<MemberId, Member>,
    categories: HashSet<String>,
    next_book_id: BookId,
    next_member_id: MemberId,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    /// Creates an empty store with counters at their initial values.
    pub fn new() -> Self {
        Self {
            books: OrderedMap::default(),
            members: OrderedMap::default(),
            categories: HashSet::new(),
            next_book_id: FIRST_BOOK_ID,
            next_member_id: FIRST_MEMBER_ID,
        }
    }

    /// Installs a book read from storage without validation.
    ///
    /// Raises the book counter above `book.id` and records its category.
    /// Returns the record it replaced when the id was already present.
    pub fn restore_book(&mut self, book: Book) -> Option<Book> {
        self.next_book_id = self.next_book_id.max(book.id.saturating_add(1));
        self.categories.insert(book.category.clone());
        self.books.insert(book.id, book)
    }

    /// Installs a member read from storage without validation.
    ///
    /// Raises the member counter above `member.id`. Returns the record it
    /// replaced when the id was already present.
    pub fn restore_member(&mut self, member: Member) -> Option<Member> {
        self.next_member_id = self.next_member_id.max(member.id.saturating_add(1));
        self.members.insert(member.id, member)
    }

    /// Adds an unissued book with trimmed fields and returns its new id.
    pub fn add_book(&mut self, draft: BookDraft) -> Result<(BookId, CatalogEvent), StoreError> {
        let title = required("title", &draft.title)?;
        let author = required("author", &draft.author)?;
        let category = required("category", &draft.category)?;

        let (id, next) = allocate("book", self.next_book_id)?;
        self.next_book_id = next;

        self.categories.insert(category.to_string());
        self.books.insert(
            id,
            Book {
                id,
                title: title.to_string(),
                author: author.to_string(),
                category: category.to_string(),
                is_issued: false,
            },
        );
        Ok((id, CatalogEvent::BookAdded { id }))
    }

    /// Registers a member with an empty issued set and returns its new id.
    pub fn add_member(&mut self, draft: MemberDraft) -> Result<(MemberId, CatalogEvent), StoreError> {
        let name = required("name", &draft.name)?;
        let email = required("email", &draft.email)?;
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail(email.to_string()).into());
        }

        let (id, next) = allocate("member", self.next_member_id)?;
        self.next_member_id = next;

        self.members.insert(
            id,
            Member {
                id,
                name: name.to_string(),
                email: email.to_string(),
                issued_books: Vec::new(),
            },
        );
        Ok((id, CatalogEvent::MemberAdded { id }))
    }

    /// Issues `book_id` to `member_id`.
    ///
    /// Only the book's own flag decides availability; other members' issued
    /// sets are not consulted.
    pub fn issue_book(&mut self, member_id: MemberId, book_id: BookId) -> Result<CatalogEvent, StoreError> {
        if !self.members.contains_key(&member_id) {
            return Err(StoreError::MemberNotFound(member_id));
        }
        let book = self
            .books
            .get_mut(&book_id)
            .ok_or(StoreError::BookNotFound(book_id))?;
        if book.is_issued {
            return Err(StoreError::AlreadyIssued(book_id));
        }

        book.mark_issued();
        if let Some(member) = self.members.get_mut(&member_id) {
            member.add_issued(book_id);
        }
        Ok(CatalogEvent::BookIssued {
            book: book_id,
            member: member_id,
        })
    }

    /// Returns `book_id` from `member_id`.
    ///
    /// Fails unless the member's own issued set contains the book, whatever
    /// the book's flag says.
    pub fn return_book(&mut self, member_id: MemberId, book_id: BookId) -> Result<CatalogEvent, StoreError> {
        let member = self
            .members
            .get_mut(&member_id)
            .ok_or(StoreError::MemberNotFound(member_id))?;
        let book = self
            .books
            .get_mut(&book_id)
            .ok_or(StoreError::BookNotFound(book_id))?;
        if !member.holds(book_id) {
            return Err(StoreError::NotIssuedToMember {
                member: member_id,
                book: book_id,
            });
        }

        book.mark_returned();
        member.remove_issued(book_id);
        Ok(CatalogEvent::BookReturned {
            book: book_id,
            member: member_id,
        })
    }

    /// Books whose `field` contains `keyword`, ignoring case, in store order.
    pub fn search(&self, field: SearchField, keyword: &str) -> Vec<&Book> {
        let needle = keyword.to_lowercase();
        self.books
            .values()
            .filter(|book| search_text(book, field).to_lowercase().contains(&needle))
            .collect()
    }

    /// Books whose title contains `keyword`, ignoring case.
    pub fn search_by_title(&self, keyword: &str) -> Vec<&Book> {
        self.search(SearchField::Title, keyword)
    }

    /// Books whose author contains `keyword`, ignoring case.
    pub fn search_by_author(&self, keyword: &str) -> Vec<&Book> {
        self.search(SearchField::Author, keyword)
    }

    /// Books whose category contains `keyword`, ignoring case.
    pub fn search_by_category(&self, keyword: &str) -> Vec<&Book> {
        self.search(SearchField::Category, keyword)
    }

    /// All books ordered by `key` ignoring case; ties keep store order.
    pub fn sorted_books(&self, key: SortKey) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.books.values().collect();
        books.sort_by_cached_key(|book| sort_text(book, key).to_lowercase());
        books
    }

    /// Audits issued state across books and members without changing anything.
    pub fn check_consistency(&self) -> Vec<Inconsistency> {
        let mut holders: HashMap<BookId, Vec<MemberId>> = HashMap::new();
        let mut found = Vec::new();

        for member in self.members.values() {
            for book_id in &member.issued_books {
                if self.books.contains_key(book_id) {
                    let members = holders.entry(*book_id).or_default();
                    if members.last() != Some(&member.id) {
                        members.push(member.id);
                    }
                } else {
                    found.push(Inconsistency::UnknownBook {
                        member: member.id,
                        book: *book_id,
                    });
                }
            }
        }

        for book in self.books.values() {
            match holders.get(&book.id).map(Vec::as_slice) {
                None | Some([]) => {
                    if book.is_issued {
                        found.push(Inconsistency::IssuedWithoutHolder { book: book.id });
                    }
                }
                Some(members) => {
                    if members.len() > 1 {
                        found.push(Inconsistency::MultipleHolders {
                            book: book.id,
                            members: members.to_vec(),
                        });
                    }
                    if !book.is_issued {
                        for member in members {
                            found.push(Inconsistency::HeldButAvailable {
                                book: book.id,
                                member: *member,
                            });
                        }
                    }
                }
            }
        }

        found
    }

    /// Looks up a book.
    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.books.get(&id)
    }

    /// Looks up a member.
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.get(&id)
    }

    /// All books in store order.
    pub fn books(&self) -> impl Iterator<Item = &Book> + '_ {
        self.books.values()
    }

    /// All members in store order.
    pub fn members(&self) -> impl Iterator<Item = &Member> + '_ {
        self.members.values()
    }

    /// Number of books.
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Number of members.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Distinct categories seen on added or loaded books, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.categories.iter().map(String::as_str).collect();
        out.sort_unstable();
        out
    }

    /// Id the next added book will receive.
    pub fn next_book_id(&self) -> BookId {
        self.next_book_id
    }

    /// Id the next added member will receive.
    pub fn next_member_id(&self) -> MemberId {
        self.next_member_id
    }

    /// Copies every record out in store order.
    pub fn export_snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            books: self.books.values().cloned().collect(),
            members: self.members.values().cloned().collect(),
        }
    }
}

// A counter saturated at `u64::MAX` may name a loaded record, so the last id
// is never handed out.
fn allocate(kind: &'static str, next: u64) -> Result<(u64, u64), StoreError> {
    let after = next.checked_add(1).ok_or(StoreError::IdsExhausted { kind })?;
    Ok((next, after))
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField { field });
    }
    Ok(trimmed)
}

fn search_text(book: &Book, field: SearchField) -> &str {
    match field {
        SearchField::Title => book.title.as_str(),
        SearchField::Author => book.author.as_str(),
        SearchField::Category => book.category.as_str(),
    }
}

fn sort_text(book: &Book, key: SortKey) -> &str {
    match key {
        SortKey::Title => book.title.as_str(),
        SortKey::Author => book.author.as_str(),
        SortKey::Category => book.category.as_str(),
    }
}
