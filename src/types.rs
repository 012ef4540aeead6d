//! Shared primitive IDs and query enums.

use serde::{Deserialize, Serialize};

/// Monotonic book identifier, first assigned value is [`FIRST_BOOK_ID`].
pub type BookId = u64;
/// Monotonic member identifier, first assigned value is [`FIRST_MEMBER_ID`].
pub type MemberId = u64;

/// Initial value of the book id counter.
pub const FIRST_BOOK_ID: BookId = 100;
/// Initial value of the member id counter.
pub const FIRST_MEMBER_ID: MemberId = 1000;

/// Book text field used for keyword search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchField {
    /// Match against the title.
    Title,
    /// Match against the author.
    Author,
    /// Match against the category.
    Category,
}

/// Ordering key for [`crate::core::store::CatalogStore::sorted_books`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    /// Order by title.
    #[default]
    Title,
    /// Order by author.
    Author,
    /// Order by category.
    Category,
}
