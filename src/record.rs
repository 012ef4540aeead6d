//! Book and member records, insert drafts, and email validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{BookId, MemberId};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.\-]+@[A-Za-z0-9_.\-]+\.[A-Za-z]{2,}$").expect("email pattern compiles")
});

/// Returns true when `email` has the `local@domain.tld` shape accepted for members.
///
/// Local part and domain are ASCII word characters, dots and hyphens; the
/// suffix after the last dot is at least two letters.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Fully materialized book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Stable book identifier.
    pub id: BookId,
    /// Title text.
    pub title: String,
    /// Author text.
    pub author: String,
    /// Free-text category.
    pub category: String,
    /// True while the book is out with a member.
    pub is_issued: bool,
}

impl Book {
    pub(crate) fn mark_issued(&mut self) {
        self.is_issued = true;
    }

    pub(crate) fn mark_returned(&mut self) {
        self.is_issued = false;
    }
}

/// Fully materialized member record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Stable member identifier.
    pub id: MemberId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Books currently held, in the order they were issued.
    pub issued_books: Vec<BookId>,
}

impl Member {
    /// Returns true when `book_id` is in this member's issued set.
    pub fn holds(&self, book_id: BookId) -> bool {
        self.issued_books.contains(&book_id)
    }

    /// Inserts `book_id` unless already present.
    pub(crate) fn add_issued(&mut self, book_id: BookId) {
        if !self.holds(book_id) {
            self.issued_books.push(book_id);
        }
    }

    /// Removes the first occurrence of `book_id`.
    pub(crate) fn remove_issued(&mut self, book_id: BookId) {
        if let Some(pos) = self.issued_books.iter().position(|id| *id == book_id) {
            self.issued_books.remove(pos);
        }
    }
}

/// Insert payload used to create a new [`Book`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    /// Title text.
    pub title: String,
    /// Author text.
    pub author: String,
    /// Free-text category.
    pub category: String,
}

impl BookDraft {
    /// Builds a draft from borrowed field values.
    pub fn new(title: impl Into<String>, author: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            category: category.into(),
        }
    }
}

/// Insert payload used to create a new [`Member`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDraft {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
}

impl MemberDraft {
    /// Builds a draft from borrowed field values.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}
