//! Change events produced by successful catalog mutations.

use std::fmt;

use serde::Serialize;

use crate::types::{BookId, MemberId};

/// One applied catalog mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CatalogEvent {
    /// A new book was added.
    BookAdded {
        /// Assigned book id.
        id: BookId,
    },
    /// A new member was registered.
    MemberAdded {
        /// Assigned member id.
        id: MemberId,
    },
    /// A book was issued to a member.
    BookIssued {
        /// Issued book.
        book: BookId,
        /// Receiving member.
        member: MemberId,
    },
    /// A member returned a book.
    BookReturned {
        /// Returned book.
        book: BookId,
        /// Returning member.
        member: MemberId,
    },
}

impl fmt::Display for CatalogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BookAdded { id } => write!(f, "Book added successfully with ID: {id}"),
            Self::MemberAdded { id } => write!(f, "Member added successfully with ID: {id}"),
            Self::BookIssued { book, member } => {
                write!(f, "Book ID {book} issued to Member ID {member}")
            }
            Self::BookReturned { book, member } => {
                write!(f, "Book ID {book} returned by Member ID {member}")
            }
        }
    }
}
