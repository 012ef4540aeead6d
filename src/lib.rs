//! Library book and member catalog persisted as pipe-delimited flat files.
//!
//! # Examples
//!
//! In-memory usage with [`core::store::CatalogStore`]:
//! ```
//! use libcatalog::{
//!     core::store::{CatalogStore, StoreError},
//!     record::{BookDraft, MemberDraft},
//!     types::SortKey,
//! };
//!
//! let mut store = CatalogStore::new();
//! let (book, _event) = store
//!     .add_book(BookDraft::new("Dune", "Frank Herbert", "SciFi"))
//!     .expect("add book");
//! let (member, _event) = store
//!     .add_member(MemberDraft::new("Alice", "alice@example.com"))
//!     .expect("add member");
//! assert_eq!((book, member), (100, 1000));
//!
//! store.issue_book(member, book).expect("issue");
//! assert_eq!(store.issue_book(member, book), Err(StoreError::AlreadyIssued(book)));
//! assert_eq!(store.sorted_books(SortKey::Title)[0].title, "Dune");
//! ```
//!
//! File-backed usage with [`persist::flatfile::FlatFileSink`]:
//! ```no_run
//! use libcatalog::{catalog::Catalog, persist::flatfile::FlatFileSink};
//!
//! let mut catalog = Catalog::new(FlatFileSink::new("books.txt", "members.txt"));
//! let report = catalog.load().expect("load");
//! println!("skipped {} lines", report.skipped.len());
//! let id = catalog.add_book("Dune", "Frank Herbert", "SciFi").expect("add");
//! println!("added book {id}");
//! ```
#![deny(missing_docs)]

/// Store bound to a sink, saving after every mutation.
pub mod catalog;
/// Pipe-delimited record line codec.
pub mod codec;
/// Catalog file settings.
pub mod config;
/// Core in-memory store and index helpers.
pub mod core;
/// Mutation events.
pub mod events;
/// Persistence abstraction and sinks.
pub mod persist;
/// Book and member records.
pub mod record;
/// Interactive menu shell.
pub mod shell;
/// Shared primitive types and enums.
pub mod types;
