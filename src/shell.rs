//! Interactive menu over a [`Catalog`].
//!
//! Reads one answer per line from any [`BufRead`] and prints to any
//! [`Write`], so sessions can be scripted. Catalog errors are printed and the
//! menu continues; only console I/O errors end the loop early. End of input
//! behaves like choosing Exit.

use std::io::{self, BufRead, Write};

use crate::{
    catalog::{Catalog, CatalogError},
    core::store::StoreError,
    events::CatalogEvent,
    persist::CatalogSink,
    record::{Book, Member},
    types::{SearchField, SortKey},
};

const MENU: &str = "\n===== Library Catalog =====
1. Add Book
2. Add Member
3. Issue Book
4. Return Book
5. Search Books
6. Sort Books
7. Show All Books
8. Show All Members
9. Exit";

const SEPARATOR: &str = "-------";

/// Prints the detail block for one book.
pub fn write_book(out: &mut impl Write, book: &Book) -> io::Result<()> {
    writeln!(out, "ID: {}", book.id)?;
    writeln!(out, "Title: {}", book.title)?;
    writeln!(out, "Author: {}", book.author)?;
    writeln!(out, "Category: {}", book.category)?;
    writeln!(out, "Issued: {}", if book.is_issued { "Yes" } else { "No" })
}

/// Prints the detail block for one member.
pub fn write_member(out: &mut impl Write, member: &Member) -> io::Result<()> {
    writeln!(out, "Member ID: {}", member.id)?;
    writeln!(out, "Name: {}", member.name)?;
    writeln!(out, "Email: {}", member.email)?;
    if member.issued_books.is_empty() {
        writeln!(out, "Issued Books: None")
    } else {
        let ids: Vec<String> = member.issued_books.iter().map(u64::to_string).collect();
        writeln!(out, "Issued Books: {}", ids.join(" "))
    }
}

/// Prints books separated by divider lines.
pub fn write_book_list<'a>(out: &mut impl Write, books: impl IntoIterator<Item = &'a Book>) -> io::Result<()> {
    for book in books {
        writeln!(out, "{SEPARATOR}")?;
        write_book(out, book)?;
    }
    Ok(())
}

/// Menu loop state: the console streams.
pub struct Shell<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Wraps console streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the shell, returning the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the menu until Exit or end of input, then saves the catalog.
    pub fn run<S: CatalogSink>(&mut self, catalog: &mut Catalog<S>) -> io::Result<()> {
        loop {
            writeln!(self.output, "{MENU}")?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return self.exit(catalog);
            };

            match choice.parse::<u32>() {
                Ok(1) => self.add_book(catalog)?,
                Ok(2) => self.add_member(catalog)?,
                Ok(3) => self.issue_book(catalog)?,
                Ok(4) => self.return_book(catalog)?,
                Ok(5) => self.search_books(catalog)?,
                Ok(6) => self.sort_books(catalog)?,
                Ok(7) => self.show_books(catalog)?,
                Ok(8) => self.show_members(catalog)?,
                Ok(9) => return self.exit(catalog),
                Ok(_) => writeln!(self.output, "Invalid choice. Try again.")?,
                Err(_) => writeln!(self.output, "Invalid input. Enter numeric choice.")?,
            }
        }
    }

    fn add_book<S: CatalogSink>(&mut self, catalog: &mut Catalog<S>) -> io::Result<()> {
        let Some(title) = self.prompt("Enter Book Title: ")? else { return Ok(()) };
        let Some(author) = self.prompt("Enter Author: ")? else { return Ok(()) };
        let Some(category) = self.prompt("Enter Category: ")? else { return Ok(()) };

        match catalog.add_book(&title, &author, &category) {
            Ok(id) => writeln!(self.output, "{}", CatalogEvent::BookAdded { id }),
            Err(err) => self.report(&err),
        }
    }

    fn add_member<S: CatalogSink>(&mut self, catalog: &mut Catalog<S>) -> io::Result<()> {
        let Some(name) = self.prompt("Enter Member Name: ")? else { return Ok(()) };
        let Some(email) = self.prompt("Enter Email: ")? else { return Ok(()) };

        match catalog.add_member(&name, &email) {
            Ok(id) => writeln!(self.output, "{}", CatalogEvent::MemberAdded { id }),
            Err(err) => self.report(&err),
        }
    }

    fn issue_book<S: CatalogSink>(&mut self, catalog: &mut Catalog<S>) -> io::Result<()> {
        let Some(member_id) = self.prompt_id("Enter Member ID: ")? else { return Ok(()) };
        if catalog.store().member(member_id).is_none() {
            return self.report(&StoreError::MemberNotFound(member_id).into());
        }
        let Some(book_id) = self.prompt_id("Enter Book ID to issue: ")? else { return Ok(()) };

        match catalog.issue_book(member_id, book_id) {
            Ok(event) => writeln!(self.output, "{event}"),
            Err(err) => self.report(&err),
        }
    }

    fn return_book<S: CatalogSink>(&mut self, catalog: &mut Catalog<S>) -> io::Result<()> {
        let Some(member_id) = self.prompt_id("Enter Member ID: ")? else { return Ok(()) };
        if catalog.store().member(member_id).is_none() {
            return self.report(&StoreError::MemberNotFound(member_id).into());
        }
        let Some(book_id) = self.prompt_id("Enter Book ID to return: ")? else { return Ok(()) };

        match catalog.return_book(member_id, book_id) {
            Ok(event) => writeln!(self.output, "{event}"),
            Err(err) => self.report(&err),
        }
    }

    fn search_books<S: CatalogSink>(&mut self, catalog: &Catalog<S>) -> io::Result<()> {
        writeln!(self.output, "Search by: 1) Title  2) Author  3) Category")?;
        let Some(choice) = self.prompt("Choice: ")? else { return Ok(()) };
        let (field, label) = match choice.as_str() {
            "1" => (SearchField::Title, "Enter title keyword: "),
            "2" => (SearchField::Author, "Enter author keyword: "),
            "3" => (SearchField::Category, "Enter category: "),
            _ => return writeln!(self.output, "Invalid choice."),
        };
        let Some(keyword) = self.prompt(label)? else { return Ok(()) };

        let found = catalog.store().search(field, &keyword);
        if found.is_empty() {
            writeln!(self.output, "No books found.")
        } else {
            writeln!(self.output, "Found {} books:", found.len())?;
            write_book_list(&mut self.output, found)
        }
    }

    fn sort_books<S: CatalogSink>(&mut self, catalog: &Catalog<S>) -> io::Result<()> {
        writeln!(self.output, "Sort by: 1) Title (default) 2) Author 3) Category")?;
        let Some(choice) = self.prompt("Choice: ")? else { return Ok(()) };
        let key = match choice.as_str() {
            "2" => SortKey::Author,
            "3" => SortKey::Category,
            _ => SortKey::Title,
        };

        writeln!(self.output, "Sorted books:")?;
        write_book_list(&mut self.output, catalog.store().sorted_books(key))
    }

    fn show_books<S: CatalogSink>(&mut self, catalog: &Catalog<S>) -> io::Result<()> {
        let store = catalog.store();
        if store.book_count() == 0 {
            return writeln!(self.output, "No books in library.");
        }
        writeln!(self.output, "All books:")?;
        write_book_list(&mut self.output, store.books())
    }

    fn show_members<S: CatalogSink>(&mut self, catalog: &Catalog<S>) -> io::Result<()> {
        let store = catalog.store();
        if store.member_count() == 0 {
            return writeln!(self.output, "No members registered.");
        }
        writeln!(self.output, "All members:")?;
        for member in store.members() {
            writeln!(self.output, "{SEPARATOR}")?;
            write_member(&mut self.output, member)?;
        }
        Ok(())
    }

    fn exit<S: CatalogSink>(&mut self, catalog: &mut Catalog<S>) -> io::Result<()> {
        writeln!(self.output, "Saving data and exiting...")?;
        match catalog.save() {
            Ok(()) => writeln!(self.output, "Saved. Bye!"),
            Err(err) => writeln!(self.output, "Error saving data: {err}"),
        }
    }

    fn report(&mut self, err: &CatalogError) -> io::Result<()> {
        match err {
            CatalogError::Store(StoreError::Validation(reason)) => {
                writeln!(self.output, "Invalid input: {reason}. Nothing added.")
            }
            CatalogError::Store(StoreError::MemberNotFound(_)) => writeln!(self.output, "Member not found."),
            CatalogError::Store(StoreError::BookNotFound(_)) => writeln!(self.output, "Book not found."),
            CatalogError::Store(StoreError::AlreadyIssued(_)) => writeln!(self.output, "Book already issued."),
            CatalogError::Store(StoreError::NotIssuedToMember { .. }) => {
                writeln!(self.output, "This member doesn't have that book issued.")
            }
            CatalogError::Store(err @ StoreError::IdsExhausted { .. }) => {
                writeln!(self.output, "Cannot add: {err}. Nothing added.")
            }
            CatalogError::Unsaved { event, source } => {
                writeln!(self.output, "{event}")?;
                writeln!(self.output, "Warning: change kept in memory but not saved: {source}")
            }
            CatalogError::Persist(source) => writeln!(self.output, "Storage error: {source}"),
        }
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_id(&mut self, label: &str) -> io::Result<Option<u64>> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };
        match raw.parse::<u64>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                writeln!(self.output, "Invalid ID - must be numeric.")?;
                Ok(None)
            }
        }
    }
}
