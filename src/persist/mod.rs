//! Persistence abstraction plus flat-file and in-memory sinks.

/// Two-file flat text sink.
pub mod flatfile;
/// In-memory line buffers, mostly for tests.
pub mod memory;

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::{
    codec::{CodecError, decode_book, decode_member, encode_book, encode_member},
    core::store::CatalogStore,
    record::{Book, Member},
};

/// Storage read or write failure.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// I/O error on a file.
    #[error("{}: {source}", path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Any other sink failure.
    #[error("{0}")]
    Message(String),
}

/// Result alias for sink operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Which record file a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Books file.
    Book,
    /// Members file.
    Member,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Book => f.write_str("book"),
            Self::Member => f.write_str("member"),
        }
    }
}

/// A line that failed to decode and was left out of the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// Source file.
    pub kind: RecordKind,
    /// 1-based line number.
    pub line_no: usize,
    /// Raw line text, lossily decoded.
    pub line: String,
    /// Decode failure.
    pub error: CodecError,
}

/// Everything one read pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedRecords {
    /// Decoded books in file order.
    pub books: Vec<Book>,
    /// Decoded members in file order.
    pub members: Vec<Member>,
    /// Lines that were skipped.
    pub skipped: Vec<SkippedLine>,
}

/// Backing storage for a catalog.
///
/// Reads decode every record independently; writes replace the whole store.
pub trait CatalogSink {
    /// Reads all records. Absent storage reads as empty.
    fn read_records(&self) -> PersistResult<LoadedRecords>;
    /// Replaces stored books and members with the contents of `store`.
    fn write_store(&mut self, store: &CatalogStore) -> PersistResult<()>;
}

/// Decodes `reader` line by line into `out`, skipping blank and malformed lines.
pub(crate) fn read_lines(kind: RecordKind, reader: impl BufRead, out: &mut LoadedRecords) -> io::Result<()> {
    for (idx, raw) in reader.split(b'\n').enumerate() {
        let raw = raw?;
        let line_no = idx + 1;

        let decoded = match std::str::from_utf8(&raw) {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                match kind {
                    RecordKind::Book => decode_book(text).map(|book| out.books.push(book)),
                    RecordKind::Member => decode_member(text).map(|member| out.members.push(member)),
                }
            }
            Err(_) => Err(CodecError::InvalidUtf8),
        };

        if let Err(error) = decoded {
            let line = String::from_utf8_lossy(&raw).trim().to_string();
            tracing::warn!(%kind, line_no, %line, %error, "skipping invalid {kind} line");
            out.skipped.push(SkippedLine {
                kind,
                line_no,
                line,
                error,
            });
        }
    }
    Ok(())
}

/// Writes one encoded book per line.
pub(crate) fn write_book_lines(writer: &mut impl Write, store: &CatalogStore) -> io::Result<()> {
    for book in store.books() {
        writeln!(writer, "{}", encode_book(book))?;
    }
    Ok(())
}

/// Writes one encoded member per line.
pub(crate) fn write_member_lines(writer: &mut impl Write, store: &CatalogStore) -> io::Result<()> {
    for member in store.members() {
        writeln!(writer, "{}", encode_member(member))?;
    }
    Ok(())
}
