//! Pipe-delimited line codec for book and member records.
//!
//! Books encode as `id|title|author|category|flag` and members as
//! `id|name|email|id,id,...`. Text fields escape `\`, `|`, newline and
//! carriage return with a backslash so every record fits on one line.

/// Field escaping and escape-aware splitting.
pub mod fields;
/// Record encoders and decoders.
pub mod line;

pub use line::{decode_book, decode_member, encode_book, encode_member};

/// Failure to decode one record line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The id field is not an unsigned integer.
    #[error("invalid record id {raw:?}")]
    InvalidId {
        /// Id field as it appeared on the line.
        raw: String,
    },
    /// The line bytes are not UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}
