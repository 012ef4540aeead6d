use crate::{
    record::{Book, Member},
    types::{BookId, MemberId},
};

use super::{
    CodecError,
    fields::{escape_field, split_fields},
};

const BOOK_FIELDS: usize = 5;
const MEMBER_FIELDS: usize = 4;

/// Encodes `book` as `id|title|author|category|flag`.
pub fn encode_book(book: &Book) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        book.id,
        escape_field(&book.title),
        escape_field(&book.author),
        escape_field(&book.category),
        if book.is_issued { "1" } else { "0" },
    )
}

/// Decodes one book line. Only a non-numeric id is fatal.
pub fn decode_book(line: &str) -> Result<Book, CodecError> {
    let mut fields = split_fields(line.trim(), BOOK_FIELDS).into_iter();
    let id: BookId = parse_id(fields.next())?;
    let title = fields.next().unwrap_or_default();
    let author = fields.next().unwrap_or_default();
    let category = fields.next().unwrap_or_default();
    let is_issued = fields.next().is_some_and(|flag| flag == "1");

    Ok(Book {
        id,
        title,
        author,
        category,
        is_issued,
    })
}

/// Encodes `member` as `id|name|email|id,id,...`.
pub fn encode_member(member: &Member) -> String {
    let issued = member
        .issued_books
        .iter()
        .map(BookId::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "{}|{}|{}|{}",
        member.id,
        escape_field(&member.name),
        escape_field(&member.email),
        issued,
    )
}

/// Decodes one member line. Unparsable issued-book tokens are discarded.
pub fn decode_member(line: &str) -> Result<Member, CodecError> {
    let mut fields = split_fields(line.trim(), MEMBER_FIELDS).into_iter();
    let id: MemberId = parse_id(fields.next())?;
    let name = fields.next().unwrap_or_default();
    let email = fields.next().unwrap_or_default();
    let issued_books = fields
        .next()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<BookId>().ok())
        .collect();

    Ok(Member {
        id,
        name,
        email,
        issued_books,
    })
}

fn parse_id(field: Option<String>) -> Result<u64, CodecError> {
    let raw = field.unwrap_or_default();
    raw.trim()
        .parse::<u64>()
        .map_err(|_| CodecError::InvalidId { raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_issued_book_line() {
        let book = decode_book("100|Dune|Frank Herbert|SciFi|1").expect("decode");
        assert_eq!(book.id, 100);
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.category, "SciFi");
        assert!(book.is_issued);
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        assert_eq!(
            decode_book("abc|bad"),
            Err(CodecError::InvalidId {
                raw: "abc".to_string()
            })
        );
        assert!(matches!(decode_member("-4|x|y|"), Err(CodecError::InvalidId { .. })));
    }

    #[test]
    fn flag_other_than_one_means_available() {
        assert!(!decode_book("101|T|A|C|yes").expect("decode").is_issued);
        assert!(!decode_book("101|T|A|C").expect("decode").is_issued);
    }

    #[test]
    fn member_issued_list_skips_bad_tokens() {
        let member = decode_member("1000|Ada|ada@example.com| 100 ,,x1, 102,").expect("decode");
        assert_eq!(member.issued_books, vec![100, 102]);
    }

    #[test]
    fn member_without_books_encodes_trailing_delimiter() {
        let member = Member {
            id: 1000,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            issued_books: vec![],
        };
        assert_eq!(encode_member(&member), "1000|Ada|ada@example.com|");
    }
}
