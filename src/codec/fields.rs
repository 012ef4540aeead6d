/// Field delimiter within a record line.
pub const DELIMITER: char = '|';
/// Escape introducer.
pub const ESCAPE: char = '\\';

/// Escapes a text field so it contains no bare delimiter or line break.
pub fn escape_field(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            ESCAPE => out.push_str("\\\\"),
            DELIMITER => out.push_str("\\|"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

/// Splits `line` on unescaped delimiters, unescaping each field in the same pass.
///
/// The result always holds at least `expected` fields; missing trailing fields
/// are empty strings. A dangling escape at end of line is dropped.
pub fn split_fields(line: &str, expected: usize) -> Vec<String> {
    let mut fields = Vec::with_capacity(expected);
    let mut current = String::new();
    let mut escape_pending = false;

    for ch in line.chars() {
        if escape_pending {
            current.push(match ch {
                'n' => '\n',
                'r' => '\r',
                other => other,
            });
            escape_pending = false;
        } else if ch == ESCAPE {
            escape_pending = true;
        } else if ch == DELIMITER {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);

    while fields.len() < expected {
        fields.push(String::new());
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaped_delimiter_stays_inside_field() {
        let fields = split_fields(r"1|a\|b|c", 3);
        assert_eq!(fields, vec!["1", "a|b", "c"]);
    }

    #[test]
    fn escaped_backslash_before_delimiter_still_splits() {
        let fields = split_fields(r"x\\|y", 2);
        assert_eq!(fields, vec!["x\\", "y"]);
    }

    #[test]
    fn missing_trailing_fields_are_padded() {
        assert_eq!(split_fields("abc|bad", 5), vec!["abc", "bad", "", "", ""]);
        assert_eq!(split_fields("", 2), vec!["", ""]);
    }

    #[test]
    fn line_breaks_escape_to_letters() {
        assert_eq!(escape_field("a\nb\r|\\"), r"a\nb\r\|\\");
        assert_eq!(split_fields(r"a\nb\r", 1), vec!["a\nb\r"]);
    }

    #[test]
    fn dangling_escape_is_dropped() {
        assert_eq!(split_fields("abc\\", 1), vec!["abc"]);
    }
}
