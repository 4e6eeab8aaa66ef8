//! A1-notation range algebra: column letter⇄index conversion, range parsing,
//! and sheet-name quoting/escaping.
//!
//! Column letters form a bijective base-26 numeral system (A=1 … Z=26, no
//! zero digit); all indices exposed here are zero-based.

use std::error::Error;
use std::fmt;

use crate::grid::GridRange;

/// Errors produced while interpreting A1 text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum A1Error {
    /// Column letter string was empty.
    EmptyColumn,
    /// Column letter string contained a non-letter or overflowed.
    InvalidColumn(String),
    /// Cell reference was not `Letters+Digits+` with a positive row.
    InvalidCell(String),
    /// Range text did not match any recognized `start:end` shape.
    MalformedRange(String),
}

impl fmt::Display for A1Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            A1Error::EmptyColumn => write!(f, "column letters must not be empty"),
            A1Error::InvalidColumn(text) => write!(f, "invalid column letters `{text}`"),
            A1Error::InvalidCell(text) => write!(f, "invalid cell reference `{text}`"),
            A1Error::MalformedRange(text) => write!(f, "malformed A1 range `{text}`"),
        }
    }
}

impl Error for A1Error {}

/// Convert column letters to a zero-based column index (`A` → 0, `AA` → 26).
///
/// Accepts either case; rejects empty and non-letter input.
pub fn column_letter_to_index(letters: &str) -> Result<u32, A1Error> {
    if letters.is_empty() {
        return Err(A1Error::EmptyColumn);
    }
    let mut acc: u32 = 0;
    for byte in letters.bytes() {
        if !byte.is_ascii_alphabetic() {
            return Err(A1Error::InvalidColumn(letters.to_string()));
        }
        let digit = (byte.to_ascii_uppercase() - b'A' + 1) as u32;
        acc = acc
            .checked_mul(26)
            .and_then(|acc| acc.checked_add(digit))
            .ok_or_else(|| A1Error::InvalidColumn(letters.to_string()))?;
    }
    Ok(acc - 1)
}

/// Convert a zero-based column index to letters (`0` → `A`, `26` → `AA`).
pub fn column_index_to_letter(index: u32) -> String {
    let mut n = u64::from(index) + 1;
    let mut buf = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        buf.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    buf.reverse();
    String::from_utf8(buf).expect("only ASCII A-Z")
}

/// Parse a bare `ColRow` cell reference into `(column index, 1-based row)`.
pub fn parse_cell(text: &str) -> Result<(u32, u32), A1Error> {
    let split = text
        .bytes()
        .position(|b| b.is_ascii_digit())
        .ok_or_else(|| A1Error::InvalidCell(text.to_string()))?;
    let (letters, digits) = text.split_at(split);
    if letters.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(A1Error::InvalidCell(text.to_string()));
    }
    let col = column_letter_to_index(letters)
        .map_err(|_| A1Error::InvalidCell(text.to_string()))?;
    let row: u32 = digits
        .parse()
        .map_err(|_| A1Error::InvalidCell(text.to_string()))?;
    if row == 0 {
        return Err(A1Error::InvalidCell(text.to_string()));
    }
    Ok((col, row))
}

/// Parse an A1 range (without sheet prefix) into a [`GridRange`].
///
/// Three shapes are recognized after splitting on `:`:
/// * `E:E` — both sides pure letters, whole-column range;
/// * `1:5` — both sides pure digits, whole-row range;
/// * `A1:C10` — bounded rectangle, half-open on both end axes.
pub fn parse_range(text: &str, sheet_id: i64) -> Result<GridRange, A1Error> {
    let (start, end) = text
        .split_once(':')
        .ok_or_else(|| A1Error::MalformedRange(text.to_string()))?;

    let letters = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphabetic());
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if letters(start) && letters(end) {
        let start_col = column_letter_to_index(start)?;
        let end_col = column_letter_to_index(end)?;
        return Ok(GridRange {
            sheet_id,
            start_row_index: 0,
            end_row_index: None,
            start_column_index: start_col,
            end_column_index: Some(end_col + 1),
        });
    }

    if digits(start) && digits(end) {
        let start_row = parse_row(start, text)?;
        let end_row = parse_row(end, text)?;
        return Ok(GridRange {
            sheet_id,
            start_row_index: start_row - 1,
            end_row_index: Some(end_row),
            start_column_index: 0,
            end_column_index: None,
        });
    }

    let (start_col, start_row) =
        parse_cell(start).map_err(|_| A1Error::MalformedRange(text.to_string()))?;
    let (end_col, end_row) =
        parse_cell(end).map_err(|_| A1Error::MalformedRange(text.to_string()))?;
    Ok(GridRange {
        sheet_id,
        start_row_index: start_row - 1,
        end_row_index: Some(end_row),
        start_column_index: start_col,
        end_column_index: Some(end_col + 1),
    })
}

fn parse_row(digits: &str, range: &str) -> Result<u32, A1Error> {
    let row: u32 = digits
        .parse()
        .map_err(|_| A1Error::MalformedRange(range.to_string()))?;
    if row == 0 {
        return Err(A1Error::MalformedRange(range.to_string()));
    }
    Ok(row)
}

/// Undo shell-level mangling of a raw range string.
///
/// Strips the `\!` escape back down to `!`, then removes one layer of quotes
/// wrapping the *entire* string. A closing quote immediately followed by the
/// sheet separator marks a quoted sheet name, not shell wrapping, and is left
/// in place.
pub fn normalize_range_text(raw: &str) -> String {
    let text = raw.replace("\\!", "!");
    for quote in ['\'', '"'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            let inner = &text[1..text.len() - 1];
            let sheet_close: String = [quote, '!'].iter().collect();
            if !inner.contains(&sheet_close) {
                return inner.to_string();
            }
        }
    }
    text
}

/// Split `Sheet!A1:B2` at the **first** separator only, unquoting the sheet
/// portion. Sheet names may legitimately contain `!` when pre-escaped
/// upstream, so everything after the first separator belongs to the range.
pub fn split_sheet_and_range(text: &str) -> (Option<String>, String) {
    match text.split_once('!') {
        Some((sheet, range)) => (Some(unquote_sheet_name(sheet)), range.to_string()),
        None => (None, text.to_string()),
    }
}

fn unquote_sheet_name(name: &str) -> String {
    if name.len() >= 2 && name.starts_with('\'') && name.ends_with('\'') {
        name[1..name.len() - 1].replace("''", "'")
    } else {
        name.to_string()
    }
}

/// Quote a sheet name for use inside an A1 range string when it contains any
/// character outside `[A-Za-z0-9_]`, doubling embedded quotes.
pub fn format_sheet_name_for_range(name: &str) -> String {
    let plain = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if plain {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_index_roundtrip() {
        for index in 0..1000 {
            let letters = column_index_to_letter(index);
            assert_eq!(column_letter_to_index(&letters), Ok(index), "{letters}");
        }
    }

    #[test]
    fn known_letter_values() {
        assert_eq!(column_letter_to_index("A"), Ok(0));
        assert_eq!(column_letter_to_index("Z"), Ok(25));
        assert_eq!(column_letter_to_index("AA"), Ok(26));
        assert_eq!(column_letter_to_index("AZ"), Ok(51));
        assert_eq!(column_letter_to_index("ba"), Ok(52));
        assert_eq!(column_index_to_letter(27), "AB");
        assert_eq!(column_index_to_letter(701), "ZZ");
        assert_eq!(column_index_to_letter(702), "AAA");
    }

    #[test]
    fn letters_reject_bad_input() {
        assert_eq!(column_letter_to_index(""), Err(A1Error::EmptyColumn));
        assert_eq!(
            column_letter_to_index("A1"),
            Err(A1Error::InvalidColumn("A1".to_string()))
        );
    }

    #[test]
    fn cell_parse() {
        assert_eq!(parse_cell("A1"), Ok((0, 1)));
        assert_eq!(parse_cell("R3"), Ok((17, 3)));
        assert_eq!(parse_cell("AA10"), Ok((26, 10)));
        assert!(parse_cell("A").is_err());
        assert!(parse_cell("12").is_err());
        assert!(parse_cell("A0").is_err());
        assert!(parse_cell("A1B").is_err());
    }

    #[test]
    fn whole_column_range() {
        let range = parse_range("E:E", 0).unwrap();
        assert_eq!(range.start_row_index, 0);
        assert_eq!(range.end_row_index, None);
        assert_eq!(range.start_column_index, 4);
        assert_eq!(range.end_column_index, Some(5));
    }

    #[test]
    fn whole_row_range() {
        let range = parse_range("1:5", 0).unwrap();
        assert_eq!(range.start_row_index, 0);
        assert_eq!(range.end_row_index, Some(5));
        assert_eq!(range.start_column_index, 0);
        assert_eq!(range.end_column_index, None);
    }

    #[test]
    fn bounded_rectangle() {
        let range = parse_range("A1:C10", 2).unwrap();
        assert_eq!(range.sheet_id, 2);
        assert_eq!(range.start_row_index, 0);
        assert_eq!(range.end_row_index, Some(10));
        assert_eq!(range.start_column_index, 0);
        assert_eq!(range.end_column_index, Some(3));
    }

    #[test]
    fn malformed_ranges_are_fatal() {
        for text in ["A1", "A:1", "1:A", "A1:", ":B2", "A0:B2", "A1:B"] {
            assert!(parse_range(text, 0).is_err(), "{text}");
        }
    }

    #[test]
    fn normalize_strips_shell_wrapping() {
        assert_eq!(normalize_range_text("Tasks\\!A1:B2"), "Tasks!A1:B2");
        assert_eq!(normalize_range_text("'Tasks!A1:B2'"), "Tasks!A1:B2");
        assert_eq!(normalize_range_text("\"Tasks!A1:B2\""), "Tasks!A1:B2");
        // Quoted sheet name, not shell wrapping: the closing quote sits
        // directly before the separator.
        assert_eq!(normalize_range_text("'My Tasks'!A1:B2"), "'My Tasks'!A1:B2");
    }

    #[test]
    fn split_at_first_separator_only() {
        assert_eq!(
            split_sheet_and_range("Tasks!A1:B2"),
            (Some("Tasks".to_string()), "A1:B2".to_string())
        );
        assert_eq!(
            split_sheet_and_range("'My Tasks'!A1:B2"),
            (Some("My Tasks".to_string()), "A1:B2".to_string())
        );
        assert_eq!(
            split_sheet_and_range("Oops!Bang!A1"),
            (Some("Oops".to_string()), "Bang!A1".to_string())
        );
        assert_eq!(split_sheet_and_range("A1:B2"), (None, "A1:B2".to_string()));
    }

    #[test]
    fn sheet_name_quoting() {
        assert_eq!(format_sheet_name_for_range("Tasks_2024"), "Tasks_2024");
        assert_eq!(format_sheet_name_for_range("My Tasks"), "'My Tasks'");
        assert_eq!(format_sheet_name_for_range("メールボックス"), "'メールボックス'");
        assert_eq!(format_sheet_name_for_range("It's"), "'It''s'");
        assert_eq!(format_sheet_name_for_range(""), "''");
    }
}
