//! Editor-side input extraction
//!
//! Turns a buffer and a cursor offset into the three inputs of a completion
//! request: the prefix, the enclosing statement, and the statement text up
//! to the cursor.

/// Characters that may appear in a completion prefix
fn is_prefix_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | '"' | '`')
}

/// Extract the identifier fragment immediately before byte offset `offset`.
///
/// Scans backward while characters are in `[A-Za-z0-9_.$"\`]`, so dotted and
/// quoted identifiers (`o.cu`, `"My"."Co`) come back whole.
pub fn prefix_before_cursor(text: &str, offset: usize) -> &str {
    let offset = offset.min(text.len());
    if !text.is_char_boundary(offset) {
        return "";
    }
    let start = text[..offset]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_prefix_char(*c))
        .last()
        .map_or(offset, |(i, _)| i);
    &text[start..offset]
}

/// The paragraph (block of text between blank lines) holding `offset`, and
/// that paragraph up to `offset`.
///
/// A cursor on a blank line has no statement; both slices are empty.
pub fn statement_at_cursor(text: &str, offset: usize) -> (&str, &str) {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let mut start = 0;
    let mut end = text.len();
    let mut pos = 0;
    for line in text.split_inclusive('\n') {
        let line_end = pos + line.len();
        if line.trim().is_empty() {
            if line_end <= offset {
                start = line_end;
            } else if pos > offset {
                end = pos;
                break;
            } else {
                start = offset;
                end = offset;
                break;
            }
        }
        pos = line_end;
    }

    (&text[start..end], &text[start..offset])
}
