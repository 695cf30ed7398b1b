//! Unicode-safe helpers for working with UTF-8 strings.

use unicode_width::UnicodeWidthStr;

/// Convert a character index (0-based) to a byte index in the given string.
/// If `n` exceeds the number of characters, returns `s.len()`.
pub fn char_to_byte_index(s: &str, n: usize) -> usize {
    match s.char_indices().nth(n) {
        Some((i, _)) => i,
        None => s.len(),
    }
}

/// Row and column (both in characters) of character index `n`.
pub fn line_col(s: &str, n: usize) -> (usize, usize) {
    let mut row = 0;
    let mut col = 0;
    for c in s.chars().take(n) {
        if c == '\n' {
            row += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (row, col)
}

/// Character index of (`row`, `col`), clamping `col` to the line length and
/// `row` to the last line.
pub fn index_of(s: &str, row: usize, col: usize) -> usize {
    let mut index = 0;
    for (i, line) in s.split('\n').enumerate() {
        let len = line.chars().count();
        if i == row {
            return index + col.min(len);
        }
        index += len + 1;
    }
    s.chars().count()
}

/// Terminal columns taken by the first `col` characters of `line`.
pub fn display_width(line: &str, col: usize) -> usize {
    let end = char_to_byte_index(line, col);
    UnicodeWidthStr::width(&line[..end])
}
