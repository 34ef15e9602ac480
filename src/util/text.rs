//! Utility functions for words and lines

use ropey::Rope;

/// Characters that end a word for expansion purposes
///
/// Everything else counts as a word character, so expansion names can use
/// any script.
pub const WORD_BOUNDARY: &[char] = &[
    ' ', '\t', '"', '\'', ';', '[', ']', '{', '}', '(', ')', '#', ':', '/', '\\', ',', '+',
    '=', '!', '?', '%', '^', '|', '&', '*', '~', '`',
];

/// Check if a character is a word boundary
pub fn is_word_boundary(ch: char) -> bool {
    WORD_BOUNDARY.contains(&ch)
}

/// Bounds `(start, end)` of the word touching `column` in `line`.
///
/// When the cursor sits on a boundary character or past the end of the
/// line, the search starts one character to the left, so a cursor right
/// after a word still finds it. A cursor between two boundaries yields an
/// empty span.
pub fn word_bounds(line: &[char], column: usize) -> (usize, usize) {
    let len = line.len();
    let column = column.min(len);

    let mut start = column as isize;
    if column == len || is_word_boundary(line[column]) {
        start -= 1;
    }
    while start >= 0 && !is_word_boundary(line[start as usize]) {
        start -= 1;
    }
    let start = (start + 1) as usize;

    let mut end = column;
    while end < len && !is_word_boundary(line[end]) {
        end += 1;
    }

    (start, end)
}

/// Characters of a line without its line ending. Out-of-range lines are empty.
pub fn line_chars(rope: &Rope, line: usize) -> Vec<char> {
    if line >= rope.len_lines() {
        return Vec::new();
    }
    let mut chars: Vec<char> = rope.line(line).chars().collect();
    while matches!(chars.last(), Some('\n') | Some('\r')) {
        chars.pop();
    }
    chars
}

/// Leading spaces and tabs of a line
pub fn leading_whitespace(line: &[char]) -> String {
    line.iter()
        .take_while(|ch| **ch == ' ' || **ch == '\t')
        .collect()
}
