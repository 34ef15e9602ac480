//! Delimiter-aware scanning over a rope
//!
//! Finds the word under a cursor and, when it is a call like `name(...)`,
//! the parenthesised argument that goes with it. Matching walks one
//! character at a time across lines with a nesting depth and a quote state,
//! so parentheses inside string literals are ignored.

use std::fmt;

use ropey::Rope;

use crate::util::text::{line_chars, word_bounds};

/// A 0-indexed line/column position (columns count chars)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Char offset in `rope`, clamped to the buffer
    pub fn char_index(&self, rope: &Rope) -> usize {
        let line = self.line.min(rope.len_lines().saturating_sub(1));
        (rope.line_to_char(line) + self.column).min(rope.len_chars())
    }
}

/// Half-open range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn char_range(&self, rope: &Rope) -> std::ops::Range<usize> {
        let start = self.start.char_index(rope);
        let end = self.end.char_index(rope).max(start);
        start..end
    }

    pub fn text(&self, rope: &Rope) -> String {
        rope.slice(self.char_range(rope)).to_string()
    }
}

/// Why a delimiter could not be matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// Ran off either end of the buffer
    Unterminated,
    /// A string literal was still open at the end of `line`
    UnterminatedString { quote: char, line: usize },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Unterminated => write!(f, "unmatched delimiter: end of file reached"),
            ScanError::UnterminatedString { quote, line } => {
                write!(f, "unterminated string {} on line {}", quote, line + 1)
            }
        }
    }
}

impl std::error::Error for ScanError {}

/// Scan direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Odd number of backslashes right before `column` means escaped
fn is_escaped(line: &[char], column: usize) -> bool {
    line[..column]
        .iter()
        .rev()
        .take_while(|ch| **ch == '\\')
        .count()
        % 2
        == 1
}

/// Find the delimiter matching the one at `start`.
///
/// `open` raises the depth and `close` lowers it, in scan order: scanning
/// backward from a `)` means `open = ')'` and `close = '('`. Returns the
/// position of the matching `close`.
pub fn find_matching(
    rope: &Rope,
    start: Position,
    open: char,
    close: char,
    direction: Direction,
) -> Result<Position, ScanError> {
    let total_lines = rope.len_lines();
    if start.line >= total_lines {
        return Err(ScanError::Unterminated);
    }

    let mut line = start.line;
    let mut chars = line_chars(rope, line);
    if start.column >= chars.len() {
        return Err(ScanError::Unterminated);
    }
    let mut column = start.column as isize;
    let mut depth: isize = 0;
    let mut quote: Option<char> = None;

    loop {
        let col = column as usize;
        let ch = chars[col];
        match quote {
            Some(q) => {
                if ch == q && !is_escaped(&chars, col) {
                    quote = None;
                }
            }
            None => {
                if ch == open {
                    depth += 1;
                } else if ch == close {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Position::new(line, col));
                    }
                } else if (ch == '"' || ch == '\'') && !is_escaped(&chars, col) {
                    quote = Some(ch);
                }
            }
        }

        column += match direction {
            Direction::Forward => 1,
            Direction::Backward => -1,
        };

        // Step over line ends (and empty lines)
        while column < 0 || column >= chars.len() as isize {
            let left = line;
            match direction {
                Direction::Forward => {
                    line += 1;
                    if line >= total_lines {
                        return Err(ScanError::Unterminated);
                    }
                    chars = line_chars(rope, line);
                    column = 0;
                }
                Direction::Backward => {
                    if line == 0 {
                        return Err(ScanError::Unterminated);
                    }
                    line -= 1;
                    chars = line_chars(rope, line);
                    column = chars.len() as isize - 1;
                }
            }
            if let Some(quote) = quote {
                return Err(ScanError::UnterminatedString { quote, line: left });
            }
        }
    }
}

/// From the `(` at `open_at`, the position just past its matching `)`
pub fn match_forward(rope: &Rope, open_at: Position) -> Result<Position, ScanError> {
    let close = find_matching(rope, open_at, '(', ')', Direction::Forward)?;
    Ok(Position::new(close.line, close.column + 1))
}

/// From the `)` at `close_at`, the position of its matching `(`
pub fn match_backward(rope: &Rope, close_at: Position) -> Result<Position, ScanError> {
    find_matching(rope, close_at, ')', '(', Direction::Backward)
}

/// The word at a cursor and its parenthesised argument, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordAndArgument {
    pub word: TextRange,
    /// Includes both parentheses
    pub argument: Option<TextRange>,
}

impl WordAndArgument {
    /// Everything an expansion replaces
    pub fn full_range(&self) -> TextRange {
        match self.argument {
            Some(argument) => TextRange::new(self.word.start, argument.end),
            None => self.word,
        }
    }

    pub fn word_text(&self, rope: &Rope) -> String {
        self.word.text(rope)
    }

    /// Argument text, parentheses included: `f(x, 1)` gives `(x, 1)`
    pub fn argument_text(&self, rope: &Rope) -> Option<String> {
        self.argument.map(|argument| argument.text(rope))
    }
}

/// Locate the word and argument around `cursor`.
///
/// With the cursor right after a `)`, the argument is matched backward and
/// the word is the one right before its `(`. Otherwise the word under the
/// cursor is taken, with a following `(...)` as its argument.
pub fn word_and_argument_at(rope: &Rope, cursor: Position) -> Result<WordAndArgument, ScanError> {
    let chars = line_chars(rope, cursor.line);
    let column = cursor.column.min(chars.len());

    if column > 0 && chars[column - 1] == ')' {
        let close = Position::new(cursor.line, column - 1);
        let open = match_backward(rope, close)?;
        let open_chars = line_chars(rope, open.line);
        let (start, _) = word_bounds(&open_chars, open.column);
        return Ok(WordAndArgument {
            word: TextRange::new(Position::new(open.line, start), open),
            argument: Some(TextRange::new(open, Position::new(cursor.line, column))),
        });
    }

    let (start, end) = word_bounds(&chars, column);
    let word = TextRange::new(
        Position::new(cursor.line, start),
        Position::new(cursor.line, end),
    );
    let argument = if chars.get(end) == Some(&'(') {
        let open = Position::new(cursor.line, end);
        Some(TextRange::new(open, match_forward(rope, open)?))
    } else {
        None
    };

    Ok(WordAndArgument { word, argument })
}
