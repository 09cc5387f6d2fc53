//! Position-tracked code point scanner.
//!
//! Both the markup parser and the selector parser consume their input one code
//! point at a time and occasionally need to "reconsume" the character they just
//! read. The scanner supports exactly one step of pushback: unreading twice in a
//! row would require remembering more than one previous position, so it is an
//! error instead.

use std::fmt;
use std::str::Chars;

use thiserror::Error;

/// A line/column location in the input.
///
/// Lines start at 1. The column is the number of code points consumed on the
/// current line, so it is 0 at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// Code points consumed on the current line.
    pub column: usize,
}

impl Position {
    /// The position before anything has been read.
    pub const START: Self = Self { line: 1, column: 0 };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors raised by [`Scanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScanError {
    /// `unread_one` was called twice without a `read_one` in between, or before
    /// anything was read.
    #[error("cannot unread at {position}: would lose position information")]
    WouldLosePosition {
        /// Where the scanner was when the unread was attempted.
        position: Position,
    },
}

/// A code point reader with single-step pushback and position bookkeeping.
pub struct Scanner<I: Iterator<Item = char>> {
    chars: I,
    /// Result of the most recent read, replayed by the next read after an unread.
    last: Option<Option<char>>,
    pushed_back: bool,
    position: Position,
    previous: Position,
    /// The end of input has already been counted as a line boundary.
    eof_counted: bool,
}

impl<'a> Scanner<Chars<'a>> {
    /// Create a scanner over a string slice.
    #[must_use]
    pub fn from_text(input: &'a str) -> Self {
        Self::new(input.chars())
    }
}

impl<I: Iterator<Item = char>> Scanner<I> {
    /// Create a scanner over any code point iterator.
    pub const fn new(chars: I) -> Self {
        Self {
            chars,
            last: None,
            pushed_back: false,
            position: Position::START,
            previous: Position::START,
            eof_counted: false,
        }
    }

    /// Read the next code point, or `None` at the end of input.
    ///
    /// Reading past the end keeps returning `None`.
    pub fn read_one(&mut self) -> Option<char> {
        let next = if self.pushed_back {
            self.pushed_back = false;
            self.last.flatten()
        } else if self.eof_counted {
            None
        } else {
            self.chars.next()
        };

        self.previous = self.position;
        self.advance(next);
        self.last = Some(next);
        next
    }

    /// Push the most recently read code point back so the next
    /// [`read_one`](Self::read_one) returns it again.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::WouldLosePosition`] if nothing has been read since
    /// the last unread (or since the scanner was created).
    pub fn unread_one(&mut self) -> Result<(), ScanError> {
        if self.pushed_back || self.last.is_none() {
            return Err(ScanError::WouldLosePosition {
                position: self.position,
            });
        }
        if self.last == Some(None) {
            self.eof_counted = false;
        }
        self.pushed_back = true;
        self.position = self.previous;
        Ok(())
    }

    /// The current position, i.e. just after the last code point read.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    fn advance(&mut self, read: Option<char>) {
        match read {
            Some('\n') => {
                self.position.line += 1;
                self.position.column = 0;
            }
            Some(_) => self.position.column += 1,
            None if !self.eof_counted => {
                self.eof_counted = true;
                self.position.line += 1;
                self.position.column = 0;
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_tracks_lines_and_columns() {
        let mut scanner = Scanner::from_text("ab\nc");
        assert_eq!(scanner.read_one(), Some('a'));
        assert_eq!(scanner.read_one(), Some('b'));
        assert_eq!(scanner.position(), Position { line: 1, column: 2 });
        assert_eq!(scanner.read_one(), Some('\n'));
        assert_eq!(scanner.position(), Position { line: 2, column: 0 });
        assert_eq!(scanner.read_one(), Some('c'));
        assert_eq!(scanner.position(), Position { line: 2, column: 1 });
    }

    #[test]
    fn test_end_of_input_is_a_line_boundary_once() {
        let mut scanner = Scanner::from_text("x");
        assert_eq!(scanner.read_one(), Some('x'));
        assert_eq!(scanner.read_one(), None);
        assert_eq!(scanner.position(), Position { line: 2, column: 0 });
        assert_eq!(scanner.read_one(), None);
        assert_eq!(scanner.position(), Position { line: 2, column: 0 });
    }

    #[test]
    fn test_unread_replays_and_restores_position() {
        let mut scanner = Scanner::from_text("a\nb");
        let _ = scanner.read_one();
        assert_eq!(scanner.read_one(), Some('\n'));
        scanner.unread_one().unwrap();
        assert_eq!(scanner.position(), Position { line: 1, column: 1 });
        assert_eq!(scanner.read_one(), Some('\n'));
        assert_eq!(scanner.read_one(), Some('b'));
    }

    #[test]
    fn test_unread_end_of_input() {
        let mut scanner = Scanner::from_text("");
        assert_eq!(scanner.read_one(), None);
        scanner.unread_one().unwrap();
        assert_eq!(scanner.position(), Position::START);
        assert_eq!(scanner.read_one(), None);
        assert_eq!(scanner.position(), Position { line: 2, column: 0 });
    }

    #[test]
    fn test_double_unread_fails() {
        let mut scanner = Scanner::from_text("ab");
        let _ = scanner.read_one();
        scanner.unread_one().unwrap();
        let err = scanner.unread_one().unwrap_err();
        assert!(err.to_string().contains("would lose position information"));
    }

    #[test]
    fn test_unread_before_read_fails() {
        let mut scanner = Scanner::from_text("ab");
        assert!(matches!(
            scanner.unread_one(),
            Err(ScanError::WouldLosePosition { .. })
        ));
    }
}
