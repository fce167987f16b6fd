//! Character cursor for traversing source code.
//!
//! The cursor owns the current [`Position`] (byte offset, line, column and
//! the source file handle) and hands out cheap position snapshots for token
//! spans. It handles UTF-8 correctly by advancing whole characters.

use std::sync::Arc;

use peanut_util::{Position, SourceFile};

/// A cursor over a source file's characters.
///
/// # Example
///
/// ```
/// use peanut_lex::cursor::Cursor;
/// use peanut_util::SourceFile;
///
/// let file = SourceFile::new("demo.peanut", "var x");
/// let mut cursor = Cursor::new(&file);
/// assert_eq!(cursor.current_char(), Some('v'));
/// cursor.advance();
/// assert_eq!(cursor.current_char(), Some('a'));
/// ```
pub struct Cursor {
    /// The file being traversed
    file: Arc<SourceFile>,
    /// Current position (byte offset, line, column)
    pos: Position,
}

impl Cursor {
    /// Creates a cursor at the start of the file.
    pub fn new(file: &Arc<SourceFile>) -> Self {
        Self {
            file: Arc::clone(file),
            pos: Position::start(file),
        }
    }

    /// Returns the character at the cursor, or `None` at end of input.
    #[inline]
    pub fn current_char(&self) -> Option<char> {
        self.file.content()[self.pos.idx..].chars().next()
    }

    /// Returns the character `offset` characters ahead of the cursor.
    pub fn peek_char(&self, offset: usize) -> Option<char> {
        self.file.content()[self.pos.idx..].chars().nth(offset)
    }

    /// Returns true at end of input.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos.idx >= self.file.content().len()
    }

    /// Moves past the current character.
    pub fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos.advance(ch);
        }
    }

    /// Snapshot of the current position.
    #[inline]
    pub fn position(&self) -> Position {
        self.pos.clone()
    }

    /// The underlying source file.
    #[inline]
    pub fn file(&self) -> &Arc<SourceFile> {
        &self.file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_and_peek() {
        let file = SourceFile::new("t", "ab");
        let mut cursor = Cursor::new(&file);
        assert_eq!(cursor.current_char(), Some('a'));
        assert_eq!(cursor.peek_char(1), Some('b'));
        assert_eq!(cursor.peek_char(2), None);
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current_char(), None);
        cursor.advance(); // advancing at the end is a no-op
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_position_tracking() {
        let file = SourceFile::new("t", "a\nb");
        let mut cursor = Cursor::new(&file);
        cursor.advance();
        cursor.advance();
        let pos = cursor.position();
        assert_eq!((pos.ln, pos.col), (1, 0));
    }

    #[test]
    fn test_multibyte() {
        let file = SourceFile::new("t", "é9");
        let mut cursor = Cursor::new(&file);
        assert_eq!(cursor.current_char(), Some('é'));
        cursor.advance();
        assert_eq!(cursor.current_char(), Some('9'));
    }
}
