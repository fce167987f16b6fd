//! Span module - Source location tracking.
//!
//! This module provides [`SourceFile`], a shared handle to a named piece of
//! source text, and [`Position`], a snapshot of a location inside one.
//! Positions are attached in start/end pairs to every token and AST node so
//! that diagnostics can be rendered from any phase without extra state.

use std::sync::Arc;

/// A source file (or synthetic fragment) with its content and metadata.
///
/// Cheap to share: the pipeline passes `Arc<SourceFile>` handles around and
/// every [`Position`] holds one. Line start offsets are precomputed once so
/// diagnostics can slice out individual lines.
///
/// # Examples
///
/// ```
/// use peanut_util::span::SourceFile;
///
/// let file = SourceFile::new("demo.peanut", "var a = 1\nprint(a)");
/// assert_eq!(file.name(), "demo.peanut");
/// assert_eq!(file.line(1), Some("print(a)"));
/// ```
pub struct SourceFile {
    /// File name (path or display name such as `<stdin>` or `INTERPOLATION`)
    name: String,
    /// Full source text
    content: String,
    /// Precomputed byte offsets of each line start
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Create a new source file handle.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Arc<Self> {
        let content = content.into();
        let line_starts = Self::compute_line_starts(&content);
        Arc::new(Self {
            name: name.into(),
            content,
            line_starts,
        })
    }

    /// Compute line start offsets from content.
    fn compute_line_starts(content: &str) -> Vec<usize> {
        let mut line_starts = vec![0];
        for (i, ch) in content.char_indices() {
            if ch == '\n' {
                line_starts.push(i + 1);
            }
        }
        line_starts
    }

    /// Get the file name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the full source text.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the total number of lines.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get a source line by 0-based index, without its trailing newline.
    pub fn line(&self, index: usize) -> Option<&str> {
        let start = *self.line_starts.get(index)?;
        let end = self
            .line_starts
            .get(index + 1)
            .copied()
            .unwrap_or(self.content.len());
        Some(self.content[start..end].trim_end_matches(['\n', '\r']))
    }

    /// Render the source lines covered by `start..end` with a caret span
    /// underneath each.
    ///
    /// Multi-line spans underline from the start column on the first line to
    /// the end column on the last. Tabs are stripped from the output so the
    /// carets stay aligned with the text above them.
    pub fn underline_span(&self, start: &Position, end: &Position) -> String {
        let mut result = String::new();
        let line_count = (end.ln.saturating_sub(start.ln) as usize) + 1;

        for i in 0..line_count {
            let line = self.line(start.ln as usize + i).unwrap_or("");
            let col_start = if i == 0 { start.col as usize } else { 0 };
            let col_end = if i == line_count - 1 {
                end.col as usize
            } else {
                line.chars().count().saturating_sub(1)
            };

            result.push_str(line);
            result.push('\n');
            for _ in 0..col_start {
                result.push(' ');
            }
            for _ in 0..col_end.saturating_sub(col_start).max(1) {
                result.push('^');
            }
        }

        result.replace('\t', "")
    }
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("line_count", &self.line_count())
            .finish()
    }
}

/// A snapshot of a location in a source file.
///
/// Tracks the byte offset plus 0-based line and column, and carries the
/// `Arc<SourceFile>` it points into. Advancing past a newline bumps the
/// line and resets the column; positions attached to tokens and nodes are
/// clones taken at the moment of attachment, so later lexer movement never
/// disturbs them.
///
/// # Examples
///
/// ```
/// use peanut_util::span::{Position, SourceFile};
///
/// let file = SourceFile::new("demo.peanut", "ab\nc");
/// let mut pos = Position::start(&file);
/// pos.advance('a');
/// pos.advance('b');
/// pos.advance('\n');
/// assert_eq!((pos.ln, pos.col), (1, 0));
/// ```
#[derive(Clone)]
pub struct Position {
    /// Byte offset into the source text
    pub idx: usize,
    /// Line number (0-based)
    pub ln: u32,
    /// Column number in characters (0-based)
    pub col: u32,
    /// The file this position points into
    pub file: Arc<SourceFile>,
}

impl Position {
    /// Position at the very start of a file.
    pub fn start(file: &Arc<SourceFile>) -> Self {
        Self {
            idx: 0,
            ln: 0,
            col: 0,
            file: Arc::clone(file),
        }
    }

    /// Move past `current_char`, updating offset, line and column.
    pub fn advance(&mut self, current_char: char) {
        self.idx += current_char.len_utf8();
        self.col += 1;
        if current_char == '\n' {
            self.ln += 1;
            self.col = 0;
        }
    }

    /// File name of the underlying source.
    #[inline]
    pub fn file_name(&self) -> &str {
        self.file.name()
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{} (byte {})",
            self.file.name(),
            self.ln,
            self.col,
            self.idx
        )
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.idx == other.idx && Arc::ptr_eq(&self.file, &other.file)
    }
}


#[cfg(test)]
mod properties {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn prop_every_line_retrievable(content: String) -> bool {
        let file = SourceFile::new("prop", content);
        // line() slicing proves every start is a valid char boundary
        (0..file.line_count()).all(|i| file.line(i).is_some()) && file.line(file.line_count()).is_none()
    }

    #[quickcheck]
    fn prop_advance_matches_content(content: String) -> bool {
        let file = SourceFile::new("prop", content.clone());
        let mut pos = Position::start(&file);
        for ch in content.chars() {
            pos.advance(ch);
        }
        pos.idx == content.len()
    }

    #[quickcheck]
    fn prop_line_count_matches_newlines(content: String) -> bool {
        let file = SourceFile::new("prop", content.clone());
        file.line_count() == content.matches('\n').count() + 1
    }
}
