//! Comment skipping.

use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Skips a `#` line comment.
    ///
    /// The terminating newline is left in place so it still produces the
    /// NEWLINE token that separates statements.
    pub(crate) fn skip_comment(&mut self) {
        self.cursor.advance(); // '#'
        while let Some(ch) = self.cursor.current_char() {
            if ch == '\n' {
                break;
            }
            self.cursor.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::token::TokenKind;
    use crate::{Lexer, NoInterpolation};
    use peanut_util::SourceFile;

    #[test]
    fn test_comment_only_line() {
        let file = SourceFile::new("t", "# just a comment");
        let mut interp = NoInterpolation;
        let tokens = Lexer::new(&file, &mut interp).tokenize().unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn test_trailing_comment_keeps_separator() {
        let file = SourceFile::new("t", "1 # note\n2");
        let mut interp = NoInterpolation;
        let tokens = Lexer::new(&file, &mut interp).tokenize().unwrap();
        let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Int(2),
                TokenKind::Eof
            ]
        );
    }
}
