//! Multi-character operator lexing.

use peanut_util::Diagnostic;

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes `!=`.
    ///
    /// A bare `!` is not an operator in Peanut, so anything other than `=`
    /// after it is an Expected Character error.
    pub(crate) fn lex_not_equals(&mut self) -> Result<Token, Diagnostic> {
        let pos_start = self.cursor.position();
        self.cursor.advance();

        if self.cursor.current_char() == Some('=') {
            self.cursor.advance();
            return Ok(Token::new(TokenKind::Ne, pos_start, self.cursor.position()));
        }

        self.cursor.advance();
        Err(Diagnostic::expected_char(
            "'=' (after '!')",
            pos_start,
            self.cursor.position(),
        ))
    }

    /// Lexes `=`, `==` or `=>`.
    pub(crate) fn lex_equals(&mut self) -> Token {
        let pos_start = self.cursor.position();
        self.cursor.advance();

        let kind = match self.cursor.current_char() {
            Some('=') => {
                self.cursor.advance();
                TokenKind::Ee
            }
            Some('>') => {
                self.cursor.advance();
                TokenKind::Arrow
            }
            _ => TokenKind::Eq,
        };

        Token::new(kind, pos_start, self.cursor.position())
    }

    /// Lexes `<` or `<=`.
    pub(crate) fn lex_less_than(&mut self) -> Token {
        let pos_start = self.cursor.position();
        self.cursor.advance();

        let kind = if self.cursor.current_char() == Some('=') {
            self.cursor.advance();
            TokenKind::Lte
        } else {
            TokenKind::Lt
        };

        Token::new(kind, pos_start, self.cursor.position())
    }

    /// Lexes `>` or `>=`.
    pub(crate) fn lex_greater_than(&mut self) -> Token {
        let pos_start = self.cursor.position();
        self.cursor.advance();

        let kind = if self.cursor.current_char() == Some('=') {
            self.cursor.advance();
            TokenKind::Gte
        } else {
            TokenKind::Gt
        };

        Token::new(kind, pos_start, self.cursor.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoInterpolation;
    use peanut_util::{ErrorKind, SourceFile};

    fn lex_kinds(source: &str) -> Vec<TokenKind> {
        let file = SourceFile::new("t", source);
        let mut interp = NoInterpolation;
        Lexer::new(&file, &mut interp)
            .tokenize()
            .expect("should lex")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_not_equals() {
        assert_eq!(lex_kinds("!="), vec![TokenKind::Ne, TokenKind::Eof]);
    }

    #[test]
    fn test_bang_without_equals() {
        let file = SourceFile::new("t", "!x");
        let mut interp = NoInterpolation;
        let err = Lexer::new(&file, &mut interp).tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpectedCharacter);
    }

    #[test]
    fn test_equals_family() {
        assert_eq!(
            lex_kinds("= == =>"),
            vec![TokenKind::Eq, TokenKind::Ee, TokenKind::Arrow, TokenKind::Eof]
        );
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(
            lex_kinds("< <= > >="),
            vec![
                TokenKind::Lt,
                TokenKind::Lte,
                TokenKind::Gt,
                TokenKind::Gte,
                TokenKind::Eof
            ]
        );
    }
}
