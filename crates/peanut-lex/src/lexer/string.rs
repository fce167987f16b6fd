//! String literal lexing and interpolation.

use peanut_util::Diagnostic;

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a double-quoted string literal.
    ///
    /// Escapes `\n`, `\t` and `\$` are translated; any other escaped
    /// character passes through unchanged. An unescaped `$` immediately
    /// followed by `{` opens an interpolation fragment: the characters up
    /// to the matching `}` (no nesting) are handed to the [`Interpolate`]
    /// seam and the returned string is spliced in place. A lone `$` stays a
    /// literal character.
    ///
    /// [`Interpolate`]: crate::Interpolate
    pub(crate) fn lex_string(&mut self) -> Result<Token, Diagnostic> {
        let pos_start = self.cursor.position();
        self.cursor.advance(); // opening quote

        let mut value = String::new();

        loop {
            let Some(ch) = self.cursor.current_char() else {
                return Err(Diagnostic::expected_char(
                    "'\"'",
                    pos_start,
                    self.cursor.position(),
                ));
            };

            match ch {
                '"' => {
                    self.cursor.advance();
                    break;
                }
                '\\' => {
                    self.cursor.advance();
                    match self.cursor.current_char() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        // `\$` suppresses interpolation; every other escaped
                        // character passes through as itself.
                        Some(other) => value.push(other),
                        None => {
                            return Err(Diagnostic::expected_char(
                                "'\"'",
                                pos_start,
                                self.cursor.position(),
                            ));
                        }
                    }
                    self.cursor.advance();
                }
                '$' if self.cursor.peek_char(1) == Some('{') => {
                    self.cursor.advance(); // $
                    self.cursor.advance(); // {
                    let spliced = self.lex_interpolation()?;
                    value.push_str(&spliced);
                }
                _ => {
                    value.push(ch);
                    self.cursor.advance();
                }
            }
        }

        Ok(Token::new(
            TokenKind::Str(value),
            pos_start,
            self.cursor.position(),
        ))
    }

    /// Collects an interpolation fragment up to `}` and evaluates it.
    fn lex_interpolation(&mut self) -> Result<String, Diagnostic> {
        let frag_start = self.cursor.position();
        let mut fragment = String::new();

        loop {
            match self.cursor.current_char() {
                Some('}') => {
                    self.cursor.advance();
                    break;
                }
                Some(ch) => {
                    fragment.push(ch);
                    self.cursor.advance();
                }
                None => {
                    return Err(Diagnostic::expected_char(
                        "'}'",
                        frag_start,
                        self.cursor.position(),
                    ));
                }
            }
        }

        self.interp.evaluate(&fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Interpolate, NoInterpolation};
    use peanut_util::{ErrorKind, SourceFile};

    fn lex_str(source: &str) -> String {
        let file = SourceFile::new("t", source);
        let mut interp = NoInterpolation;
        let tokens = Lexer::new(&file, &mut interp).tokenize().expect("should lex");
        match &tokens[0].kind {
            TokenKind::Str(s) => s.clone(),
            other => panic!("expected string token, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_string() {
        assert_eq!(lex_str("\"hello\""), "hello");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(lex_str("\"a\\nb\\tc\""), "a\nb\tc");
        assert_eq!(lex_str("\"quote: \\\" done\""), "quote: \" done");
    }

    #[test]
    fn test_unknown_escape_passes_through() {
        assert_eq!(lex_str("\"a\\qb\""), "aqb");
    }

    #[test]
    fn test_escaped_dollar_suppresses_interpolation() {
        assert_eq!(lex_str("\"\\${1}\""), "${1}");
    }

    #[test]
    fn test_lone_dollar_is_literal() {
        assert_eq!(lex_str("\"cost: $5\""), "cost: $5");
    }

    #[test]
    fn test_unterminated_string() {
        let file = SourceFile::new("t", "\"abc");
        let mut interp = NoInterpolation;
        let err = Lexer::new(&file, &mut interp).tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpectedCharacter);
        assert_eq!(err.details, "'\"'");
    }

    #[test]
    fn test_unterminated_interpolation() {
        let file = SourceFile::new("t", "\"x=${1+2");
        let mut interp = NoInterpolation;
        let err = Lexer::new(&file, &mut interp).tokenize().unwrap_err();
        assert_eq!(err.details, "'}'");
    }

    /// Interpolator stub that records fragments and splices a marker.
    struct Recording {
        fragments: Vec<String>,
    }

    impl Interpolate for Recording {
        fn evaluate(&mut self, fragment: &str) -> Result<String, Diagnostic> {
            self.fragments.push(fragment.to_owned());
            Ok(format!("<{fragment}>"))
        }
    }

    #[test]
    fn test_interpolation_fragments_and_splicing() {
        let file = SourceFile::new("t", "\"${a} and ${b+1}\"");
        let mut interp = Recording { fragments: vec![] };
        let tokens = Lexer::new(&file, &mut interp).tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Str("<a> and <b+1>".into()));
        assert_eq!(interp.fragments, vec!["a", "b+1"]);
    }

    #[test]
    fn test_interpolation_at_string_start() {
        let file = SourceFile::new("t", "\"${x}!\"");
        let mut interp = Recording { fragments: vec![] };
        let tokens = Lexer::new(&file, &mut interp).tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Str("<x>!".into()));
    }
}
