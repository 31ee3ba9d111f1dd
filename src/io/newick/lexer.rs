//! Token lexer for the parenthesized tree format.
//!
//! Produces one token per call from a [`ByteSource`], with line/column
//! positions for error reporting. The lexer only classifies characters and
//! spans; all structural judgement belongs to the broker builder.

use crate::io::source::ByteSource;
use crate::tree_error::TreeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// `(` — begin of a subtree group.
    OpenParen,
    /// `)` — end of a subtree group.
    CloseParen,
    /// `,` — next sibling.
    Comma,
    /// `;` — end of one complete tree.
    Semicolon,
    /// A quoted or unquoted label.
    Label,
    /// The text after a `:` separator, to be parsed as a branch length.
    Length,
    /// A `[...]` span, verbatim without the brackets.
    Comment,
    /// A `{...}` span, verbatim without the braces (only when tags are
    /// enabled).
    Tag,
    /// End of input.
    End,
    /// A character that fits no other class.
    Unknown,
}

#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn at(&self) -> String {
        format!("{}:{}", self.line, self.column)
    }
}

pub(crate) struct Lexer<S: ByteSource> {
    src: S,
    line: usize,
    column: usize,
    enable_tags: bool,
}

impl<S: ByteSource> Lexer<S> {
    pub fn new(src: S, enable_tags: bool) -> Self {
        Lexer {
            src,
            line: 1,
            column: 1,
            enable_tags,
        }
    }

    fn peek(&mut self) -> Result<Option<u8>, TreeError> {
        Ok(self.src.peek()?)
    }

    fn bump(&mut self) -> Result<Option<u8>, TreeError> {
        let b = self.src.next_byte()?;
        match b {
            Some(b'\n') => {
                self.line += 1;
                self.column = 1;
            }
            Some(_) => self.column += 1,
            None => {}
        }
        Ok(b)
    }

    /// Current position as `line:column`.
    pub fn at(&self) -> String {
        format!("{}:{}", self.line, self.column)
    }

    fn is_name_char(&self, b: u8) -> bool {
        // Printable, non-whitespace, outside the reserved set; braces join
        // the reserved set while tags are enabled.
        !b.is_ascii_whitespace()
            && !b.is_ascii_control()
            && !matches!(b, b'(' | b')' | b'[' | b']' | b':' | b',' | b';' | b'\'' | b'"')
            && (!self.enable_tags || !matches!(b, b'{' | b'}'))
    }

    fn read_until(&mut self, terminator: u8, what: &str) -> Result<String, TreeError> {
        let mut out = Vec::new();
        loop {
            match self.bump()? {
                Some(b) if b == terminator => break,
                Some(b) => out.push(b),
                None => {
                    return Err(TreeError::MalformedLabelOrLength {
                        at: self.at(),
                        msg: format!("unterminated {what}"),
                    });
                }
            }
        }
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Reads a quoted label after its opening quote, with the doubled-quote
    /// escape for a literal quote character.
    fn read_quoted(&mut self, quote: u8) -> Result<String, TreeError> {
        let mut out = Vec::new();
        loop {
            match self.bump()? {
                Some(b) if b == quote => {
                    if self.peek()? == Some(quote) {
                        self.bump()?;
                        out.push(quote);
                    } else {
                        break;
                    }
                }
                Some(b) => out.push(b),
                None => {
                    return Err(TreeError::MalformedLabelOrLength {
                        at: self.at(),
                        msg: "unterminated quoted label".into(),
                    });
                }
            }
        }
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    pub fn next_token(&mut self) -> Result<Token, TreeError> {
        while self.peek()?.is_some_and(|b| b.is_ascii_whitespace()) {
            self.bump()?;
        }
        let line = self.line;
        let column = self.column;
        let token = |kind: TokenKind, text: String| Token {
            kind,
            text,
            line,
            column,
        };

        let Some(b) = self.peek()? else {
            return Ok(token(TokenKind::End, String::new()));
        };

        match b {
            b'(' => {
                self.bump()?;
                Ok(token(TokenKind::OpenParen, String::new()))
            }
            b')' => {
                self.bump()?;
                Ok(token(TokenKind::CloseParen, String::new()))
            }
            b',' => {
                self.bump()?;
                Ok(token(TokenKind::Comma, String::new()))
            }
            b';' => {
                self.bump()?;
                Ok(token(TokenKind::Semicolon, String::new()))
            }
            b'[' => {
                self.bump()?;
                let text = self.read_until(b']', "comment")?;
                Ok(token(TokenKind::Comment, text))
            }
            b'{' if self.enable_tags => {
                self.bump()?;
                let text = self.read_until(b'}', "tag")?;
                Ok(token(TokenKind::Tag, text))
            }
            b':' => {
                self.bump()?;
                while self.peek()?.is_some_and(|b| b.is_ascii_whitespace()) {
                    self.bump()?;
                }
                let mut text = String::new();
                while let Some(b) = self.peek()? {
                    if b.is_ascii_digit()
                        || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E')
                    {
                        text.push(b as char);
                        self.bump()?;
                    } else {
                        break;
                    }
                }
                Ok(token(TokenKind::Length, text))
            }
            b'\'' | b'"' => {
                self.bump()?;
                let text = self.read_quoted(b)?;
                Ok(token(TokenKind::Label, text))
            }
            _ if self.is_name_char(b) => {
                let mut text = Vec::new();
                while let Some(c) = self.peek()? {
                    if !self.is_name_char(c) {
                        break;
                    }
                    self.bump()?;
                    text.push(c);
                }
                Ok(token(
                    TokenKind::Label,
                    String::from_utf8_lossy(&text).into_owned(),
                ))
            }
            other => {
                self.bump()?;
                Ok(token(TokenKind::Unknown, (other as char).to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::source::InMemorySource;

    fn lex_all(text: &str, tags: bool) -> Vec<(TokenKind, String)> {
        let mut lx = Lexer::new(InMemorySource::new(text), tags);
        let mut out = Vec::new();
        loop {
            let t = lx.next_token().unwrap();
            let done = t.kind == TokenKind::End;
            out.push((t.kind, t.text));
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn basic_tokens() {
        let toks = lex_all("(A:0.2,B)C;", false);
        let kinds: Vec<TokenKind> = toks.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            [
                TokenKind::OpenParen,
                TokenKind::Label,
                TokenKind::Length,
                TokenKind::Comma,
                TokenKind::Label,
                TokenKind::CloseParen,
                TokenKind::Label,
                TokenKind::Semicolon,
                TokenKind::End,
            ]
        );
        assert_eq!(toks[2].1, "0.2");
    }

    #[test]
    fn numeric_text_after_separator_is_a_length() {
        // The lexer decides by position: after ':' comes a length, never a
        // label, even if the same characters would make a valid label.
        let toks = lex_all("A:123;", false);
        assert_eq!(toks[1].0, TokenKind::Length);
        assert_eq!(toks[1].1, "123");
    }

    #[test]
    fn quoted_label_with_doubled_quote() {
        let toks = lex_all("'it''s a name';", false);
        assert_eq!(toks[0], (TokenKind::Label, "it's a name".to_string()));
    }

    #[test]
    fn comment_is_verbatim() {
        let toks = lex_all("[&&NHX:stuff]A;", false);
        assert_eq!(toks[0], (TokenKind::Comment, "&&NHX:stuff".to_string()));
    }

    #[test]
    fn braces_are_tags_only_when_enabled() {
        let toks = lex_all("A{edge0};", true);
        assert_eq!(toks[1], (TokenKind::Tag, "edge0".to_string()));
        let toks = lex_all("A{edge0};", false);
        assert_eq!(toks[0], (TokenKind::Label, "A{edge0}".to_string()));
    }

    #[test]
    fn unterminated_comment_fails() {
        let mut lx = Lexer::new(InMemorySource::new("[oops"), false);
        assert!(matches!(
            lx.next_token(),
            Err(TreeError::MalformedLabelOrLength { .. })
        ));
    }

    #[test]
    fn signed_scientific_length() {
        let toks = lex_all(":-1.5e-10,", false);
        assert_eq!(toks[0], (TokenKind::Length, "-1.5e-10".to_string()));
    }
}
