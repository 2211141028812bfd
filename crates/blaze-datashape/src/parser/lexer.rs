//! Lexer for the datashape language.
//!
//! Produces span-based tokens without storing text - text is sliced from source only when needed.
//! Identifiers naming a primitive kind are reclassified from `Name` to `Bit` here,
//! so the grammar never consults the registry.
//!
//! The lexer stops at the first unrecognized character and reports it as a [`LexError`].

use logos::Logos;
use rowan::TextRange;
use std::ops::Range;

use super::cst::SyntaxKind;
use crate::types::PrimitiveKind;

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: SyntaxKind, span: TextRange) -> Self {
        Self { kind, span }
    }

    /// Byte offset of the first character.
    #[inline]
    pub fn offset(&self) -> usize {
        self.span.start().into()
    }
}

/// Unrecognized input character.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unexpected character {found:?} at offset {offset}")]
pub struct LexError {
    pub offset: usize,
    pub found: char,
}

fn range_to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}

/// Lazy token stream over a source string.
///
/// Yields trivia tokens too; use [`tokens`] for the significant ones only.
/// The iterator is fused after the first error.
pub struct Lexer<'src> {
    source: &'src str,
    inner: logos::Lexer<'src, SyntaxKind>,
    failed: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            inner: SyntaxKind::lexer(source),
            failed: false,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let kind = self.inner.next()?;
        let span = self.inner.span();
        match kind {
            Ok(SyntaxKind::Name) if PrimitiveKind::is_primitive_name(self.inner.slice()) => {
                Some(Ok(Token::new(SyntaxKind::Bit, range_to_text_range(span))))
            }
            Ok(kind) => Some(Ok(Token::new(kind, range_to_text_range(span)))),
            Err(()) => {
                self.failed = true;
                let found = self.source[span.start..]
                    .chars()
                    .next()
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                Some(Err(LexError {
                    offset: span.start,
                    found,
                }))
            }
        }
    }
}

/// Tokenizes source into a vector of span-based tokens, trivia included.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}

/// Significant tokens only: whitespace, newlines and comments are skipped.
pub fn tokens(source: &str) -> impl Iterator<Item = Result<Token, LexError>> + '_ {
    Lexer::new(source).filter(|token| !matches!(token, Ok(t) if t.kind.is_trivia()))
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'q>(source: &'q str, token: &Token) -> &'q str {
    &source[std::ops::Range::<usize>::from(token.span)]
}

/// Decodes the contents of a quoted string literal (quotes included in `raw`).
///
/// Supports `\\`, `\'`, `\"`, `\n`, `\r`, `\t`, `\0` and `\xHH`. Unknown escapes are kept
/// verbatim, backslash included.
pub fn unescape(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let mut digits = String::new();
                while digits.len() < 2
                    && let Some(d) = chars.peek().copied().filter(char::is_ascii_hexdigit)
                {
                    digits.push(d);
                    chars.next();
                }
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\x");
                        out.push_str(&digits);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
