//! Lexical classification of buffer content.
//!
//! Tokens exist for presentation: they tag spans of the document with a
//! lexical class and are recomputed wholesale after every edit. Nothing in
//! the editing core reads them back; they flow out to whatever renders or
//! dumps the buffer.

mod scan;

pub use scan::ScanTokenizer;

/// Lexical class of a token span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Comment,
    MultilineComment,
    CharLiteral,
    StringLiteral,
    Number,
    Keyword,
    Identifier,
    Operator,
    Bracket,
}

/// A classified span of the document, `begin..end` in char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// First char of the span (inclusive)
    pub begin: usize,
    /// One past the last char of the span
    pub end: usize,
}

impl Token {
    pub const fn new(kind: TokenKind, begin: usize, end: usize) -> Self {
        Self { kind, begin, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.begin
    }
}

/// Produces the full token list for a document's content.
///
/// Implementations must return tokens sorted by `begin`. Overlap is
/// tolerated downstream but not expected.
pub trait Tokenizer {
    fn parse_content(&self, content: &str) -> Vec<Token>;
}

/// Tokenizer that classifies nothing. Default for buffers whose content has
/// no useful lexical structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTokenizer;

impl Tokenizer for NullTokenizer {
    fn parse_content(&self, _content: &str) -> Vec<Token> {
        Vec::new()
    }
}
