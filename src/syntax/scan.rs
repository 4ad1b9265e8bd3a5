//! Generic scanning tokenizer.
//!
//! Two passes over the content: the first walks the text once and claims
//! comment and quoted-literal spans, the second classifies words, numbers,
//! operators, and brackets everywhere. Second-pass tokens that landed inside
//! a first-pass span are dropped, the rest are merged and sorted by `begin`.

use super::{Token, TokenKind, Tokenizer};
use crate::util::is_word_char;

const KEYWORDS: &[&str] = &[
    "break", "case", "const", "continue", "do", "else", "enum", "false", "fn", "for", "function",
    "if", "in", "let", "match", "null", "return", "static", "struct", "switch", "true", "typedef",
    "var", "void", "while",
];

const OPERATORS: &str = "#!,.-+*/?;:|&~<=>%^@";

/// Language-agnostic tokenizer good enough to light up most source files
/// and plain config text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanTokenizer;

impl Tokenizer for ScanTokenizer {
    fn parse_content(&self, content: &str) -> Vec<Token> {
        let chars: Vec<char> = content.chars().collect();
        let spans = scan_spans(&chars);
        let words = scan_words(&chars);
        let mut result = filter_overlaps(words, &spans);
        result.extend(spans);
        result.sort_by_key(|t| t.begin);
        result
    }
}

/// First pass: comments and quoted literals. These spans win over anything
/// the word pass produces inside them.
fn scan_spans(chars: &[char]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < chars.len() {
        match chars[pos] {
            '/' if chars.get(pos + 1) == Some(&'/') => {
                let end = find_char(chars, '\n', pos).unwrap_or(chars.len());
                tokens.push(Token::new(TokenKind::Comment, pos, end));
                pos = end;
            }
            '/' if chars.get(pos + 1) == Some(&'*') => {
                let end = find_close(chars, pos + 2).map_or(chars.len(), |i| i + 2);
                tokens.push(Token::new(TokenKind::MultilineComment, pos, end));
                pos = end;
            }
            quote @ ('\'' | '"') => {
                let end = scan_quoted(chars, pos, quote);
                let kind = if quote == '\'' {
                    TokenKind::CharLiteral
                } else {
                    TokenKind::StringLiteral
                };
                tokens.push(Token::new(kind, pos, end));
                pos = end;
            }
            _ => pos += 1,
        }
    }
    tokens
}

/// Second pass: everything between the spans. Runs blind over the whole
/// content; the overlap filter cleans up afterwards.
fn scan_words(chars: &[char]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < chars.len() {
        let ch = chars[pos];
        if ch.is_ascii_digit() {
            let end = scan_number(chars, pos);
            tokens.push(Token::new(TokenKind::Number, pos, end));
            pos = end;
        } else if is_word_char(ch) {
            let mut end = pos;
            while end < chars.len() && is_word_char(chars[end]) {
                end += 1;
            }
            let word: String = chars[pos..end].iter().collect();
            let kind = if KEYWORDS.contains(&word.as_str()) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            tokens.push(Token::new(kind, pos, end));
            pos = end;
        } else if matches!(ch, '(' | ')' | '[' | ']' | '{' | '}') {
            tokens.push(Token::new(TokenKind::Bracket, pos, pos + 1));
            pos += 1;
        } else if OPERATORS.contains(ch) {
            tokens.push(Token::new(TokenKind::Operator, pos, pos + 1));
            pos += 1;
        } else {
            pos += 1;
        }
    }
    tokens
}

/// Drop word-pass tokens overlapping any span-pass token. Both lists are
/// sorted by `begin`, so a single merge walk suffices.
fn filter_overlaps(words: Vec<Token>, spans: &[Token]) -> Vec<Token> {
    let mut filtered = Vec::with_capacity(words.len());
    let mut span_ix = 0;
    for token in words {
        while span_ix < spans.len() && spans[span_ix].end <= token.begin {
            span_ix += 1;
        }
        if span_ix >= spans.len() || spans[span_ix].begin >= token.end {
            filtered.push(token);
        }
    }
    filtered
}

fn find_char(chars: &[char], needle: char, from: usize) -> Option<usize> {
    (from..chars.len()).find(|&i| chars[i] == needle)
}

fn find_close(chars: &[char], from: usize) -> Option<usize> {
    (from..chars.len().saturating_sub(1)).find(|&i| chars[i] == '*' && chars[i + 1] == '/')
}

/// One past the closing quote, or the content end for unterminated
/// literals. Backslash escapes the next character.
fn scan_quoted(chars: &[char], pos: usize, quote: char) -> usize {
    let mut i = pos + 1;
    while i < chars.len() {
        if chars[i] == '\\' {
            i += 2;
        } else if chars[i] == quote {
            return i + 1;
        } else {
            i += 1;
        }
    }
    chars.len()
}

fn scan_number(chars: &[char], pos: usize) -> usize {
    let len = chars.len();
    if chars[pos] == '0'
        && matches!(chars.get(pos + 1).copied(), Some('x' | 'X'))
        && chars.get(pos + 2).is_some_and(|c| c.is_ascii_hexdigit())
    {
        let mut end = pos + 2;
        while end < len && chars[end].is_ascii_hexdigit() {
            end += 1;
        }
        return end;
    }
    let mut end = pos;
    while end < len && chars[end].is_ascii_digit() {
        end += 1;
    }
    if end < len && chars[end] == '.' && chars.get(end + 1).is_some_and(|c| c.is_ascii_digit()) {
        end += 1;
        while end < len && chars[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end < len && matches!(chars[end], 'e' | 'E') {
        let mut exp = end + 1;
        if matches!(chars.get(exp).copied(), Some('+' | '-')) {
            exp += 1;
        }
        if chars.get(exp).is_some_and(|c| c.is_ascii_digit()) {
            end = exp;
            while end < len && chars[end].is_ascii_digit() {
                end += 1;
            }
        }
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(content: &str) -> Vec<(TokenKind, usize, usize)> {
        ScanTokenizer
            .parse_content(content)
            .into_iter()
            .map(|t| (t.kind, t.begin, t.end))
            .collect()
    }

    #[test]
    fn test_line_comment_swallows_word_tokens() {
        let tokens = kinds("a = 1 // note\nb");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Identifier, 0, 1),
                (TokenKind::Operator, 2, 3),
                (TokenKind::Number, 4, 5),
                (TokenKind::Comment, 6, 13),
                (TokenKind::Identifier, 14, 15),
            ]
        );
    }

    #[test]
    fn test_block_comment_unterminated_runs_to_end() {
        let tokens = kinds("x /* y");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Identifier, 0, 1),
                (TokenKind::MultilineComment, 2, 6),
            ]
        );
    }

    #[test]
    fn test_string_with_escaped_quote() {
        let tokens = kinds(r#""a\"b" c"#);
        assert_eq!(
            tokens,
            vec![
                (TokenKind::StringLiteral, 0, 6),
                (TokenKind::Identifier, 7, 8),
            ]
        );
    }

    #[test]
    fn test_char_literal() {
        let tokens = kinds("'a' + 'b'");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::CharLiteral, 0, 3),
                (TokenKind::Operator, 4, 5),
                (TokenKind::CharLiteral, 6, 9),
            ]
        );
    }

    #[test]
    fn test_keyword_vs_identifier() {
        let tokens = kinds("if iffy");
        assert_eq!(
            tokens,
            vec![(TokenKind::Keyword, 0, 2), (TokenKind::Identifier, 3, 7)]
        );
    }

    #[test]
    fn test_number_forms() {
        let tokens = kinds("0x1F 3.25 2e10 7");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Number, 0, 4),
                (TokenKind::Number, 5, 9),
                (TokenKind::Number, 10, 14),
                (TokenKind::Number, 15, 16),
            ]
        );
    }

    #[test]
    fn test_brackets() {
        let tokens = kinds("f(x)");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Identifier, 0, 1),
                (TokenKind::Bracket, 1, 2),
                (TokenKind::Identifier, 2, 3),
                (TokenKind::Bracket, 3, 4),
            ]
        );
    }

    #[test]
    fn test_output_sorted_by_begin() {
        let tokens = ScanTokenizer.parse_content("let x = \"s\"; // done\nreturn 0x2;");
        assert!(tokens.windows(2).all(|w| w[0].begin <= w[1].begin));
    }
}
