//! Character store trait and implementations.
//!
//! `TextStore` abstracts the ordered character sequence a document state owns:
//! a rope for document content (cheap to clone, which is what makes state
//! duplication copy-on-write) and a plain string for small auxiliary buffers
//! (script inputs, preview scratch). All offsets are char indices.

use ropey::Rope;

/// One line of a store. `text` includes the trailing newline when the line
/// has one; the final line of a buffer does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Char offset of the first character of the line
    pub offset: usize,
    /// Line content, trailing newline included
    pub text: String,
    /// Length of `text` in chars
    pub length: usize,
}

/// Ordered character sequence with offset-addressed reads and writes.
///
/// Writes are total: offsets and lengths are clamped to the content. Range
/// validation with errors happens one layer up, in the version history.
/// `Default` is the empty sequence, `Clone` must be cheap enough to run on
/// every state duplication.
pub trait TextStore: Clone + Default {
    /// Total length in chars
    fn len(&self) -> usize;

    /// Check if the store is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Character at `offset`, None past the end
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Copy of `length` chars starting at `offset`, clamped to the content
    fn slice(&self, offset: usize, length: usize) -> String;

    /// Full content as String (expensive for large buffers)
    fn content(&self) -> String;

    /// Insert text at `offset` (clamped); returns the number of chars inserted
    fn insert(&mut self, offset: usize, text: &str) -> usize;

    /// Remove `length` chars starting at `offset`, clamped to the content
    fn delete(&mut self, offset: usize, length: usize);

    /// First occurrence of `ch` at or after `from`
    fn index_of(&self, ch: char, from: usize) -> Option<usize>;

    /// Last occurrence of `ch` at or before `from` (searching backward)
    fn last_index_of(&self, ch: char, from: usize) -> Option<usize>;

    /// First occurrence of `needle` at or after `from`
    fn find(&self, needle: &str, from: usize) -> Option<usize>;

    /// Number of lines (always >= 1; a trailing newline opens a final empty line)
    fn line_count(&self) -> usize;

    /// Line `line`, None past the last line
    fn line(&self, line: usize) -> Option<Line>;

    /// Convert a char offset (clamped) to (line, column)
    fn offset_to_position(&self, offset: usize) -> (usize, usize);

    /// Convert (line, column) to a char offset, clamped to the line and content
    fn position_to_offset(&self, line: usize, column: usize) -> usize;
}

// =============================================================================
// StringStore - for small auxiliary buffers (script input, preview scratch)
// =============================================================================

/// TextStore backed by a plain String. Everything is a linear scan, which is
/// fine at the sizes auxiliary buffers reach.
#[derive(Debug, Clone, Default)]
pub struct StringStore {
    text: String,
}

impl StringStore {
    pub fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    pub fn from_text(s: &str) -> Self {
        Self {
            text: s.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Convert char offset to byte offset
    fn char_to_byte(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Byte offsets of line starts: 0 plus the position after every newline
    fn line_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];
        for (i, ch) in self.text.char_indices() {
            if ch == '\n' {
                starts.push(i + 1);
            }
        }
        starts
    }
}

impl TextStore for StringStore {
    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.text.chars().nth(offset)
    }

    fn slice(&self, offset: usize, length: usize) -> String {
        self.text.chars().skip(offset).take(length).collect()
    }

    fn content(&self) -> String {
        self.text.clone()
    }

    fn insert(&mut self, offset: usize, text: &str) -> usize {
        let byte_offset = self.char_to_byte(offset.min(self.len()));
        self.text.insert_str(byte_offset, text);
        text.chars().count()
    }

    fn delete(&mut self, offset: usize, length: usize) {
        let len = self.len();
        let start = offset.min(len);
        let end = offset.saturating_add(length).min(len);
        if start < end {
            let start_byte = self.char_to_byte(start);
            let end_byte = self.char_to_byte(end);
            self.text.replace_range(start_byte..end_byte, "");
        }
    }

    fn index_of(&self, ch: char, from: usize) -> Option<usize> {
        self.text
            .chars()
            .enumerate()
            .skip(from)
            .find(|&(_, c)| c == ch)
            .map(|(i, _)| i)
    }

    fn last_index_of(&self, ch: char, from: usize) -> Option<usize> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        let start = from.min(len - 1);
        self.text
            .chars()
            .enumerate()
            .take(start + 1)
            .filter(|&(_, c)| c == ch)
            .last()
            .map(|(i, _)| i)
    }

    fn find(&self, needle: &str, from: usize) -> Option<usize> {
        let len = self.len();
        if from > len {
            return None;
        }
        let byte_from = self.char_to_byte(from);
        self.text[byte_from..]
            .find(needle)
            .map(|b| self.text[..byte_from + b].chars().count())
    }

    fn line_count(&self) -> usize {
        self.line_starts().len()
    }

    fn line(&self, line: usize) -> Option<Line> {
        let starts = self.line_starts();
        if line >= starts.len() {
            return None;
        }
        let start_byte = starts[line];
        let end_byte = starts.get(line + 1).copied().unwrap_or(self.text.len());
        let text = self.text[start_byte..end_byte].to_string();
        Some(Line {
            offset: self.text[..start_byte].chars().count(),
            length: text.chars().count(),
            text,
        })
    }

    fn offset_to_position(&self, offset: usize) -> (usize, usize) {
        let clamped = offset.min(self.len());
        let mut line = 0;
        let mut line_start = 0;
        for (i, ch) in self.text.chars().enumerate() {
            if i >= clamped {
                break;
            }
            if ch == '\n' {
                line += 1;
                line_start = i + 1;
            }
        }
        (line, clamped - line_start)
    }

    fn position_to_offset(&self, line: usize, column: usize) -> usize {
        match self.line(line) {
            Some(l) => (l.offset + column.min(l.length)).min(self.len()),
            None => self.len(),
        }
    }
}

// =============================================================================
// RopeStore - for document content
// =============================================================================

/// TextStore backed by ropey::Rope. Clones share the rope's internal nodes,
/// so duplicating a document state costs O(1) until the copy is edited.
#[derive(Debug, Clone, Default)]
pub struct RopeStore {
    rope: Rope,
}

impl RopeStore {
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    pub fn from_text(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
        }
    }

    /// Access the underlying Rope for rope-specific operations
    pub fn rope(&self) -> &Rope {
        &self.rope
    }
}

impl TextStore for RopeStore {
    fn len(&self) -> usize {
        self.rope.len_chars()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        if offset < self.rope.len_chars() {
            Some(self.rope.char(offset))
        } else {
            None
        }
    }

    fn slice(&self, offset: usize, length: usize) -> String {
        let len = self.rope.len_chars();
        let start = offset.min(len);
        let end = offset.saturating_add(length).min(len);
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    fn content(&self) -> String {
        self.rope.to_string()
    }

    fn insert(&mut self, offset: usize, text: &str) -> usize {
        let clamped = offset.min(self.rope.len_chars());
        self.rope.insert(clamped, text);
        text.chars().count()
    }

    fn delete(&mut self, offset: usize, length: usize) {
        let len = self.rope.len_chars();
        let start = offset.min(len);
        let end = offset.saturating_add(length).min(len);
        if start < end {
            self.rope.remove(start..end);
        }
    }

    fn index_of(&self, ch: char, from: usize) -> Option<usize> {
        if from >= self.rope.len_chars() {
            return None;
        }
        self.rope
            .slice(from..)
            .chars()
            .position(|c| c == ch)
            .map(|i| from + i)
    }

    fn last_index_of(&self, ch: char, from: usize) -> Option<usize> {
        let len = self.rope.len_chars();
        if len == 0 {
            return None;
        }
        let mut idx = from.min(len - 1);
        loop {
            if self.rope.char(idx) == ch {
                return Some(idx);
            }
            if idx == 0 {
                return None;
            }
            idx -= 1;
        }
    }

    fn find(&self, needle: &str, from: usize) -> Option<usize> {
        let len = self.rope.len_chars();
        let needle_len = needle.chars().count();
        if from > len {
            return None;
        }
        if needle_len == 0 {
            return Some(from);
        }
        let mut i = from;
        while i + needle_len <= len {
            if self.rope.slice(i..i + needle_len).chars().eq(needle.chars()) {
                return Some(i);
            }
            i += 1;
        }
        None
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line(&self, line: usize) -> Option<Line> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let slice = self.rope.line(line);
        Some(Line {
            offset: self.rope.line_to_char(line),
            text: slice.to_string(),
            length: slice.len_chars(),
        })
    }

    fn offset_to_position(&self, offset: usize) -> (usize, usize) {
        let clamped = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(clamped);
        let line_start = self.rope.line_to_char(line);
        (line, clamped - line_start)
    }

    fn position_to_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        let start = self.rope.line_to_char(line);
        let line_len = self.rope.line(line).len_chars();
        (start + column.min(line_len)).min(self.rope.len_chars())
    }
}
