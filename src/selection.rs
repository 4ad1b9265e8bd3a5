//! Selection ranges, their motion operations, and the rebasing law.
//!
//! A selection is a pair of offsets into the current document content. `begin`
//! anchors where the selection started, `end` is the caret; `begin > end` is a
//! valid left-facing selection. `from_line_offset` remembers the caret's
//! column so vertical motion through short lines can return to it.
//!
//! The rebasing law lives here as two pure functions applied to every tracked
//! offset (selection ends, error marks) after each buffer edit.

use crate::store::TextStore;
use crate::util::is_word_char;

/// Shift one offset across an insert of `length` chars at `position`.
///
/// Offsets sitting exactly at the insertion point are pushed forward, so the
/// inserted text lands before any selection anchored there.
pub fn rebase_insert(offset: usize, position: usize, length: usize) -> usize {
    if offset >= position {
        offset + length
    } else {
        offset
    }
}

/// Shift one offset across a delete of `length` chars at `position`.
///
/// Offsets past the deleted span shift left; offsets inside it collapse to
/// the deletion start.
pub fn rebase_delete(offset: usize, position: usize, length: usize) -> usize {
    if offset >= position + length {
        offset - length
    } else if offset >= position {
        position
    } else {
        offset
    }
}

/// One selection range plus its remembered column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where the selection started (fixed point)
    pub begin: usize,
    /// Where the caret is (moving point)
    pub end: usize,
    /// Column of `end` at the last explicit positioning, preserved across
    /// vertical motion
    pub from_line_offset: usize,
}

impl Selection {
    /// Collapsed selection at `position`.
    pub fn caret<S: TextStore>(text: &S, position: usize) -> Self {
        let mut sel = Self {
            begin: position,
            end: position,
            from_line_offset: 0,
        };
        sel.update_from_line_offset(text);
        sel
    }

    /// Selection from `begin` to `end` (either order).
    pub fn span<S: TextStore>(text: &S, begin: usize, end: usize) -> Self {
        let mut sel = Self {
            begin,
            end,
            from_line_offset: 0,
        };
        sel.update_from_line_offset(text);
        sel
    }

    pub fn min(&self) -> usize {
        self.begin.min(self.end)
    }

    pub fn max(&self) -> usize {
        self.begin.max(self.end)
    }

    /// Signed extent, negative for left-facing selections
    pub fn length(&self) -> i64 {
        self.end as i64 - self.begin as i64
    }

    /// Unsigned extent
    pub fn text_length(&self) -> usize {
        self.max() - self.min()
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Selected text, empty for collapsed selections
    pub fn text<S: TextStore>(&self, text: &S) -> String {
        if self.is_empty() {
            String::new()
        } else {
            text.slice(self.min(), self.text_length())
        }
    }

    /// Collapse to an absolute position.
    pub fn set_position<S: TextStore>(&mut self, text: &S, position: usize) {
        self.begin = position;
        self.end = position;
        self.update_from_line_offset(text);
    }

    /// Reposition both ends.
    pub fn set_range<S: TextStore>(&mut self, text: &S, begin: usize, end: usize) {
        self.begin = begin;
        self.end = end;
        self.update_from_line_offset(text);
    }

    /// Recompute the remembered column from the current `end`.
    pub fn update_from_line_offset<S: TextStore>(&mut self, text: &S) {
        let newline = self
            .end
            .checked_sub(1)
            .and_then(|i| text.last_index_of('\n', i));
        self.from_line_offset = self.end - newline.map_or(0, |i| i + 1);
    }

    /// Shift both ends across an insert. Does not touch the remembered
    /// column; an edit elsewhere is not an explicit repositioning.
    pub fn rebase_for_insert(&mut self, position: usize, length: usize) {
        self.begin = rebase_insert(self.begin, position, length);
        self.end = rebase_insert(self.end, position, length);
    }

    /// Shift both ends across a delete.
    pub fn rebase_for_delete(&mut self, position: usize, length: usize) {
        self.begin = rebase_delete(self.begin, position, length);
        self.end = rebase_delete(self.end, position, length);
    }

    // =========================================================================
    // Motion
    // =========================================================================

    /// Move the caret by `offset` chars, clamped to the content.
    pub fn move_horizontal<S: TextStore>(&mut self, text: &S, offset: i64, extend: bool) {
        self.end = (self.end as i64 + offset).clamp(0, text.len() as i64) as usize;
        if !extend {
            self.begin = self.end;
        }
        self.update_from_line_offset(text);
    }

    /// Move the caret by `offset` words. A step runs to the first boundary
    /// between word characters (alnum or `_`) and anything else; a step that
    /// starts against a newline crosses just the newline. Stops at the buffer
    /// edge.
    pub fn move_horizontal_word<S: TextStore>(&mut self, text: &S, offset: i64, extend: bool) {
        if offset > 0 {
            for _ in 0..offset {
                match text.char_at(self.end) {
                    None => break,
                    Some('\n') => self.end += 1,
                    Some(first) => {
                        let was_word = is_word_char(first);
                        let mut pos = self.end;
                        while let Some(ch) = text.char_at(pos) {
                            if ch == '\n' || is_word_char(ch) != was_word {
                                break;
                            }
                            pos += 1;
                        }
                        self.end = pos;
                    }
                }
            }
        } else {
            for _ in 0..offset.unsigned_abs() {
                let Some(prev) = self.end.checked_sub(1).and_then(|i| text.char_at(i)) else {
                    break;
                };
                if prev == '\n' {
                    self.end -= 1;
                } else {
                    let was_word = is_word_char(prev);
                    let mut pos = self.end;
                    while pos > 0 {
                        match text.char_at(pos - 1) {
                            Some(ch) if ch != '\n' && is_word_char(ch) == was_word => pos -= 1,
                            _ => break,
                        }
                    }
                    self.end = pos;
                }
            }
        }
        if !extend {
            self.begin = self.end;
        }
        self.update_from_line_offset(text);
    }

    /// Move the caret by `offset` lines, landing at the remembered column or
    /// the end of a shorter target line. At the first/last line the caret
    /// stays where it is. The remembered column survives, so a chain of
    /// vertical moves through short lines returns to the original column.
    pub fn move_vertical<S: TextStore>(&mut self, text: &S, offset: i64, extend: bool) {
        if offset < 0 {
            for _ in 0..offset.unsigned_abs() {
                let Some(end_of_prev_line) = self
                    .end
                    .checked_sub(1)
                    .and_then(|i| text.last_index_of('\n', i))
                else {
                    break;
                };
                let target_line_start = end_of_prev_line
                    .checked_sub(1)
                    .and_then(|i| text.last_index_of('\n', i))
                    .map_or(0, |i| i + 1);
                self.end = (target_line_start + self.from_line_offset).min(end_of_prev_line);
            }
        } else {
            for _ in 0..offset {
                let Some(next_line) = text.index_of('\n', self.end) else {
                    break;
                };
                let after_next_line = text.index_of('\n', next_line + 1).unwrap_or(text.len());
                self.end = (next_line + 1 + self.from_line_offset).min(after_next_line);
            }
        }
        if !extend {
            self.begin = self.end;
        }
    }

    /// Toggle between the first non-whitespace column and column 0.
    pub fn move_to_line_begin<S: TextStore>(&mut self, text: &S, extend: bool) {
        let (line, _) = text.offset_to_position(self.end);
        let Some(info) = text.line(line) else {
            return;
        };
        let mut text_begin = info.offset;
        if !info.text.trim().is_empty() {
            text_begin += info.text.chars().take_while(|c| c.is_whitespace()).count();
        }
        self.end = if self.end == text_begin {
            info.offset
        } else {
            text_begin
        };
        self.end = self.end.min(text.len());
        if !extend {
            self.begin = self.end;
        }
        self.update_from_line_offset(text);
    }

    /// Move the caret to the end of its line: onto the newline for
    /// terminated lines, onto the buffer end for the final line.
    pub fn move_to_line_end<S: TextStore>(&mut self, text: &S, extend: bool) {
        let (line, _) = text.offset_to_position(self.end);
        let Some(info) = text.line(line) else {
            return;
        };
        let newline = usize::from(info.text.ends_with('\n'));
        self.end = (info.offset + info.length - newline).min(text.len());
        if !extend {
            self.begin = self.end;
        }
        self.update_from_line_offset(text);
    }
}
