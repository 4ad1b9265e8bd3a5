//! The document buffer: one editable document bound to its version history.
//!
//! Every mutation runs the same sequence: normalize the range, commit a new
//! state to the version tree, rebase every selection and error mark, snapshot
//! the cursor set against the new state, retokenize, and notify the change
//! sinks. Undo and redo move the current-state pointer instead of committing,
//! then restore the cursor snapshot attached to the destination state.

use crate::history::{Link, Modification, SavedCursor, StateId, VersionTree};
use crate::selection::{rebase_delete, rebase_insert, Selection};
use crate::store::{Line, TextStore};
use crate::syntax::{Token, Tokenizer};

/// A diagnostic pinned to a buffer offset. Rebased across edits exactly like
/// a selection end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMark {
    pub message: String,
    pub position: usize,
}

impl ErrorMark {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Observer of content changes. Receives the full document text after every
/// mutation, undo, redo, and version jump.
pub trait ChangeSink: Send {
    fn document_changed(&mut self, content: &str);
}

/// An editable document: version tree, current-state pointer, selection set,
/// error marks, and the derived token list.
pub struct DocumentBuffer<S: TextStore> {
    history: VersionTree<S>,
    current: StateId,
    redo_stack: Vec<StateId>,
    /// Live selection set. Starts as a single caret at offset 0; command
    /// operations may replace it wholesale, including with an empty set.
    pub selections: Vec<Selection>,
    /// Diagnostics rebased alongside the selections
    pub error_marks: Vec<ErrorMark>,
    tokens: Vec<Token>,
    tokenizer: Box<dyn Tokenizer + Send>,
    sinks: Vec<Box<dyn ChangeSink>>,
}

impl<S: TextStore> DocumentBuffer<S> {
    /// Empty document: a committed root state and one caret at offset 0.
    pub fn new(tokenizer: Box<dyn Tokenizer + Send>) -> Self {
        let mut history = VersionTree::new();
        let root = history.new_state();
        history.commit(root);
        let caret = Selection::caret(history.content(root), 0);
        let mut buffer = Self {
            history,
            current: root,
            redo_stack: Vec::new(),
            selections: vec![caret],
            error_marks: Vec::new(),
            tokens: Vec::new(),
            tokenizer,
            sinks: Vec::new(),
        };
        buffer.save_cursor_state();
        buffer
    }

    /// Document preloaded with `content`, caret at offset 0.
    pub fn with_content(content: &str, tokenizer: Box<dyn Tokenizer + Send>) -> Self {
        let mut buffer = Self::new(tokenizer);
        buffer.set_text(content);
        let caret = Selection::caret(buffer.text(), 0);
        buffer.selections = vec![caret];
        buffer.save_cursor_state();
        buffer
    }

    /// Register an observer for content changes. Register sinks before
    /// loading content if they must see the initial text.
    pub fn add_sink(&mut self, sink: Box<dyn ChangeSink>) {
        self.sinks.push(sink);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Content of the current state
    pub fn text(&self) -> &S {
        self.history.content(self.current)
    }

    pub fn len(&self) -> usize {
        self.text().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full content as a String
    pub fn content(&self) -> String {
        self.text().content()
    }

    /// Token list for the current content
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// Read access to the whole version tree, for graph browsing
    pub fn history(&self) -> &VersionTree<S> {
        &self.history
    }

    /// The committed graph as (states, parent-child links)
    pub fn version_graph(&self) -> (Vec<StateId>, Vec<Link>) {
        self.history.all_states()
    }

    pub fn can_undo(&self) -> bool {
        self.history.parent(self.current).is_some()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Char at `offset`, None past the end
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.text().char_at(offset)
    }

    /// `length` chars starting at `offset`, clamped to the content
    pub fn slice(&self, offset: usize, length: usize) -> String {
        self.text().slice(offset, length)
    }

    /// First occurrence of `needle` at or after `from`
    pub fn find(&self, needle: &str, from: usize) -> Option<usize> {
        self.text().find(needle, from)
    }

    /// Line `line` of the current content, None past the last line
    pub fn line(&self, line: usize) -> Option<Line> {
        self.text().line(line)
    }

    /// (line, column) of a char offset
    pub fn offset_to_position(&self, offset: usize) -> (usize, usize) {
        self.text().offset_to_position(offset)
    }

    /// Char offset of (line, column), clamped to the line and content
    pub fn position_to_offset(&self, line: usize, column: usize) -> usize {
        self.text().position_to_offset(line, column)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Insert `text` at `position`. Returns the offset just past the inserted
    /// text. `position` must be within the content.
    pub fn insert_string(&mut self, position: usize, text: &str) -> usize {
        assert!(
            position <= self.len(),
            "insert position {position} past end of content ({})",
            self.len()
        );
        if text.is_empty() {
            return position;
        }
        let length = text.chars().count();
        tracing::trace!(position, length, "insert");
        self.redo_stack.clear();
        let draft = self.history.duplicate(self.current);
        self.history
            .modify(draft, Modification::Insert { position, text })
            .expect("insert within validated bounds");
        self.history.commit(draft);
        self.current = draft;
        self.rebase_all_insert(position, length);
        self.save_cursor_state();
        self.on_update();
        position + length
    }

    /// Insert raw bytes, replacing invalid UTF-8 with the replacement char.
    pub fn insert_bytes(&mut self, position: usize, data: &[u8]) -> usize {
        let text = String::from_utf8_lossy(data);
        self.insert_string(position, &text)
    }

    /// Delete `count` chars at `position`. Negative positions eat into the
    /// count, ranges are clamped to the content, and a range that normalizes
    /// to nothing is a silent no-op.
    pub fn delete_string(&mut self, position: i64, count: i64) {
        let (mut position, mut count) = (position, count);
        if position + count <= 0 {
            return;
        }
        if position < 0 {
            count += position;
            position = 0;
        }
        if count <= 0 {
            return;
        }
        let position = position as usize;
        let count = (count as usize).min(self.len().saturating_sub(position));
        if count == 0 {
            return;
        }
        tracing::trace!(position, count, "delete");
        self.redo_stack.clear();
        let draft = self.history.duplicate(self.current);
        self.history
            .modify(
                draft,
                Modification::Delete {
                    position,
                    length: count,
                },
            )
            .expect("delete within clamped bounds");
        self.history.commit(draft);
        self.current = draft;
        self.rebase_all_delete(position, count);
        self.save_cursor_state();
        self.on_update();
    }

    /// Replace the whole content in one committed state (delete-all plus
    /// insert). Both rebase passes run, so existing selections collapse to
    /// the end of the new text. Returns the new content length.
    pub fn set_text(&mut self, text: &str) -> usize {
        let old_len = self.len();
        tracing::debug!(old_len, "set text");
        self.redo_stack.clear();
        let draft = self.history.duplicate(self.current);
        if old_len > 0 {
            self.history
                .modify(
                    draft,
                    Modification::Delete {
                        position: 0,
                        length: old_len,
                    },
                )
                .expect("delete of full content");
        }
        self.history
            .modify(draft, Modification::Insert { position: 0, text })
            .expect("insert at origin");
        self.history.commit(draft);
        self.current = draft;
        let new_len = self.len();
        self.rebase_all_delete(0, old_len);
        self.rebase_all_insert(0, new_len);
        self.save_cursor_state();
        self.on_update();
        new_len
    }

    /// Insert at one selection's caret. The rebase pass moves every
    /// selection, including this one, past the inserted text.
    pub fn insert_at_selection(&mut self, index: usize, text: &str) -> usize {
        let end = self.selections[index].end;
        let res = self.insert_string(end, text);
        let content = self.history.content(self.current);
        self.selections[index].update_from_line_offset(content);
        res
    }

    /// Reposition one selection over `begin..end`, recomputing its
    /// remembered column.
    pub fn set_selection_range(&mut self, index: usize, begin: usize, end: usize) {
        let text = self.history.content(self.current);
        self.selections[index].set_range(text, begin, end);
    }

    // =========================================================================
    // History navigation
    // =========================================================================

    /// Step to the parent state. Returns false at the root, where nothing
    /// moves and the redo stack is left untouched.
    pub fn undo(&mut self) -> bool {
        self.save_cursor_state();
        let Ok(parent) = self.history.step_back(self.current, 1) else {
            return false;
        };
        tracing::debug!(from = self.current.index(), to = parent.index(), "undo");
        self.redo_stack.push(self.current);
        self.current = parent;
        self.load_cursor_state();
        self.on_update();
        true
    }

    /// Re-enter the most recently undone state. Returns false when no redo
    /// path exists.
    pub fn redo(&mut self) -> bool {
        let Some(target) = self.redo_stack.pop() else {
            return false;
        };
        tracing::debug!(from = self.current.index(), to = target.index(), "redo");
        self.save_cursor_state();
        self.current = target;
        self.load_cursor_state();
        self.on_update();
        true
    }

    /// Jump to an arbitrary committed state (branch selection from the
    /// version graph).
    pub fn set_version(&mut self, id: StateId) {
        tracing::debug!(state = id.index(), "set version");
        self.current = id;
        self.load_cursor_state();
        self.on_update();
    }

    /// Snapshot the live selection set against the current state.
    pub fn save_cursor_state(&mut self) {
        let cursors: Vec<SavedCursor> = self
            .selections
            .iter()
            .map(|s| SavedCursor {
                begin: s.begin,
                end: s.end,
            })
            .collect();
        self.history.save_cursors(self.current, &cursors);
    }

    /// Restore the selection set snapshotted against the current state.
    /// States without a snapshot leave the live selections unchanged.
    pub fn load_cursor_state(&mut self) {
        let saved = self.history.cursors(self.current);
        if saved.is_empty() {
            return;
        }
        let text = self.history.content(self.current);
        let selections: Vec<Selection> = saved
            .iter()
            .map(|c| Selection::span(text, c.begin, c.end))
            .collect();
        self.selections = selections;
    }

    // =========================================================================
    // Selection set
    // =========================================================================

    /// Replace all selections with one span of the whole content.
    pub fn select_all(&mut self) {
        let text = self.history.content(self.current);
        self.selections = vec![Selection::span(text, 0, text.len())];
    }

    /// Keep only the first selection.
    pub fn collapse_to_primary(&mut self) {
        self.selections.truncate(1);
    }

    /// Text of every selection, in selection order.
    pub fn selections_text(&self) -> Vec<String> {
        let text = self.history.content(self.current);
        self.selections.iter().map(|s| s.text(text)).collect()
    }

    /// Add a selection over the next occurrence of the last selection's
    /// text. The "last" selection is the one reaching furthest right.
    pub fn add_next_occurrence(&mut self) {
        let Some(ix) = self.last_selection_index() else {
            return;
        };
        let sel = self.selections[ix];
        if sel.is_empty() {
            return;
        }
        let text = self.history.content(self.current);
        let needle = sel.text(text);
        if let Some(next) = text.find(&needle, sel.max()) {
            let span = Selection::span(text, next, next + sel.text_length());
            self.selections.push(span);
        }
    }

    /// Re-target the last selection at the next occurrence of its text.
    pub fn move_to_next_occurrence(&mut self) {
        let Some(ix) = self.last_selection_index() else {
            return;
        };
        let sel = self.selections[ix];
        if sel.is_empty() {
            return;
        }
        let text = self.history.content(self.current);
        let needle = sel.text(text);
        if let Some(next) = text.find(&needle, sel.max()) {
            let length = sel.text_length();
            self.selections[ix].set_range(text, next, next + length);
        }
    }

    fn last_selection_index(&self) -> Option<usize> {
        (0..self.selections.len()).max_by_key(|&i| self.selections[i].max())
    }

    // =========================================================================
    // Motion
    // =========================================================================

    /// Move every selection by `offset` chars.
    pub fn move_horizontal(&mut self, offset: i64, extend: bool) {
        let text = self.history.content(self.current);
        for sel in &mut self.selections {
            sel.move_horizontal(text, offset, extend);
        }
    }

    /// Move every selection by `offset` words.
    pub fn move_horizontal_word(&mut self, offset: i64, extend: bool) {
        let text = self.history.content(self.current);
        for sel in &mut self.selections {
            sel.move_horizontal_word(text, offset, extend);
        }
    }

    /// Move every selection by `offset` lines, preserving remembered columns.
    pub fn move_vertical(&mut self, offset: i64, extend: bool) {
        let text = self.history.content(self.current);
        for sel in &mut self.selections {
            sel.move_vertical(text, offset, extend);
        }
    }

    pub fn move_to_line_begin(&mut self, extend: bool) {
        let text = self.history.content(self.current);
        for sel in &mut self.selections {
            sel.move_to_line_begin(text, extend);
        }
    }

    pub fn move_to_line_end(&mut self, extend: bool) {
        let text = self.history.content(self.current);
        for sel in &mut self.selections {
            sel.move_to_line_end(text, extend);
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn rebase_all_insert(&mut self, position: usize, length: usize) {
        for sel in &mut self.selections {
            sel.rebase_for_insert(position, length);
        }
        for mark in &mut self.error_marks {
            mark.position = rebase_insert(mark.position, position, length);
        }
    }

    fn rebase_all_delete(&mut self, position: usize, length: usize) {
        for sel in &mut self.selections {
            sel.rebase_for_delete(position, length);
        }
        for mark in &mut self.error_marks {
            mark.position = rebase_delete(mark.position, position, length);
        }
    }

    /// Retokenize and push the new content to every sink.
    fn on_update(&mut self) {
        let content = self.content();
        self.tokens = self.tokenizer.parse_content(&content);
        for sink in &mut self.sinks {
            sink.document_changed(&content);
        }
    }
}
