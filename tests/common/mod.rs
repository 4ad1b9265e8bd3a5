//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::sync::Arc;

use stylus::buffer::DocumentBuffer;
use stylus::command::LineScriptProvider;
use stylus::selection::Selection;
use stylus::server::EditorServer;
use stylus::store::{RopeStore, StringStore, TextStore};
use stylus::syntax::NullTokenizer;

/// Create a document buffer with the given text, caret at offset 0
pub fn buffer(text: &str) -> DocumentBuffer<StringStore> {
    DocumentBuffer::with_content(text, Box::new(NullTokenizer))
}

/// Same, backed by the rope store the server uses for real files
pub fn rope_buffer(text: &str) -> DocumentBuffer<RopeStore> {
    DocumentBuffer::with_content(text, Box::new(NullTokenizer))
}

/// Replace the selection set with the given (begin, end) spans
pub fn select<S: TextStore>(buffer: &mut DocumentBuffer<S>, spans: &[(usize, usize)]) {
    let selections: Vec<Selection> = {
        let text = buffer.text();
        spans
            .iter()
            .map(|&(begin, end)| Selection::span(text, begin, end))
            .collect()
    };
    buffer.selections = selections;
}

/// Current selection set as (begin, end) pairs
pub fn spans<S: TextStore>(buffer: &DocumentBuffer<S>) -> Vec<(usize, usize)> {
    buffer.selections.iter().map(|s| (s.begin, s.end)).collect()
}

/// An editor server wired to the built-in line script provider
pub fn server() -> EditorServer {
    EditorServer::new(Arc::new(LineScriptProvider::new()))
}
