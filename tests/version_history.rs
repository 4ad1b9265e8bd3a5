//! Version history tests - undo, redo, branching, and version jumps

mod common;

use common::{buffer, select, spans};
use stylus::history::Link;
use stylus::TextStore;

// ========================================================================
// Undo / redo
// ========================================================================

#[test]
fn test_undo_redo_restores_content_and_selection() {
    let mut buffer = buffer("hello");
    select(&mut buffer, &[(1, 3)]);
    buffer.insert_string(5, "!");
    assert_eq!(buffer.content(), "hello!");

    buffer.undo();
    assert_eq!(buffer.content(), "hello");
    assert_eq!(spans(&buffer), vec![(0, 0)], "snapshot of the older state");

    assert!(buffer.redo());
    assert_eq!(buffer.content(), "hello!");
    assert_eq!(spans(&buffer), vec![(1, 3)], "snapshot of the newer state");
}

#[test]
fn test_new_edit_clears_the_redo_path() {
    let mut buffer = buffer("x");
    buffer.insert_string(1, "y");
    buffer.undo();
    assert!(buffer.can_redo());

    buffer.insert_string(1, "z");
    assert!(!buffer.can_redo());
    assert!(!buffer.redo());
    assert_eq!(buffer.content(), "xz");
}

#[test]
fn test_plain_navigation_keeps_the_redo_path() {
    let mut buffer = buffer("ab");
    buffer.insert_string(2, "c");
    buffer.undo();

    // motion and selection changes commit nothing
    buffer.move_horizontal(1, false);
    buffer.select_all();

    assert!(buffer.redo());
    assert_eq!(buffer.content(), "abc");
}

#[test]
fn test_deep_undo_walks_back_to_the_empty_root() {
    let mut buffer = buffer("base");
    buffer.insert_string(4, " 1");
    buffer.insert_string(6, " 2");
    assert_eq!(buffer.content(), "base 1 2");

    assert!(buffer.undo());
    assert_eq!(buffer.content(), "base 1");
    assert!(buffer.undo());
    assert_eq!(buffer.content(), "base");
    assert!(buffer.undo());
    assert_eq!(buffer.content(), "", "the root state is the empty document");
    assert!(!buffer.can_undo());

    assert!(!buffer.undo(), "undo at the root is a no-op");
    assert_eq!(buffer.content(), "");

    assert!(buffer.redo());
    assert_eq!(buffer.content(), "base");
    assert!(buffer.redo());
    assert!(buffer.redo());
    assert_eq!(buffer.content(), "base 1 2");
    assert!(!buffer.redo());
}

// ========================================================================
// Branching
// ========================================================================

#[test]
fn test_editing_after_undo_opens_a_branch() {
    let mut buffer = buffer("base");
    let base_state = buffer.current_state();

    buffer.insert_string(4, " A");
    let a_state = buffer.current_state();
    buffer.undo();
    assert_eq!(buffer.current_state(), base_state);

    buffer.insert_string(4, " B");
    let b_state = buffer.current_state();
    assert_eq!(buffer.content(), "base B");

    // the abandoned branch still holds its content
    assert_eq!(buffer.history().content(a_state).content(), "base A");

    let (states, links) = buffer.version_graph();
    assert_eq!(states.len(), 4, "root, base, and the two branch tips");
    assert!(links.contains(&Link {
        parent: base_state,
        child: a_state,
    }));
    assert!(links.contains(&Link {
        parent: base_state,
        child: b_state,
    }));
}

#[test]
fn test_graph_has_a_single_committed_root() {
    let mut buffer = buffer("a");
    buffer.insert_string(1, "b");

    let roots = buffer.history().initial_states();
    assert_eq!(roots.len(), 1);
    assert!(buffer.history().parent(roots[0]).is_none());
    assert!(buffer.history().is_committed(roots[0]));
}

#[test]
fn test_state_count_tracks_commits_only() {
    let mut buffer = buffer("ab");
    assert_eq!(buffer.history().state_count(), 2, "root plus the loaded content");

    buffer.insert_string(2, "c");
    assert_eq!(buffer.history().state_count(), 3);

    buffer.undo();
    buffer.redo();
    buffer.move_horizontal(1, false);
    buffer.select_all();
    buffer.insert_string(3, "");
    buffer.delete_string(0, 0);

    assert_eq!(buffer.history().state_count(), 3, "navigation and no-ops commit nothing");
}

// ========================================================================
// Version jumps
// ========================================================================

#[test]
fn test_set_version_restores_content_and_snapshot() {
    let mut buffer = buffer("one");
    select(&mut buffer, &[(0, 3)]);
    buffer.insert_string(3, " two");
    let two = buffer.current_state();
    assert_eq!(spans(&buffer), vec![(0, 7)]);

    buffer.undo();
    buffer.insert_string(3, " three");
    assert_eq!(buffer.content(), "one three");

    buffer.set_version(two);
    assert_eq!(buffer.current_state(), two);
    assert_eq!(buffer.content(), "one two");
    assert_eq!(spans(&buffer), vec![(0, 7)], "jump restores the state's cursor snapshot");
}
