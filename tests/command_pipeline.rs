//! Command pipeline tests - edit, find, and powerEdit run end to end through
//! the editor server with the line script provider

mod common;

use common::{select, server, spans};
use stylus::command::CommandError;
use stylus::server::ServerError;
use stylus::CommandKind;

fn selection_spans(server: &stylus::EditorServer, id: stylus::FileId) -> Vec<(usize, usize)> {
    spans(server.file(id).unwrap().buffer())
}

// ========================================================================
// edit
// ========================================================================

#[test]
fn test_edit_transforms_each_selection_in_place() {
    let mut server = server();
    let id = server.open_scratch("foo bar");
    select(server.file_mut(id).unwrap().buffer_mut(), &[(0, 3), (4, 7)]);

    server.apply_command(id, CommandKind::Edit, "upper").unwrap();

    assert_eq!(server.file(id).unwrap().buffer().content(), "FOO BAR");
    assert_eq!(selection_spans(&server, id), vec![(0, 3), (4, 7)]);
}

#[test]
fn test_edit_join_reflows_from_the_last_selection() {
    let mut server = server();
    let id = server.open_scratch("aa\nbb");
    select(server.file_mut(id).unwrap().buffer_mut(), &[(0, 2), (3, 5)]);

    server.apply_command(id, CommandKind::Edit, "join -").unwrap();

    // two sources merged into one result: both ranges are consumed and the
    // single result is laid out at the last selection's caret
    assert_eq!(server.file(id).unwrap().buffer().content(), "\naa-bb");
    assert_eq!(selection_spans(&server, id), vec![(1, 6)]);
}

#[test]
fn test_edit_lines_fans_one_selection_out_to_many() {
    let mut server = server();
    let id = server.open_scratch("x\ny");
    select(server.file_mut(id).unwrap().buffer_mut(), &[(0, 3)]);

    server.apply_command(id, CommandKind::Edit, "lines").unwrap();

    assert_eq!(server.file(id).unwrap().buffer().content(), "xy");
    assert_eq!(selection_spans(&server, id), vec![(0, 1), (1, 2)]);
}

#[test]
fn test_edit_without_selection_consumes_whole_buffer() {
    let mut server = server();
    let id = server.open_scratch("  hi  ");

    server
        .apply_command(id, CommandKind::Edit, "trim | upper")
        .unwrap();

    assert_eq!(server.file(id).unwrap().buffer().content(), "HI");
    assert_eq!(selection_spans(&server, id), vec![(0, 2)]);
}

#[test]
fn test_edit_sorts_a_whole_file() {
    let mut server = server();
    let id = server.open_scratch("b\na\nc");

    server.apply_command(id, CommandKind::Edit, "sort").unwrap();

    assert_eq!(server.file(id).unwrap().buffer().content(), "a\nb\nc");
}

#[test]
fn test_edit_script_error_leaves_the_buffer_untouched() {
    let mut server = server();
    let id = server.open_scratch("abc");
    select(server.file_mut(id).unwrap().buffer_mut(), &[(0, 2)]);
    let states = server.file(id).unwrap().buffer().history().state_count();

    let err = server
        .apply_command(id, CommandKind::Edit, "shift 1")
        .unwrap_err();

    assert!(matches!(
        err,
        ServerError::Command(CommandError::Provider(_))
    ));
    assert_eq!(server.file(id).unwrap().buffer().content(), "abc");
    assert_eq!(selection_spans(&server, id), vec![(0, 2)]);
    assert_eq!(
        server.file(id).unwrap().buffer().history().state_count(),
        states,
        "a failed command must not commit"
    );
}

// ========================================================================
// find
// ========================================================================

#[test]
fn test_find_spans_every_match_in_the_buffer() {
    let mut server = server();
    let id = server.open_scratch("ab\ncab\n");

    server.apply_command(id, CommandKind::Find, "a").unwrap();

    assert_eq!(selection_spans(&server, id), vec![(0, 1), (4, 5)]);
}

#[test]
fn test_find_then_edit_rewrites_the_matches() {
    let mut server = server();
    let id = server.open_scratch("one two one");

    server.apply_command(id, CommandKind::Find, "one").unwrap();
    assert_eq!(selection_spans(&server, id), vec![(0, 3), (8, 11)]);

    server.apply_command(id, CommandKind::Edit, "upper").unwrap();
    assert_eq!(server.file(id).unwrap().buffer().content(), "ONE two ONE");
    assert_eq!(selection_spans(&server, id), vec![(0, 3), (8, 11)]);
}

#[test]
fn test_find_bad_pattern_reports_and_keeps_selections() {
    let mut server = server();
    let id = server.open_scratch("abc");
    select(server.file_mut(id).unwrap().buffer_mut(), &[(0, 3)]);

    let err = server.apply_command(id, CommandKind::Find, "(").unwrap_err();

    assert!(matches!(err, ServerError::Command(CommandError::Pattern(_))));
    assert_eq!(selection_spans(&server, id), vec![(0, 3)]);
}

// ========================================================================
// powerEdit
// ========================================================================

#[test]
fn test_power_edit_moves_selections_without_touching_content() {
    let mut server = server();
    let id = server.open_scratch("hello!");
    select(server.file_mut(id).unwrap().buffer_mut(), &[(0, 2), (3, 5)]);

    server
        .apply_command(id, CommandKind::PowerEdit, "shift 1 | grow 1")
        .unwrap();

    assert_eq!(server.file(id).unwrap().buffer().content(), "hello!");
    assert_eq!(
        selection_spans(&server, id),
        vec![(1, 4), (4, 6)],
        "ranges shift then grow, clamped to the content"
    );
}

#[test]
fn test_power_edit_rejects_text_stages() {
    let mut server = server();
    let id = server.open_scratch("abc");
    select(server.file_mut(id).unwrap().buffer_mut(), &[(0, 2)]);

    let err = server
        .apply_command(id, CommandKind::PowerEdit, "upper")
        .unwrap_err();

    assert!(err.to_string().contains("text command in a selection context"));
    assert_eq!(selection_spans(&server, id), vec![(0, 2)]);
}
