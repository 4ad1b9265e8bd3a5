//! Cursor motion tests - horizontal, word, vertical, and line-edge movement
//! driven through the document buffer

mod common;

use common::{buffer, select, spans};

// ========================================================================
// Horizontal motion
// ========================================================================

#[test]
fn test_horizontal_moves_every_selection() {
    let mut buffer = buffer("abcdef\nabcdef");
    select(&mut buffer, &[(0, 0), (7, 7)]);
    buffer.move_horizontal(2, false);

    assert_eq!(spans(&buffer), vec![(2, 2), (9, 9)]);
}

#[test]
fn test_horizontal_clamps_at_buffer_edges() {
    let mut buffer = buffer("abc");
    select(&mut buffer, &[(1, 1)]);

    buffer.move_horizontal(-99, false);
    assert_eq!(spans(&buffer), vec![(0, 0)], "left edge clamps to 0");

    buffer.move_horizontal(99, false);
    assert_eq!(spans(&buffer), vec![(3, 3)], "right edge clamps to len");
}

#[test]
fn test_horizontal_extend_keeps_anchor() {
    let mut buffer = buffer("abcdef");
    select(&mut buffer, &[(2, 2)]);

    buffer.move_horizontal(3, true);
    assert_eq!(spans(&buffer), vec![(2, 5)]);

    // a plain move collapses the span onto the caret
    buffer.move_horizontal(1, false);
    assert_eq!(spans(&buffer), vec![(6, 6)]);
}

// ========================================================================
// Word motion
// ========================================================================

#[test]
fn test_word_motion_forward_stops_at_run_boundaries() {
    let mut buffer = buffer("fn main\nbody");
    select(&mut buffer, &[(0, 0)]);

    let mut stops = Vec::new();
    for _ in 0..5 {
        buffer.move_horizontal_word(1, false);
        stops.push(buffer.selections[0].end);
    }

    // word run, space run, word run, lone newline, word run
    assert_eq!(stops, vec![2, 3, 7, 8, 12]);
}

#[test]
fn test_word_motion_backward_retraces_runs() {
    let mut buffer = buffer("fn main\nbody");
    select(&mut buffer, &[(12, 12)]);

    let mut stops = Vec::new();
    for _ in 0..5 {
        buffer.move_horizontal_word(-1, false);
        stops.push(buffer.selections[0].end);
    }

    assert_eq!(stops, vec![8, 7, 3, 2, 0]);
}

// ========================================================================
// Vertical motion and column memory
// ========================================================================

#[test]
fn test_vertical_remembers_column_through_short_line() {
    let mut buffer = buffer("abcdef\nab\nabcdef");
    select(&mut buffer, &[(4, 4)]);

    buffer.move_vertical(1, false);
    assert_eq!(
        spans(&buffer),
        vec![(9, 9)],
        "short middle line stops the caret at its end"
    );

    buffer.move_vertical(1, false);
    assert_eq!(
        spans(&buffer),
        vec![(14, 14)],
        "the remembered column comes back on a long enough line"
    );

    buffer.move_vertical(-1, false);
    buffer.move_vertical(-1, false);
    assert_eq!(spans(&buffer), vec![(4, 4)], "round trip lands at the origin");
}

#[test]
fn test_vertical_round_trip_through_empty_line() {
    let mut buffer = buffer("ab\n\ncd");
    select(&mut buffer, &[(2, 2)]);

    buffer.move_vertical(1, false);
    assert_eq!(spans(&buffer), vec![(3, 3)]);

    buffer.move_vertical(1, false);
    assert_eq!(spans(&buffer), vec![(6, 6)], "column 2 restored past the empty line");
}

#[test]
fn test_vertical_stays_on_first_and_last_line() {
    let mut buffer = buffer("abc\ndef");
    select(&mut buffer, &[(2, 2)]);
    buffer.move_vertical(-1, false);
    assert_eq!(spans(&buffer), vec![(2, 2)], "up on the first line stays put");

    select(&mut buffer, &[(6, 6)]);
    buffer.move_vertical(1, false);
    assert_eq!(spans(&buffer), vec![(6, 6)], "down on the last line stays put");
}

#[test]
fn test_vertical_moves_every_selection() {
    let mut buffer = buffer("abc\nabc\nabc");
    select(&mut buffer, &[(1, 1), (5, 5)]);
    buffer.move_vertical(1, false);

    assert_eq!(spans(&buffer), vec![(5, 5), (9, 9)]);
}

#[test]
fn test_vertical_extend_grows_selection_across_lines() {
    let mut buffer = buffer("abc\ndef");
    select(&mut buffer, &[(1, 1)]);
    buffer.move_vertical(1, true);

    assert_eq!(spans(&buffer), vec![(1, 5)]);
}

// ========================================================================
// Line begin / line end
// ========================================================================

#[test]
fn test_line_begin_toggles_between_text_and_column_zero() {
    let mut buffer = buffer("  hello");
    select(&mut buffer, &[(5, 5)]);

    buffer.move_to_line_begin(false);
    assert_eq!(spans(&buffer), vec![(2, 2)], "first stop is the first non-blank");

    buffer.move_to_line_begin(false);
    assert_eq!(spans(&buffer), vec![(0, 0)], "second stop is column 0");

    buffer.move_to_line_begin(false);
    assert_eq!(spans(&buffer), vec![(2, 2)]);
}

#[test]
fn test_line_begin_on_blank_line_pins_to_line_start() {
    let mut buffer = buffer("ab\n   \ncd");
    select(&mut buffer, &[(5, 5)]);

    buffer.move_to_line_begin(false);
    assert_eq!(spans(&buffer), vec![(3, 3)]);

    buffer.move_to_line_begin(false);
    assert_eq!(spans(&buffer), vec![(3, 3)]);
}

#[test]
fn test_line_end_lands_on_newline() {
    let mut buffer = buffer("hello\nworld");
    select(&mut buffer, &[(1, 1)]);
    buffer.move_to_line_end(false);

    assert_eq!(spans(&buffer), vec![(5, 5)], "terminated line ends at its newline");
}

#[test]
fn test_line_end_on_final_line_lands_on_buffer_end() {
    let mut buffer = buffer("hello\nworld");
    select(&mut buffer, &[(8, 8)]);
    buffer.move_to_line_end(false);

    assert_eq!(spans(&buffer), vec![(11, 11)]);
}

#[test]
fn test_select_to_line_end_keeps_anchor() {
    let mut buffer = buffer("hello\nworld");
    select(&mut buffer, &[(7, 7)]);
    buffer.move_to_line_end(true);

    assert_eq!(spans(&buffer), vec![(7, 11)]);
    assert_eq!(buffer.selections_text(), vec!["orld".to_string()]);
}
