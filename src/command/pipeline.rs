//! Applying a named operation to a document buffer.

use regex::RegexBuilder;

use super::{CommandError, CommandKind, CommandProvider, CommandResult};
use crate::buffer::DocumentBuffer;
use crate::selection::Selection;
use crate::store::TextStore;

/// Run one pipeline operation against `buffer`. The provider call happens
/// before any mutation, so an `Err` leaves both content and selections
/// exactly as they were.
pub fn apply<S: TextStore>(
    buffer: &mut DocumentBuffer<S>,
    provider: &dyn CommandProvider,
    kind: CommandKind,
    command: &str,
) -> Result<(), CommandError> {
    match kind {
        CommandKind::Edit => apply_edit(buffer, provider, command),
        CommandKind::Find => apply_find(buffer, command),
        CommandKind::PowerEdit => apply_power_edit(buffer, provider, command),
    }
}

/// Feed selection texts (or the whole buffer when every selection is empty)
/// to the provider, delete the consumed ranges, and splice the results back.
///
/// When the provider returns exactly one result per selection, each result
/// replaces its selection in place. Any other count reflows: the results are
/// laid out sequentially from the end of the last old selection, one new
/// selection spanning each.
fn apply_edit<S: TextStore>(
    buffer: &mut DocumentBuffer<S>,
    provider: &dyn CommandProvider,
    command: &str,
) -> Result<(), CommandError> {
    let texts = buffer.selections_text();
    let sources: Vec<String> = texts.into_iter().filter(|t| !t.is_empty()).collect();
    let used_all_text = sources.is_empty();
    let sources = if used_all_text {
        vec![buffer.content()]
    } else {
        sources
    };

    let results = provider
        .execute(command, &sources)
        .map_err(CommandError::Provider)?;
    tracing::debug!(
        inputs = sources.len(),
        outputs = results.len(),
        used_all_text,
        "edit command"
    );

    // Consume the sources. Each delete rebases the remaining selections, so
    // later ranges stay valid while earlier ones collapse.
    if used_all_text {
        buffer.delete_string(0, buffer.len() as i64);
    } else {
        for i in 0..buffer.selections.len() {
            let sel = buffer.selections[i];
            buffer.delete_string(sel.min() as i64, sel.text_length() as i64);
        }
    }

    if results.len() == buffer.selections.len() {
        for (i, item) in results.iter().enumerate() {
            let begin = buffer.selections[i].end;
            buffer.selections[i].begin = begin;
            let end = buffer.insert_at_selection(i, item);
            buffer.set_selection_range(i, begin, end);
        }
    } else {
        let mut begin = buffer.selections.last().map_or(0, |s| s.end);
        buffer.selections.clear();
        let mut spans = Vec::with_capacity(results.len());
        for item in &results {
            let end = buffer.insert_string(begin, item);
            spans.push((begin, end));
            begin = end;
        }
        let text = buffer.text();
        buffer.selections = spans
            .iter()
            .map(|&(b, e)| Selection::span(text, b, e))
            .collect();
    }
    Ok(())
}

/// Search each non-empty selection's text (or the whole buffer when there is
/// none) and replace the selection set with one span per match. `.` matches
/// newlines; match offsets are anchored back to the scope's start.
fn apply_find<S: TextStore>(
    buffer: &mut DocumentBuffer<S>,
    pattern: &str,
) -> Result<(), CommandError> {
    let matcher = RegexBuilder::new(pattern)
        .dot_matches_new_line(true)
        .build()?;

    let mut scopes: Vec<(usize, String)> = Vec::new();
    {
        let text = buffer.text();
        for sel in &buffer.selections {
            if sel.text_length() > 0 {
                scopes.push((sel.min(), sel.text(text)));
            }
        }
    }
    if scopes.is_empty() {
        scopes.push((0, buffer.content()));
    }

    let mut spans: Vec<(usize, usize)> = Vec::new();
    for (anchor, scope) in &scopes {
        for found in matcher.find_iter(scope) {
            // regex offsets are bytes; the buffer speaks chars
            let begin = anchor + scope[..found.start()].chars().count();
            let length = found.as_str().chars().count();
            spans.push((begin, begin + length));
        }
    }
    tracing::debug!(scopes = scopes.len(), matches = spans.len(), "find command");

    let text = buffer.text();
    buffer.selections = spans
        .iter()
        .map(|&(b, e)| Selection::span(text, b, e))
        .collect();
    Ok(())
}

/// Hand the selection ranges to the provider and adopt the selection-typed
/// results, clamped to the content. Text results are dropped and the content
/// itself is never touched.
fn apply_power_edit<S: TextStore>(
    buffer: &mut DocumentBuffer<S>,
    provider: &dyn CommandProvider,
    command: &str,
) -> Result<(), CommandError> {
    let results = provider
        .execute_selections(command, &buffer.selections)
        .map_err(CommandError::Provider)?;

    let len = buffer.len();
    let mut spans: Vec<(usize, usize)> = Vec::new();
    for result in results {
        if let CommandResult::Selection { begin, end } = result {
            spans.push((begin.min(len), end.min(len)));
        }
    }
    tracing::debug!(selections = spans.len(), "power edit command");

    let text = buffer.text();
    buffer.selections = spans
        .iter()
        .map(|&(b, e)| Selection::span(text, b, e))
        .collect();
    Ok(())
}
