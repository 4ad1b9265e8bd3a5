//! The command pipeline: named operations that run a user-supplied script
//! against a document through a pluggable [`CommandProvider`].
//!
//! Three operations exist. `edit` feeds selection texts to the provider and
//! splices the results back into the buffer, `find` re-targets the selection
//! set with a regex search, and `powerEdit` hands the selections themselves
//! to the provider and adopts whatever ranges come back. Content mutation
//! always goes through [`DocumentBuffer`](crate::buffer::DocumentBuffer), so
//! every splice lands in the version history and rebases the cursors.

mod pipeline;
mod preview;
mod script;

pub use pipeline::apply;
pub use preview::PreviewRunner;
pub use script::LineScriptProvider;

use thiserror::Error;

use crate::selection::Selection;
use crate::syntax::{ScanTokenizer, Tokenizer};

/// The named operations of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Replace selection texts (or the whole buffer) with provider output
    Edit,
    /// Re-target the selection set with a regex search
    Find,
    /// Let the provider rewrite the selection ranges directly
    PowerEdit,
}

/// Failure of a pipeline operation. The buffer and selections are left
/// untouched when one of these comes back.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The provider reported an error instead of results.
    #[error("command failed: {0}")]
    Provider(String),
    /// The `find` pattern did not compile.
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// One item of a selection-aware execution. `powerEdit` keeps the
/// selection-typed items and ignores plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Text(String),
    Selection { begin: usize, end: usize },
}

/// Which starter script a UI is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    Edit,
    Replace,
    PowerEdit,
}

/// A starter script plus the range within it a UI should preselect, so the
/// user lands on the part worth changing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleScript {
    pub select_begin: usize,
    pub select_end: usize,
    pub text: String,
}

impl ExampleScript {
    pub fn new(select_begin: usize, select_end: usize, text: impl Into<String>) -> Self {
        Self {
            select_begin,
            select_end,
            text: text.into(),
        }
    }
}

/// Backend that executes pipeline scripts. Implementations run anything from
/// an in-process interpreter to an external process; the pipeline only sees
/// texts in, texts out.
pub trait CommandProvider: Send + Sync {
    /// Run `command` against the input texts. `Err` carries the backend's
    /// error text verbatim.
    fn execute(&self, command: &str, args: &[String]) -> Result<Vec<String>, String>;

    /// Selection-aware entry point for `powerEdit`. The default renders each
    /// range as a `begin,end` argument and falls back to text execution, so
    /// text-only providers keep working (their results simply carry no
    /// ranges).
    fn execute_selections(
        &self,
        command: &str,
        selections: &[Selection],
    ) -> Result<Vec<CommandResult>, String> {
        let args: Vec<String> = selections
            .iter()
            .map(|s| format!("{},{}", s.begin, s.end))
            .collect();
        let results = self.execute(command, &args)?;
        Ok(results.into_iter().map(CommandResult::Text).collect())
    }

    /// Starter script for `kind`.
    fn example_script(&self, kind: ScriptKind) -> ExampleScript;

    /// Lexer for buffers holding this provider's scripts.
    fn tokenizer(&self) -> Box<dyn Tokenizer + Send> {
        Box::new(ScanTokenizer)
    }
}
