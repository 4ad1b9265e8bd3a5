//! Versioned history: a DAG of immutable content snapshots.
//!
//! Every edit produces a new `State` as a child of the current one, so undo
//! does not destroy anything: editing after an undo opens a new branch and
//! the abandoned branch stays reachable. States live in an arena and are
//! addressed by `StateId`, which keeps the parent/child graph free of owning
//! pointers.
//!
//! The mutation protocol is duplicate, modify, commit: `duplicate` clones a
//! committed state (content sharing makes this cheap for ropes), one or more
//! `modify` calls edit the open duplicate in place, and `commit` seals it and
//! publishes the parent edge. Callers must not hold an uncommitted state
//! across a call boundary.

use thiserror::Error;

use crate::store::TextStore;

/// Opaque handle to a state in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(usize);

impl StateId {
    /// Arena index, stable for the lifetime of the tree
    pub fn index(self) -> usize {
        self.0
    }
}

/// A (begin, end) selection range snapshotted against a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedCursor {
    pub begin: usize,
    pub end: usize,
}

/// Parent-to-child edge in the version DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub parent: StateId,
    pub child: StateId,
}

/// One in-place edit applied to an uncommitted state.
#[derive(Debug, Clone, Copy)]
pub enum Modification<'a> {
    Insert { position: usize, text: &'a str },
    Delete { position: usize, length: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("modification at {position} (length {length}) out of range for content of length {len}")]
    OutOfRange {
        position: usize,
        length: usize,
        len: usize,
    },
    #[error("state {0:?} is already committed")]
    Committed(StateId),
    #[error("no ancestor {steps} steps above {from:?}")]
    NoSuchAncestor { from: StateId, steps: usize },
}

#[derive(Debug, Clone)]
struct State<S> {
    content: S,
    parent: Option<StateId>,
    children: Vec<StateId>,
    cursors: Vec<SavedCursor>,
    committed: bool,
}

/// Arena of states plus the parent/child edges between them.
///
/// The tree does not know which state is "current"; that pointer belongs to
/// the document buffer driving it.
#[derive(Debug, Clone, Default)]
pub struct VersionTree<S> {
    states: Vec<State<S>>,
}

impl<S: TextStore> VersionTree<S> {
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    /// Create a root state with empty content. Uncommitted, like every new
    /// state; callers run it through the same modify/commit protocol.
    pub fn new_state(&mut self) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(State {
            content: S::default(),
            parent: None,
            children: Vec::new(),
            cursors: Vec::new(),
            committed: false,
        });
        id
    }

    /// Create an uncommitted child of `parent` sharing its content until
    /// modified.
    pub fn duplicate(&mut self, parent: StateId) -> StateId {
        let id = StateId(self.states.len());
        let content = self.states[parent.0].content.clone();
        self.states.push(State {
            content,
            parent: Some(parent),
            children: Vec::new(),
            cursors: Vec::new(),
            committed: false,
        });
        id
    }

    /// Apply one edit to an uncommitted state.
    pub fn modify(&mut self, id: StateId, m: Modification<'_>) -> Result<(), HistoryError> {
        let state = &mut self.states[id.0];
        if state.committed {
            tracing::error!(state = id.0, "modify called on a committed state");
            return Err(HistoryError::Committed(id));
        }
        let len = state.content.len();
        match m {
            Modification::Insert { position, text } => {
                if position > len {
                    return Err(HistoryError::OutOfRange {
                        position,
                        length: text.chars().count(),
                        len,
                    });
                }
                state.content.insert(position, text);
            }
            Modification::Delete { position, length } => {
                if position.saturating_add(length) > len {
                    return Err(HistoryError::OutOfRange {
                        position,
                        length,
                        len,
                    });
                }
                state.content.delete(position, length);
            }
        }
        Ok(())
    }

    /// Seal a state and publish its parent edge. Committing twice is a no-op.
    pub fn commit(&mut self, id: StateId) {
        if self.states[id.0].committed {
            return;
        }
        self.states[id.0].committed = true;
        if let Some(parent) = self.states[id.0].parent {
            self.states[parent.0].children.push(id);
        }
        tracing::debug!(state = id.0, "committed");
    }

    /// Ancestor `steps` commits up the parent chain.
    pub fn step_back(&self, id: StateId, steps: usize) -> Result<StateId, HistoryError> {
        let mut current = id;
        for _ in 0..steps {
            match self.states[current.0].parent {
                Some(parent) => current = parent,
                None => return Err(HistoryError::NoSuchAncestor { from: id, steps }),
            }
        }
        Ok(current)
    }

    /// All states plus the committed parent-to-child edges, for tree browsing.
    pub fn all_states(&self) -> (Vec<StateId>, Vec<Link>) {
        let states: Vec<StateId> = (0..self.states.len()).map(StateId).collect();
        let mut links = Vec::new();
        for (i, state) in self.states.iter().enumerate() {
            for &child in &state.children {
                links.push(Link {
                    parent: StateId(i),
                    child,
                });
            }
        }
        (states, links)
    }

    /// The parentless root(s), entry points for browsing.
    pub fn initial_states(&self) -> Vec<StateId> {
        (0..self.states.len())
            .map(StateId)
            .filter(|id| self.states[id.0].parent.is_none())
            .collect()
    }

    pub fn parent(&self, id: StateId) -> Option<StateId> {
        self.states[id.0].parent
    }

    pub fn is_committed(&self, id: StateId) -> bool {
        self.states[id.0].committed
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Content snapshot of a state.
    pub fn content(&self, id: StateId) -> &S {
        &self.states[id.0].content
    }

    /// Attach a cursor-range snapshot to a state, replacing any previous one.
    pub fn save_cursors(&mut self, id: StateId, cursors: &[SavedCursor]) {
        self.states[id.0].cursors = cursors.to_vec();
    }

    /// Cursor-range snapshot of a state; empty if none was ever saved.
    pub fn cursors(&self, id: StateId) -> &[SavedCursor] {
        &self.states[id.0].cursors
    }
}
