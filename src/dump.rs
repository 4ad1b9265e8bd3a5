//! Machine-readable dumps for the driver binary.

use serde::Serialize;

use stylus::buffer::DocumentBuffer;
use stylus::store::TextStore;

#[derive(Serialize)]
pub struct TokenDump {
    pub kind: String,
    pub begin: usize,
    pub end: usize,
}

#[derive(Serialize)]
pub struct SelectionDump {
    pub begin: usize,
    pub end: usize,
}

#[derive(Serialize)]
pub struct StateDump {
    pub id: usize,
    pub parent: Option<usize>,
    pub length: usize,
    pub cursors: Vec<SelectionDump>,
}

#[derive(Serialize)]
pub struct LinkDump {
    pub parent: usize,
    pub child: usize,
}

#[derive(Serialize)]
pub struct VersionDump {
    pub current: usize,
    pub initials: Vec<usize>,
    pub states: Vec<StateDump>,
    pub links: Vec<LinkDump>,
}

pub fn tokens<S: TextStore>(buffer: &DocumentBuffer<S>) -> Vec<TokenDump> {
    buffer
        .tokens()
        .iter()
        .map(|t| TokenDump {
            kind: format!("{:?}", t.kind),
            begin: t.begin,
            end: t.end,
        })
        .collect()
}

pub fn selections<S: TextStore>(buffer: &DocumentBuffer<S>) -> Vec<SelectionDump> {
    buffer
        .selections
        .iter()
        .map(|s| SelectionDump {
            begin: s.begin,
            end: s.end,
        })
        .collect()
}

pub fn versions<S: TextStore>(buffer: &DocumentBuffer<S>) -> VersionDump {
    let history = buffer.history();
    let (states, links) = buffer.version_graph();
    VersionDump {
        current: buffer.current_state().index(),
        initials: history.initial_states().iter().map(|s| s.index()).collect(),
        states: states
            .iter()
            .map(|&id| StateDump {
                id: id.index(),
                parent: history.parent(id).map(|p| p.index()),
                length: history.content(id).len(),
                cursors: history
                    .cursors(id)
                    .iter()
                    .map(|c| SelectionDump {
                        begin: c.begin,
                        end: c.end,
                    })
                    .collect(),
            })
            .collect(),
        links: links
            .iter()
            .map(|l| LinkDump {
                parent: l.parent.index(),
                child: l.child.index(),
            })
            .collect(),
    }
}
