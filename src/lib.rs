//! Stylus - a branching-history, multi-cursor editing core
//!
//! This crate provides the document model for a text editor: immutable
//! version history shaped as a DAG, multi-selection editing with positional
//! rebasing, and a scriptable command pipeline with background preview.

pub mod buffer;
pub mod cli;
pub mod command;
pub mod config;
pub mod config_paths;
pub mod history;
pub mod selection;
pub mod server;
pub mod store;
pub mod syntax;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use buffer::{ChangeSink, DocumentBuffer, ErrorMark};
pub use command::{CommandKind, CommandProvider, CommandResult, LineScriptProvider, PreviewRunner};
pub use config::EditorConfig;
pub use history::{StateId, VersionTree};
pub use selection::Selection;
pub use server::{EditorServer, FileId};
pub use store::{RopeStore, StringStore, TextStore};
