//! The editor session: open documents, the active command provider, and
//! file persistence.
//!
//! A server owns every open [`EditorFile`] and hands out [`FileId`] handles.
//! Buffers it opens share the provider and get one instance of each
//! registered change sink, so document observers see content from the
//! initial load onward.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::buffer::{ChangeSink, DocumentBuffer};
use crate::command::{self, CommandError, CommandKind, CommandProvider, PreviewRunner};
use crate::selection::Selection;
use crate::store::RopeStore;
use crate::syntax::ScanTokenizer;

/// Handle to an open file within a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(u64);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("unknown file handle")]
    UnknownFile,
    #[error("buffer has no file path")]
    NoPath,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// One open document: its backing path, if any, and its buffer.
pub struct EditorFile {
    path: Option<PathBuf>,
    buffer: DocumentBuffer<RopeStore>,
}

impl EditorFile {
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn buffer(&self) -> &DocumentBuffer<RopeStore> {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut DocumentBuffer<RopeStore> {
        &mut self.buffer
    }
}

type SinkFactory = Box<dyn Fn() -> Box<dyn ChangeSink> + Send>;

pub struct EditorServer {
    provider: Arc<dyn CommandProvider>,
    files: HashMap<FileId, EditorFile>,
    next_file_id: u64,
    sink_factories: Vec<SinkFactory>,
}

impl EditorServer {
    pub fn new(provider: Arc<dyn CommandProvider>) -> Self {
        Self {
            provider,
            files: HashMap::new(),
            next_file_id: 0,
            sink_factories: Vec::new(),
        }
    }

    pub fn provider(&self) -> &Arc<dyn CommandProvider> {
        &self.provider
    }

    /// Register a change-sink constructor. Every buffer opened afterwards
    /// gets one instance attached before its content loads.
    pub fn register_sink<F>(&mut self, factory: F)
    where
        F: Fn() -> Box<dyn ChangeSink> + Send + 'static,
    {
        self.sink_factories.push(Box::new(factory));
    }

    /// Open `path`. A missing file opens as an empty buffer bound to the
    /// path; it comes into existence on disk at the first save.
    pub fn open_file(&mut self, path: impl Into<PathBuf>) -> Result<FileId, ServerError> {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "missing file, opening empty");
                String::new()
            }
            Err(source) => return Err(ServerError::Read { path, source }),
        };
        Ok(self.track(Some(path), &content))
    }

    /// Open an unnamed buffer preloaded with `content`.
    pub fn open_scratch(&mut self, content: &str) -> FileId {
        self.track(None, content)
    }

    fn track(&mut self, path: Option<PathBuf>, content: &str) -> FileId {
        let mut buffer = DocumentBuffer::new(Box::new(ScanTokenizer));
        for factory in &self.sink_factories {
            buffer.add_sink(factory());
        }
        if !content.is_empty() {
            buffer.set_text(content);
            let caret = Selection::caret(buffer.text(), 0);
            buffer.selections = vec![caret];
            buffer.save_cursor_state();
        }
        let id = FileId(self.next_file_id);
        self.next_file_id += 1;
        match &path {
            Some(path) => tracing::info!(file = id.0, path = %path.display(), "opened file"),
            None => tracing::info!(file = id.0, "opened scratch buffer"),
        }
        self.files.insert(id, EditorFile { path, buffer });
        id
    }

    pub fn file(&self, id: FileId) -> Option<&EditorFile> {
        self.files.get(&id)
    }

    pub fn file_mut(&mut self, id: FileId) -> Option<&mut EditorFile> {
        self.files.get_mut(&id)
    }

    /// Open files in no particular order.
    pub fn files(&self) -> impl Iterator<Item = (FileId, &EditorFile)> {
        self.files.iter().map(|(id, file)| (*id, file))
    }

    /// Drop an open file, releasing its buffer and version history.
    pub fn close(&mut self, id: FileId) -> bool {
        let closed = self.files.remove(&id).is_some();
        if closed {
            tracing::info!(file = id.0, "closed");
        }
        closed
    }

    /// Write the buffer's content to its backing path.
    pub fn save(&self, id: FileId) -> Result<(), ServerError> {
        let file = self.files.get(&id).ok_or(ServerError::UnknownFile)?;
        let path = file.path.clone().ok_or(ServerError::NoPath)?;
        fs::write(&path, file.buffer.content()).map_err(|source| ServerError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "saved");
        Ok(())
    }

    /// Re-bind the buffer to `path`, then save.
    pub fn save_as(&mut self, id: FileId, path: impl Into<PathBuf>) -> Result<(), ServerError> {
        let file = self.files.get_mut(&id).ok_or(ServerError::UnknownFile)?;
        file.path = Some(path.into());
        self.save(id)
    }

    /// Run one pipeline operation against an open file with the server's
    /// provider.
    pub fn apply_command(
        &mut self,
        id: FileId,
        kind: CommandKind,
        script: &str,
    ) -> Result<(), ServerError> {
        let provider = Arc::clone(&self.provider);
        let file = self.files.get_mut(&id).ok_or(ServerError::UnknownFile)?;
        command::apply(&mut file.buffer, provider.as_ref(), kind, script)?;
        Ok(())
    }

    /// Start a preview for a command over `id`'s current inputs. Non-empty
    /// selection texts (or the whole content when there are none) are copied
    /// out here; the worker never touches the live buffer.
    pub fn preview_for(
        &self,
        id: FileId,
        debounce: Duration,
        cap: usize,
    ) -> Result<PreviewRunner, ServerError> {
        let file = self.files.get(&id).ok_or(ServerError::UnknownFile)?;
        let mut sources: Vec<String> = file
            .buffer
            .selections_text()
            .into_iter()
            .filter(|text| !text.is_empty())
            .collect();
        if sources.is_empty() {
            sources = vec![file.buffer.content()];
        }
        Ok(PreviewRunner::new(
            Arc::clone(&self.provider),
            sources,
            Box::new(ScanTokenizer),
            debounce,
            cap,
        ))
    }
}
