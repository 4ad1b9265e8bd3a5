//! Debounced background preview of a pipeline command.
//!
//! The runner owns a worker thread and a scratch buffer. Source texts are
//! copied out of the live document once, at construction; the worker only
//! ever touches those copies and the scratch, so the live buffer stays
//! single-threaded. Every keystroke in the script marks the preview dirty,
//! and the worker re-executes once the script has been quiet for the
//! debounce interval.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::buffer::{ChangeSink, DocumentBuffer};
use crate::command::CommandProvider;
use crate::store::StringStore;
use crate::syntax::Tokenizer;

enum PreviewMsg {
    Script(String),
    Shutdown,
}

/// Background evaluator for the script a user is still typing.
pub struct PreviewRunner {
    tx: Sender<PreviewMsg>,
    worker: Option<JoinHandle<()>>,
    scratch: Arc<Mutex<DocumentBuffer<StringStore>>>,
}

impl PreviewRunner {
    /// Start the worker. `sources` are the copied-out input texts the
    /// provider will run against; `cap` bounds the rendered output in bytes.
    pub fn new(
        provider: Arc<dyn CommandProvider>,
        sources: Vec<String>,
        tokenizer: Box<dyn Tokenizer + Send>,
        debounce: Duration,
        cap: usize,
    ) -> Self {
        let scratch = Arc::new(Mutex::new(DocumentBuffer::with_content(
            "processing ...",
            tokenizer,
        )));
        tracing::debug!(
            sources = sources.len(),
            debounce_ms = debounce.as_millis() as u64,
            "preview worker started"
        );
        let (tx, rx) = mpsc::channel();
        let worker_scratch = Arc::clone(&scratch);
        let worker = thread::spawn(move || {
            run_worker(provider, sources, rx, worker_scratch, debounce, cap);
        });
        Self {
            tx,
            worker: Some(worker),
            scratch,
        }
    }

    /// The buffer the worker writes rendered results into.
    pub fn scratch(&self) -> Arc<Mutex<DocumentBuffer<StringStore>>> {
        Arc::clone(&self.scratch)
    }

    /// Current rendered preview text.
    pub fn output(&self) -> String {
        self.scratch
            .lock()
            .map(|buffer| buffer.content())
            .unwrap_or_default()
    }

    /// Note that the script changed. The worker re-executes after the
    /// debounce interval passes without another change.
    pub fn mark_dirty(&self, script: &str) {
        let _ = self.tx.send(PreviewMsg::Script(script.to_string()));
    }

    /// A change sink that marks the preview dirty with the script buffer's
    /// new content. Attach it to the buffer the script is typed into.
    pub fn script_sink(&self) -> Box<dyn ChangeSink> {
        Box::new(ScriptSink {
            tx: self.tx.clone(),
        })
    }
}

impl Drop for PreviewRunner {
    fn drop(&mut self) {
        let _ = self.tx.send(PreviewMsg::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

struct ScriptSink {
    tx: Sender<PreviewMsg>,
}

impl ChangeSink for ScriptSink {
    fn document_changed(&mut self, content: &str) {
        let _ = self.tx.send(PreviewMsg::Script(content.to_string()));
    }
}

fn run_worker(
    provider: Arc<dyn CommandProvider>,
    sources: Vec<String>,
    rx: Receiver<PreviewMsg>,
    scratch: Arc<Mutex<DocumentBuffer<StringStore>>>,
    debounce: Duration,
    cap: usize,
) {
    loop {
        let script = match rx.recv() {
            Ok(PreviewMsg::Script(script)) => script,
            Ok(PreviewMsg::Shutdown) | Err(_) => return,
        };
        let Some(script) = settle(&rx, script, debounce) else {
            return;
        };
        let rendered = render(provider.execute(&script, &sources), cap);
        let Ok(mut buffer) = scratch.lock() else {
            return;
        };
        buffer.set_text(&rendered);
    }
}

/// Keep absorbing newer scripts until none arrives for `debounce`.
fn settle(rx: &Receiver<PreviewMsg>, mut script: String, debounce: Duration) -> Option<String> {
    loop {
        match rx.recv_timeout(debounce) {
            Ok(PreviewMsg::Script(newer)) => script = newer,
            Ok(PreviewMsg::Shutdown) => return None,
            Err(RecvTimeoutError::Timeout) => return Some(script),
            Err(RecvTimeoutError::Disconnected) => return None,
        }
    }
}

fn render(result: Result<Vec<String>, String>, cap: usize) -> String {
    match result {
        Err(error) => format!("-> Error:\n{error}"),
        Ok(results) => {
            let text = results.join("\n");
            if text.len() > cap {
                format!("Too big result [>{}KB]", cap / 1024)
            } else {
                text
            }
        }
    }
}
