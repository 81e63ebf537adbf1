//! Hosting contexts for the background worker.
//!
//! A [`WorkerHost`] knows how to bring up one isolated worker context and
//! hands back a [`WorkerPort`] for posting envelopes into it. The executor
//! only talks to these traits, so tests can swap in deterministic stubs.

use std::sync::mpsc::{self, Sender};
use std::thread;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::error::ExecutorError;
use super::handler::worker_loop;

/// Channel on which a hosted worker delivers serialized responses.
pub type Outbox = UnboundedSender<String>;

/// Something that can host a background worker.
pub trait WorkerHost: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Start a worker context delivering its responses to `outbox`.
    ///
    /// Fails with [`ExecutorError::Unavailable`] when the context cannot be
    /// constructed.
    fn spawn(&self, outbox: Outbox) -> Result<Box<dyn WorkerPort>, ExecutorError>;
}

/// Inbound side of a running worker.
pub trait WorkerPort: Send {
    /// Post one serialized envelope to the worker.
    fn post(&self, message: String) -> Result<(), ExecutorError>;

    /// Tear the worker down. Requests still in flight are abandoned.
    fn terminate(self: Box<Self>);
}

/// Hosts the worker on a dedicated OS thread.
#[derive(Debug, Clone, Default)]
pub struct ThreadHost {
    thread_name: Option<String>,
}

impl ThreadHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the worker thread (defaults to `wallpipe-worker`).
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = Some(name.into());
        self
    }
}

impl WorkerHost for ThreadHost {
    fn name(&self) -> &'static str {
        "thread"
    }

    fn spawn(&self, outbox: Outbox) -> Result<Box<dyn WorkerPort>, ExecutorError> {
        let (request_tx, request_rx) = mpsc::channel::<String>();
        let name = self
            .thread_name
            .clone()
            .unwrap_or_else(|| "wallpipe-worker".to_string());

        thread::Builder::new()
            .name(name.clone())
            .spawn(move || worker_loop(request_rx, outbox))
            .map_err(|e| ExecutorError::Unavailable(format!("failed to spawn {name}: {e}")))?;

        debug!(thread = %name, "background worker started");
        Ok(Box::new(ThreadPort { request_tx }))
    }
}

struct ThreadPort {
    request_tx: Sender<String>,
}

impl WorkerPort for ThreadPort {
    fn post(&self, message: String) -> Result<(), ExecutorError> {
        self.request_tx
            .send(message)
            .map_err(|_| ExecutorError::Unavailable("worker thread has exited".to_string()))
    }

    fn terminate(self: Box<Self>) {
        // Dropping the sender ends worker_loop once its current request is done;
        // the thread is left detached.
        drop(self.request_tx);
    }
}
