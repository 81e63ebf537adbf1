//! Request/response correlation over a background worker.
//!
//! The executor owns at most one worker at a time. Each request gets a fresh
//! identifier and a pending slot; a router task reads the worker's outbox and
//! completes the slot whose identifier matches. Responses may arrive in any
//! order. A response for an identifier that is no longer pending (timed out,
//! or the executor was closed) is dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::error::ExecutorError;
use super::host::{ThreadHost, WorkerHost, WorkerPort};
use super::protocol::{Request, RequestKind, WorkerMessage, WorkerResponse};

/// Default time a request may wait for its response.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Per-request deadline
    pub timeout: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

struct PendingRequest {
    reply: oneshot::Sender<WorkerResponse>,
    kind: RequestKind,
}

type PendingMap = Arc<Mutex<HashMap<u64, PendingRequest>>>;

struct Running {
    port: Box<dyn WorkerPort>,
    router: JoinHandle<()>,
}

impl Running {
    /// The router ends when the worker drops its outbox or the runtime that
    /// spawned it shuts down. Either way this worker can no longer answer.
    fn is_stopped(&self) -> bool {
        self.router.is_finished()
    }
}

/// Background executor with identifier correlation and per-request timeouts.
///
/// Requires a tokio runtime: the worker is started lazily on the first
/// request (or an explicit [`Executor::open`]) and its responses are routed
/// by a task spawned on the current runtime. A worker that has stopped is
/// replaced on the next request.
pub struct Executor {
    host: Arc<dyn WorkerHost>,
    config: ExecutorConfig,
    next_id: AtomicU64,
    pending: PendingMap,
    state: Mutex<Option<Running>>,
}

impl Executor {
    /// Executor hosting its worker on a dedicated thread.
    pub fn new(config: ExecutorConfig) -> Self {
        Self::with_host(Arc::new(ThreadHost::new()), config)
    }

    /// Process-wide executor, created on first use.
    ///
    /// `config` only takes effect on the call that creates it.
    pub fn shared(config: ExecutorConfig) -> Arc<Executor> {
        static SHARED: OnceLock<Arc<Executor>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(Executor::new(config))))
    }

    pub fn with_host(host: Arc<dyn WorkerHost>, config: ExecutorConfig) -> Self {
        Self {
            host,
            config,
            next_id: AtomicU64::new(1),
            pending: Arc::new(Mutex::new(HashMap::new())),
            state: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Start the worker if it is not running. Idempotent.
    pub fn open(&self) -> Result<(), ExecutorError> {
        let mut state = lock(&self.state);
        self.ensure_running(&mut state).map(|_| ())
    }

    /// Tear down the worker.
    ///
    /// Every pending request resolves with [`ExecutorError::Closed`]. A later
    /// request starts a fresh worker; identifiers keep increasing.
    pub fn close(&self) {
        let Some(running) = lock(&self.state).take() else {
            return;
        };
        let abandoned = self.retire(running);
        debug!(host = self.host.name(), abandoned, "executor closed");
    }

    /// Whether a worker is running and its responses are still being routed.
    pub fn is_open(&self) -> bool {
        lock(&self.state)
            .as_ref()
            .is_some_and(|running| !running.is_stopped())
    }

    /// Number of requests still waiting for a response.
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Send `request` to the worker and wait for its response.
    pub async fn request(&self, request: Request) -> Result<Value, ExecutorError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let kind = request.kind();
        let message = serde_json::to_string(&WorkerMessage::new(id, &request)?)?;
        let (reply_tx, mut reply_rx) = oneshot::channel();

        let slot = PendingSlot {
            pending: &self.pending,
            id,
        };
        {
            let mut state = lock(&self.state);
            let running = self.ensure_running(&mut state)?;
            lock(&self.pending).insert(
                id,
                PendingRequest {
                    reply: reply_tx,
                    kind,
                },
            );
            running.port.post(message)?;
        }
        trace!(id, %kind, "request posted");

        match tokio::time::timeout(self.config.timeout, &mut reply_rx).await {
            Ok(Ok(response)) => into_result(response),
            Ok(Err(_)) => Err(ExecutorError::Closed(id)),
            Err(_) => {
                if slot.take() {
                    warn!(id, %kind, timeout = ?self.config.timeout, "worker request timed out");
                    return Err(ExecutorError::Timeout {
                        id,
                        after: self.config.timeout,
                    });
                }
                // The router claimed the slot as the deadline fired
                match reply_rx.try_recv() {
                    Ok(response) => into_result(response),
                    Err(_) => Err(ExecutorError::Closed(id)),
                }
            }
        }
    }

    fn ensure_running<'a>(
        &self,
        state: &'a mut Option<Running>,
    ) -> Result<&'a Running, ExecutorError> {
        if state.as_ref().is_some_and(Running::is_stopped) {
            if let Some(stale) = state.take() {
                let abandoned = self.retire(stale);
                warn!(host = self.host.name(), abandoned, "background worker stopped, restarting");
            }
        }

        if state.is_none() {
            let handle = Handle::try_current()
                .map_err(|e| ExecutorError::Unavailable(format!("no async runtime: {e}")))?;
            let (outbox, inbox) = mpsc::unbounded_channel();
            let port = self.host.spawn(outbox)?;
            let router = handle.spawn(route_responses(inbox, Arc::clone(&self.pending)));
            debug!(host = self.host.name(), "executor opened");
            *state = Some(Running { port, router });
        }
        state
            .as_ref()
            .ok_or_else(|| ExecutorError::Unavailable("worker did not start".to_string()))
    }

    /// Shut a worker down and drop every pending request. Returns how many
    /// requests were abandoned.
    fn retire(&self, running: Running) -> usize {
        running.port.terminate();
        running.router.abort();
        // Dropping the reply senders wakes every waiting caller
        lock(&self.pending).drain().count()
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

impl Drop for Executor {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("host", &self.host.name())
            .field("config", &self.config)
            .field("open", &self.is_open())
            .field("pending", &self.pending_count())
            .finish()
    }
}

/// Removes a request's pending entry on every exit path, including when the
/// caller's future is dropped mid-wait.
struct PendingSlot<'a> {
    pending: &'a PendingMap,
    id: u64,
}

impl PendingSlot<'_> {
    /// Remove the entry now. Returns false if the router already took it.
    fn take(&self) -> bool {
        lock(self.pending).remove(&self.id).is_some()
    }
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        lock(self.pending).remove(&self.id);
    }
}

async fn route_responses(mut inbox: UnboundedReceiver<String>, pending: PendingMap) {
    while let Some(raw) = inbox.recv().await {
        let response: WorkerResponse = match serde_json::from_str(&raw) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "discarding unreadable worker response");
                continue;
            }
        };

        let waiting = lock(&pending).remove(&response.id);
        match waiting {
            Some(request) => {
                trace!(id = response.id, kind = %request.kind, "response routed");
                // Receiver may have been dropped by a cancelled caller
                let _ = request.reply.send(response);
            }
            None => debug!(id = response.id, "dropping response with no pending request"),
        }
    }
}

fn into_result(response: WorkerResponse) -> Result<Value, ExecutorError> {
    if response.success {
        Ok(response.result.unwrap_or(Value::Null))
    } else {
        Err(ExecutorError::from_response(&response))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
