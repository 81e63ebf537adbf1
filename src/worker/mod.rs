//! Background execution of decode and sort work.
//!
//! The [`Executor`] posts serialized requests to a worker hosted by a
//! [`WorkerHost`] (a dedicated thread by default) and correlates the
//! responses by identifier. The worker runs the same codec and sorting code
//! as the inline path, via [`handler::process`].

pub mod error;
pub mod executor;
pub mod handler;
pub mod host;
pub mod protocol;

pub use error::ExecutorError;
pub use executor::{Executor, ExecutorConfig, DEFAULT_TIMEOUT};
pub use host::{Outbox, ThreadHost, WorkerHost, WorkerPort};
pub use protocol::{Request, RequestKind, WorkerMessage, WorkerResponse};
