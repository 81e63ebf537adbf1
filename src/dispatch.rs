//! Dispatch facade.
//!
//! Decides per call whether work goes through the background [`Executor`] or
//! runs inline. Background failures of any kind (timeout, unavailable worker,
//! a failed response) are logged and answered by computing the same operation
//! inline, so callers only ever see errors the inline path would raise too.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::{PopularityMap, Wallpaper};
use crate::codec::{self, CodecError};
use crate::sorting::{self, Filters, SortOptions, SortRoutine, UnknownSortRoutine};
use crate::worker::{Executor, Request};

/// Sort/filter inputs shorter than this run inline.
pub const DEFAULT_INLINE_THRESHOLD: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    pub inline_threshold: usize,
    /// When false every call runs inline
    pub use_background: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            inline_threshold: DEFAULT_INLINE_THRESHOLD,
            use_background: true,
        }
    }
}

/// Errors that reach the caller of the facade.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Decoded payload is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    UnknownOperation(#[from] UnknownSortRoutine),
}

/// Entry point for decode and sort work.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    executor: Option<Arc<Executor>>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(executor: Arc<Executor>, config: DispatchConfig) -> Self {
        let executor = config.use_background.then_some(executor);
        Self { executor, config }
    }

    /// Dispatcher that never leaves the calling task.
    pub fn inline_only() -> Self {
        Self {
            executor: None,
            config: DispatchConfig {
                use_background: false,
                ..DispatchConfig::default()
            },
        }
    }

    /// Dispatcher over the process-wide executor, configured from `config`.
    pub fn from_config(config: &crate::config::Config) -> Self {
        let dispatch = config.dispatch_config();
        if !dispatch.use_background {
            return Self {
                executor: None,
                config: dispatch,
            };
        }
        Self::new(Executor::shared(config.executor_config()), dispatch)
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn executor(&self) -> Option<&Arc<Executor>> {
        self.executor.as_ref()
    }

    /// Decode a payload. Always tries the background worker first.
    pub async fn decode(&self, encoded: &str) -> Result<String, DispatchError> {
        if let Some(value) = self.background(Request::decode(encoded)).await {
            match value {
                Value::String(text) => return Ok(text),
                other => warn!(kind = ?value_kind(&other), "worker returned non-string decode result"),
            }
        }
        Ok(codec::decode(encoded)?)
    }

    /// Decode a payload and parse it as a JSON document.
    pub async fn decode_and_parse(&self, encoded: &str) -> Result<Value, DispatchError> {
        if let Some(value) = self.background(Request::decode_and_parse(encoded)).await {
            return Ok(value);
        }
        let text = codec::decode(encoded)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Run a named sort routine (`sortByDate`, `sortByViews`, ...).
    pub async fn sort(
        &self,
        routine: &str,
        records: &[Wallpaper],
        options: &SortOptions,
    ) -> Result<Vec<Wallpaper>, DispatchError> {
        if self.should_offload(records.len()) {
            let request = Request::sort(routine, records, options);
            if let Some(sorted) = self.background(request).await.and_then(into_records) {
                return Ok(sorted);
            }
        }
        let routine: SortRoutine = routine.parse()?;
        Ok(routine.apply(records, options))
    }

    /// Filter and sort on the background worker.
    ///
    /// Returns `None` when the caller should use the inline path instead:
    /// the input is below the threshold, or the background path failed.
    pub async fn try_filter_and_sort(
        &self,
        records: &[Wallpaper],
        filters: &Filters,
        method: &str,
        popularity: &PopularityMap,
    ) -> Option<Vec<Wallpaper>> {
        if !self.should_offload(records.len()) {
            return None;
        }
        let request = Request::filter_and_sort(records, filters, method, popularity);
        self.background(request).await.and_then(into_records)
    }

    /// Filter and sort, falling back to the inline engine when needed.
    pub async fn filter_and_sort(
        &self,
        records: &[Wallpaper],
        filters: &Filters,
        method: &str,
        popularity: &PopularityMap,
    ) -> Vec<Wallpaper> {
        match self
            .try_filter_and_sort(records, filters, method, popularity)
            .await
        {
            Some(result) => result,
            None => sorting::filter_and_sort(records, filters, method, popularity),
        }
    }

    fn should_offload(&self, len: usize) -> bool {
        let offload = self.executor.is_some() && len >= self.config.inline_threshold;
        if !offload {
            debug!(
                len,
                threshold = self.config.inline_threshold,
                "computing inline"
            );
        }
        offload
    }

    /// Run `request` on the executor. `None` means fall back to inline.
    async fn background(&self, request: Request) -> Option<Value> {
        let executor = self.executor.as_ref()?;
        let kind = request.kind();
        match executor.request(request).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(%kind, error = %e, "background path failed, computing inline");
                None
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::inline_only()
    }
}

fn into_records(value: Value) -> Option<Vec<Wallpaper>> {
    serde_json::from_value(value)
        .map_err(|e| warn!(error = %e, "worker returned malformed records"))
        .ok()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
