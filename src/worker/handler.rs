//! Worker-side request processing.
//!
//! Runs inside the background context. Receives serialized envelopes,
//! executes them with the shared codec and sort/filter engine, and sends
//! serialized responses back. Nothing here touches executor state.

use std::sync::mpsc::Receiver;

use serde_json::Value;
use tracing::trace;

use super::protocol::{Failure, FailureCode, Request, WorkerMessage, WorkerResponse};
use crate::catalog::PopularityMap;
use crate::codec;
use crate::sorting::{self, SortRoutine};

/// Destination for serialized responses.
pub trait ResponseSink {
    /// Deliver one response. Returns false once the receiving side is gone.
    fn deliver(&self, response: String) -> bool;
}

impl ResponseSink for tokio::sync::mpsc::UnboundedSender<String> {
    fn deliver(&self, response: String) -> bool {
        self.send(response).is_ok()
    }
}

/// Background worker loop.
///
/// Receives raw envelopes from `request_rx`, handles each one and sends the
/// serialized response to `responses`. Exits when the request channel is
/// closed (all senders dropped) or the response side has gone away.
pub fn worker_loop(request_rx: Receiver<String>, responses: impl ResponseSink) {
    while let Ok(raw) = request_rx.recv() {
        let response = handle_message(&raw);
        if !responses.deliver(response) {
            break;
        }
    }
}

/// Handle one serialized envelope and return the serialized response.
///
/// An envelope too broken to carry an identifier is answered with id 0,
/// which never matches a live request.
pub fn handle_message(raw: &str) -> String {
    let response = match serde_json::from_str::<WorkerMessage>(raw) {
        Ok(message) => {
            let id = message.id;
            trace!(id, kind = %message.kind, "worker received request");
            match message.into_request().and_then(process) {
                Ok(result) => WorkerResponse::ok(id, result),
                Err(failure) => WorkerResponse::failed(id, failure),
            }
        }
        Err(e) => WorkerResponse::failed(0, Failure::new(FailureCode::Malformed, e.to_string())),
    };

    // WorkerResponse holds only JSON-native data
    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(
            r#"{{"id":{},"success":false,"error":{:?},"code":"malformed"}}"#,
            response.id,
            e.to_string()
        )
    })
}

/// Execute a typed request.
pub fn process(request: Request) -> Result<Value, Failure> {
    match request {
        Request::Decode(payload) => codec::decode(&payload.encoded)
            .map(Value::String)
            .map_err(format_failure),
        Request::DecodeAndParse(payload) => {
            let text = codec::decode(&payload.encoded).map_err(format_failure)?;
            serde_json::from_str(&text).map_err(format_failure)
        }
        Request::Sort(payload) => {
            let routine = payload
                .method
                .parse::<SortRoutine>()
                .map_err(|e| Failure::new(FailureCode::UnknownOperation, e.to_string()))?;
            let sorted = routine.apply(&payload.wallpapers, &payload.options.into());
            to_result(&sorted)
        }
        Request::FilterAndSort(payload) => {
            let popularity = payload
                .popularity_map
                .map(PopularityMap::from_pairs)
                .unwrap_or_default();
            let result = sorting::filter_and_sort(
                &payload.wallpapers,
                &payload.filters,
                &payload.sort_method,
                &popularity,
            );
            to_result(&result)
        }
    }
}

fn format_failure(e: impl std::fmt::Display) -> Failure {
    Failure::new(FailureCode::Format, e.to_string())
}

fn to_result<T: serde::Serialize>(value: &T) -> Result<Value, Failure> {
    serde_json::to_value(value).map_err(|e| Failure::new(FailureCode::Malformed, e.to_string()))
}
