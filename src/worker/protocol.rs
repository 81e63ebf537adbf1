//! Wire protocol between the executor and its background worker.
//!
//! Every message crosses the boundary as a JSON document, so nothing mutable
//! is shared between the two sides.
//!
//! Outbound: `{ "kind": "...", "id": N, "payload": {...} }`
//! Inbound:  `{ "id": N, "success": true, "result": ... }`
//!       or  `{ "id": N, "success": false, "error": "...", "code": "..." }`
//!
//! Keyed maps never travel as JSON objects. A [`PopularityMap`] is flattened
//! to `[filename, entry]` pairs before sending and rebuilt on arrival.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{PopularityMap, PopularityPairs, Wallpaper};
use crate::sorting::{Filters, SortOptions, SortOrder};

/// Operation requested from the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Decode,
    DecodeAndParse,
    Sort,
    FilterAndSort,
}

impl RequestKind {
    pub const ALL: [RequestKind; 4] = [
        RequestKind::Decode,
        RequestKind::DecodeAndParse,
        RequestKind::Sort,
        RequestKind::FilterAndSort,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Decode => "decode",
            RequestKind::DecodeAndParse => "decodeAndParse",
            RequestKind::Sort => "sort",
            RequestKind::FilterAndSort => "filterAndSort",
        }
    }

    pub fn parse(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == kind)
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodePayload {
    pub encoded: String,
}

/// Second argument of a sort routine, as it travels on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WireSortOptions {
    #[default]
    Default,
    Order(SortOrder),
    Popularity(PopularityPairs),
}

impl From<&SortOptions> for WireSortOptions {
    fn from(options: &SortOptions) -> Self {
        match options {
            SortOptions::Default => WireSortOptions::Default,
            SortOptions::Order(order) => WireSortOptions::Order(*order),
            SortOptions::Popularity(map) => WireSortOptions::Popularity(map.to_pairs()),
        }
    }
}

impl From<WireSortOptions> for SortOptions {
    fn from(options: WireSortOptions) -> Self {
        match options {
            WireSortOptions::Default => SortOptions::Default,
            WireSortOptions::Order(order) => SortOptions::Order(order),
            WireSortOptions::Popularity(pairs) => {
                SortOptions::Popularity(PopularityMap::from_pairs(pairs))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortPayload {
    /// Routine name, e.g. `sortByDate`
    pub method: String,
    pub wallpapers: Vec<Wallpaper>,
    #[serde(default)]
    pub options: WireSortOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterAndSortPayload {
    pub wallpapers: Vec<Wallpaper>,
    #[serde(default)]
    pub filters: Filters,
    /// Symbolic method name, e.g. `newest`
    pub sort_method: String,
    #[serde(default)]
    pub popularity_map: Option<PopularityPairs>,
}

/// A typed request, before it is framed into a [`WorkerMessage`].
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Decode(DecodePayload),
    DecodeAndParse(DecodePayload),
    Sort(SortPayload),
    FilterAndSort(FilterAndSortPayload),
}

impl Request {
    pub fn decode(encoded: impl Into<String>) -> Self {
        Request::Decode(DecodePayload {
            encoded: encoded.into(),
        })
    }

    pub fn decode_and_parse(encoded: impl Into<String>) -> Self {
        Request::DecodeAndParse(DecodePayload {
            encoded: encoded.into(),
        })
    }

    pub fn sort(method: impl Into<String>, wallpapers: &[Wallpaper], options: &SortOptions) -> Self {
        Request::Sort(SortPayload {
            method: method.into(),
            wallpapers: wallpapers.to_vec(),
            options: options.into(),
        })
    }

    pub fn filter_and_sort(
        wallpapers: &[Wallpaper],
        filters: &Filters,
        sort_method: impl Into<String>,
        popularity: &PopularityMap,
    ) -> Self {
        Request::FilterAndSort(FilterAndSortPayload {
            wallpapers: wallpapers.to_vec(),
            filters: filters.clone(),
            sort_method: sort_method.into(),
            popularity_map: Some(popularity.to_pairs()),
        })
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            Request::Decode(_) => RequestKind::Decode,
            Request::DecodeAndParse(_) => RequestKind::DecodeAndParse,
            Request::Sort(_) => RequestKind::Sort,
            Request::FilterAndSort(_) => RequestKind::FilterAndSort,
        }
    }

    fn payload(&self) -> serde_json::Result<Value> {
        match self {
            Request::Decode(p) | Request::DecodeAndParse(p) => serde_json::to_value(p),
            Request::Sort(p) => serde_json::to_value(p),
            Request::FilterAndSort(p) => serde_json::to_value(p),
        }
    }
}

/// Outbound envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerMessage {
    pub kind: String,
    pub id: u64,
    #[serde(default)]
    pub payload: Value,
}

impl WorkerMessage {
    /// Frame `request` under identifier `id`.
    pub fn new(id: u64, request: &Request) -> serde_json::Result<Self> {
        Ok(Self {
            kind: request.kind().as_str().to_string(),
            id,
            payload: request.payload()?,
        })
    }

    /// Recover the typed request on the worker side.
    pub fn into_request(self) -> Result<Request, Failure> {
        let kind = RequestKind::parse(&self.kind).ok_or_else(|| {
            Failure::new(
                FailureCode::UnknownOperation,
                format!("Unknown message type: {}", self.kind),
            )
        })?;
        let malformed =
            |e: serde_json::Error| Failure::new(FailureCode::Malformed, e.to_string());
        let request = match kind {
            RequestKind::Decode => Request::Decode(serde_json::from_value(self.payload).map_err(malformed)?),
            RequestKind::DecodeAndParse => {
                Request::DecodeAndParse(serde_json::from_value(self.payload).map_err(malformed)?)
            }
            RequestKind::Sort => Request::Sort(serde_json::from_value(self.payload).map_err(malformed)?),
            RequestKind::FilterAndSort => {
                Request::FilterAndSort(serde_json::from_value(self.payload).map_err(malformed)?)
            }
        };
        Ok(request)
    }
}

/// Classification of a failed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureCode {
    /// Unknown message kind or sort routine
    UnknownOperation,
    /// Payload failed to decode (bad tag, body or JSON)
    Format,
    /// Envelope or payload had the wrong shape
    Malformed,
}

/// A worker-side failure, carried back in the response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub code: FailureCode,
    pub message: String,
}

impl Failure {
    pub fn new(code: FailureCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Inbound envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerResponse {
    pub id: u64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<FailureCode>,
}

impl WorkerResponse {
    pub fn ok(id: u64, result: Value) -> Self {
        Self {
            id,
            success: true,
            result: Some(result),
            error: None,
            code: None,
        }
    }

    pub fn failed(id: u64, failure: Failure) -> Self {
        Self {
            id,
            success: false,
            result: None,
            error: Some(failure.message),
            code: Some(failure.code),
        }
    }
}
