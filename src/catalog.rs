//! Catalog data shapes consumed by the filter/sort engine.
//!
//! [`Wallpaper`] records are treated as immutable input: the engine only
//! reorders and filters clones. [`PopularityMap`] is keyed by filename and
//! crosses the worker boundary as an ordered sequence of `[filename, entry]`
//! pairs (see [`PopularityPairs`]).

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single wallpaper record.
///
/// Fields the engine does not look at (urls, resolution, ...) are kept in
/// `extra` so records survive a decode/sort/serialize round trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallpaper {
    /// Unique filename, also the popularity lookup key
    pub filename: String,
    /// Creation timestamp
    #[serde(with = "created_at")]
    pub created_at: DateTime<Utc>,
    /// File size in bytes
    #[serde(default)]
    pub size: u64,
    /// File format, e.g. `png` or `jpg`
    #[serde(default)]
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Wallpaper {
    /// Create a record with only the required fields set.
    pub fn new(filename: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            filename: filename.into(),
            created_at,
            size: 0,
            format: String::new(),
            category: None,
            subcategory: None,
            tags: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Parse a `createdAt` value given as text.
///
/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("unrecognized timestamp: {text}"))
}

/// Serde adapter for `createdAt`: RFC 3339 text out, text or epoch millis in.
mod created_at {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        FractionalMillis(f64),
        Text(String),
    }

    /// Full sub-second precision, so a record survives a round trip unchanged.
    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let parsed = match Raw::deserialize(d)? {
            Raw::Millis(ms) => from_millis(ms),
            // Fractional milliseconds truncate toward zero
            Raw::FractionalMillis(ms) if ms.is_finite() => from_millis(ms.trunc() as i64),
            Raw::FractionalMillis(ms) => Err(format!("timestamp out of range: {ms}")),
            Raw::Text(text) => super::parse_timestamp(&text),
        };
        parsed.map_err(D::Error::custom)
    }

    fn from_millis(ms: i64) -> Result<DateTime<Utc>, String> {
        DateTime::<Utc>::from_timestamp_millis(ms).ok_or_else(|| format!("timestamp out of range: {ms}"))
    }
}

/// Popularity counters for one filename. Missing counters read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopularityEntry {
    pub score: f64,
    pub downloads: u64,
    pub views: u64,
}

/// Wire form of a [`PopularityMap`]: `[filename, entry]` pairs.
pub type PopularityPairs = Vec<(String, PopularityEntry)>;

/// Popularity counters keyed by filename.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PopularityRepr", into = "PopularityPairs")]
pub struct PopularityMap(HashMap<String, PopularityEntry>);

/// Accepted on-disk shapes: a pair list or a JSON object keyed by filename.
#[derive(Deserialize)]
#[serde(untagged)]
enum PopularityRepr {
    Pairs(PopularityPairs),
    Keyed(HashMap<String, PopularityEntry>),
}

impl From<PopularityRepr> for PopularityMap {
    fn from(repr: PopularityRepr) -> Self {
        match repr {
            PopularityRepr::Pairs(pairs) => Self::from_pairs(pairs),
            PopularityRepr::Keyed(map) => Self(map),
        }
    }
}

impl From<PopularityMap> for PopularityPairs {
    fn from(map: PopularityMap) -> Self {
        map.into_pairs()
    }
}

impl PopularityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, filename: impl Into<String>, entry: PopularityEntry) {
        self.0.insert(filename.into(), entry);
    }

    pub fn get(&self, filename: &str) -> Option<&PopularityEntry> {
        self.0.get(filename)
    }

    /// Counters for `filename`, all zero when the filename is unknown.
    pub fn entry_or_default(&self, filename: &str) -> PopularityEntry {
        self.0.get(filename).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flatten into `[filename, entry]` pairs, ordered by filename.
    pub fn to_pairs(&self) -> PopularityPairs {
        let mut pairs: PopularityPairs = self
            .0
            .iter()
            .map(|(name, entry)| (name.clone(), *entry))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }

    /// Owned variant of [`to_pairs`](Self::to_pairs).
    pub fn into_pairs(self) -> PopularityPairs {
        let mut pairs: PopularityPairs = self.0.into_iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }

    /// Rebuild a map from its pair form. Later duplicates win.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, PopularityEntry)>) -> Self {
        Self(pairs.into_iter().collect())
    }
}

impl FromIterator<(String, PopularityEntry)> for PopularityMap {
    fn from_iter<I: IntoIterator<Item = (String, PopularityEntry)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
