//! Record filtering.
//!
//! All active criteria compose as a logical AND. A criterion that is unset,
//! empty or `"all"` excludes nothing on its axis. The free-text query is the
//! exception to the `"all"` rule: it is always taken literally.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::Wallpaper;

/// Sentinel value meaning "no restriction" for the selector filters.
pub const ALL: &str = "all";

/// Filter criteria, named as the UI state layer sends them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Filters {
    /// Case-insensitive substring matched against filename, category,
    /// subcategory and tags
    pub search_query: Option<String>,
    /// Format, compared case-insensitively
    pub format_filter: Option<String>,
    /// Exact category
    pub category_filter: Option<String>,
    /// Exact subcategory
    pub subcategory_filter: Option<String>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format_filter = Some(format.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category_filter = Some(category.into());
        self
    }

    pub fn subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory_filter = Some(subcategory.into());
        self
    }

    /// True when no criterion would exclude anything.
    pub fn is_pass_through(&self) -> bool {
        self.active_query().is_none()
            && selector(&self.format_filter).is_none()
            && selector(&self.category_filter).is_none()
            && selector(&self.subcategory_filter).is_none()
    }

    fn active_query(&self) -> Option<String> {
        self.search_query
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    fn matches(&self, record: &Wallpaper, query: Option<&str>) -> bool {
        if let Some(query) = query {
            if !matches_query(record, query) {
                return false;
            }
        }
        if let Some(format) = selector(&self.format_filter) {
            if !record.format.eq_ignore_ascii_case(format) {
                return false;
            }
        }
        if let Some(category) = selector(&self.category_filter) {
            if record.category.as_deref() != Some(category) {
                return false;
            }
        }
        if let Some(subcategory) = selector(&self.subcategory_filter) {
            if record.subcategory.as_deref() != Some(subcategory) {
                return false;
            }
        }
        true
    }
}

/// An active selector value, or `None` when unset, empty or `"all"`.
fn selector(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty() && *v != ALL)
}

/// `query` must already be lowercase.
fn matches_query(record: &Wallpaper, query: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(query);

    contains(&record.filename)
        || record.category.as_deref().is_some_and(contains)
        || record.subcategory.as_deref().is_some_and(contains)
        || record.tags.iter().any(|tag| contains(tag))
}

/// Clone the records that satisfy every active criterion, preserving order.
pub fn filter_records(records: &[Wallpaper], filters: &Filters) -> Vec<Wallpaper> {
    if filters.is_pass_through() {
        return records.to_vec();
    }
    let query = filters.active_query();
    records
        .par_iter()
        .filter(|record| filters.matches(record, query.as_deref()))
        .cloned()
        .collect()
}
