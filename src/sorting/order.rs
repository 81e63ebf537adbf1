//! Ordering routines.
//!
//! Every routine returns a sorted copy and ends its comparison chain on the
//! filename, so two records only compare equal when their filenames do.
//! Popularity-based routines fall back to newest-first before the filename.

use std::cmp::Ordering;
use std::str::FromStr;

use rayon::slice::ParallelSliceMut;
use serde::{Deserialize, Serialize};

use crate::catalog::{PopularityEntry, PopularityMap, Wallpaper};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Name did not match any sort routine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sort method: {0}")]
pub struct UnknownSortRoutine(pub String);

/// Low-level sort routines, addressed by name across the worker protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortRoutine {
    Date,
    Popularity,
    Downloads,
    Views,
    Size,
    Name,
}

impl SortRoutine {
    pub const ALL: [SortRoutine; 6] = [
        SortRoutine::Date,
        SortRoutine::Popularity,
        SortRoutine::Downloads,
        SortRoutine::Views,
        SortRoutine::Size,
        SortRoutine::Name,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SortRoutine::Date => "sortByDate",
            SortRoutine::Popularity => "sortByPopularity",
            SortRoutine::Downloads => "sortByDownloads",
            SortRoutine::Views => "sortByViews",
            SortRoutine::Size => "sortBySize",
            SortRoutine::Name => "sortByName",
        }
    }

    /// Direction used when the caller supplies none.
    pub fn default_order(&self) -> SortOrder {
        match self {
            SortRoutine::Name => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    /// Run this routine with the given options.
    ///
    /// Options that do not fit the routine are ignored: an order passed to a
    /// popularity routine is dropped, a popularity map passed to an ordered
    /// routine leaves the default direction in place.
    pub fn apply(&self, records: &[Wallpaper], options: &SortOptions) -> Vec<Wallpaper> {
        let order = match options {
            SortOptions::Order(order) => *order,
            _ => self.default_order(),
        };
        let empty = PopularityMap::new();
        let popularity = match options {
            SortOptions::Popularity(map) => map,
            _ => &empty,
        };

        match self {
            SortRoutine::Date => sort_by_date(records, order),
            SortRoutine::Popularity => sort_by_popularity(records, popularity),
            SortRoutine::Downloads => sort_by_downloads(records, popularity),
            SortRoutine::Views => sort_by_views(records, popularity),
            SortRoutine::Size => sort_by_size(records, order),
            SortRoutine::Name => sort_by_name(records, order),
        }
    }
}

impl FromStr for SortRoutine {
    type Err = UnknownSortRoutine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|routine| routine.name() == s)
            .ok_or_else(|| UnknownSortRoutine(s.to_string()))
    }
}

/// Second argument of a sort routine.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SortOptions {
    /// Use the routine's default direction
    #[default]
    Default,
    Order(SortOrder),
    Popularity(PopularityMap),
}

fn by_filename(a: &Wallpaper, b: &Wallpaper) -> Ordering {
    a.filename.cmp(&b.filename)
}

fn sorted_by<F>(records: &[Wallpaper], compare: F) -> Vec<Wallpaper>
where
    F: Fn(&Wallpaper, &Wallpaper) -> Ordering + Sync,
{
    let mut out = records.to_vec();
    out.par_sort_by(compare);
    out
}

/// Creation time, ties broken by filename ascending.
pub fn sort_by_date(records: &[Wallpaper], order: SortOrder) -> Vec<Wallpaper> {
    sorted_by(records, |a, b| {
        order
            .apply(a.created_at.cmp(&b.created_at))
            .then_with(|| by_filename(a, b))
    })
}

fn sort_by_counter<F>(records: &[Wallpaper], popularity: &PopularityMap, compare: F) -> Vec<Wallpaper>
where
    F: Fn(&PopularityEntry, &PopularityEntry) -> Ordering + Sync,
{
    sorted_by(records, |a, b| {
        let ea = popularity.entry_or_default(&a.filename);
        let eb = popularity.entry_or_default(&b.filename);
        compare(&eb, &ea)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| by_filename(a, b))
    })
}

/// Score descending, then newest first, then filename.
///
/// Scores compare with `f64::total_cmp`, so a NaN score still yields a
/// total order (positive NaN sorts above every number).
pub fn sort_by_popularity(records: &[Wallpaper], popularity: &PopularityMap) -> Vec<Wallpaper> {
    sort_by_counter(records, popularity, |a, b| a.score.total_cmp(&b.score))
}

/// Downloads descending, then newest first, then filename.
pub fn sort_by_downloads(records: &[Wallpaper], popularity: &PopularityMap) -> Vec<Wallpaper> {
    sort_by_counter(records, popularity, |a, b| a.downloads.cmp(&b.downloads))
}

/// Views descending, then newest first, then filename.
pub fn sort_by_views(records: &[Wallpaper], popularity: &PopularityMap) -> Vec<Wallpaper> {
    sort_by_counter(records, popularity, |a, b| a.views.cmp(&b.views))
}

/// Byte size, ties broken by filename ascending.
pub fn sort_by_size(records: &[Wallpaper], order: SortOrder) -> Vec<Wallpaper> {
    sorted_by(records, |a, b| {
        order.apply(a.size.cmp(&b.size)).then_with(|| by_filename(a, b))
    })
}

pub fn sort_by_name(records: &[Wallpaper], order: SortOrder) -> Vec<Wallpaper> {
    sorted_by(records, |a, b| order.apply(by_filename(a, b)))
}
