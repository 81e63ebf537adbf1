//! Filter/sort engine.
//!
//! Pure functions over wallpaper collections. The same code runs on the
//! caller's side and inside the background worker, so both paths always
//! agree on results.
//!
//! # Module Structure
//!
//! - [`filter`] - conjunctive record filters
//! - [`order`] - ordering routines with deterministic tie-breaks

mod filter;
mod order;

pub use filter::{filter_records, Filters, ALL};
pub use order::{
    sort_by_date, sort_by_downloads, sort_by_name, sort_by_popularity, sort_by_size,
    sort_by_views, SortOptions, SortOrder, SortRoutine, UnknownSortRoutine,
};

use std::fmt;

use crate::catalog::{PopularityMap, Wallpaper};

/// Symbolic sort methods offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMethod {
    Newest,
    Oldest,
    Popular,
    WeeklyHot,
    MonthlyHot,
    Downloads,
    Views,
    Largest,
    Smallest,
    NameAsc,
    NameDesc,
}

impl SortMethod {
    pub const ALL: [SortMethod; 11] = [
        SortMethod::Newest,
        SortMethod::Oldest,
        SortMethod::Popular,
        SortMethod::WeeklyHot,
        SortMethod::MonthlyHot,
        SortMethod::Downloads,
        SortMethod::Views,
        SortMethod::Largest,
        SortMethod::Smallest,
        SortMethod::NameAsc,
        SortMethod::NameDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMethod::Newest => "newest",
            SortMethod::Oldest => "oldest",
            SortMethod::Popular => "popular",
            SortMethod::WeeklyHot => "weekly-hot",
            SortMethod::MonthlyHot => "monthly-hot",
            SortMethod::Downloads => "downloads",
            SortMethod::Views => "views",
            SortMethod::Largest => "largest",
            SortMethod::Smallest => "smallest",
            SortMethod::NameAsc => "name-asc",
            SortMethod::NameDesc => "name-desc",
        }
    }

    /// Look up a method by its symbolic name.
    ///
    /// Unknown names are not an error for the engine: callers get the
    /// filtered sequence back unsorted.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.as_str() == name)
    }

    /// Order `records` according to this method.
    pub fn sort(&self, records: &[Wallpaper], popularity: &PopularityMap) -> Vec<Wallpaper> {
        match self {
            SortMethod::Newest => sort_by_date(records, SortOrder::Desc),
            SortMethod::Oldest => sort_by_date(records, SortOrder::Asc),
            SortMethod::Popular | SortMethod::WeeklyHot | SortMethod::MonthlyHot => {
                sort_by_popularity(records, popularity)
            }
            SortMethod::Downloads => sort_by_downloads(records, popularity),
            SortMethod::Views => sort_by_views(records, popularity),
            SortMethod::Largest => sort_by_size(records, SortOrder::Desc),
            SortMethod::Smallest => sort_by_size(records, SortOrder::Asc),
            SortMethod::NameAsc => sort_by_name(records, SortOrder::Asc),
            SortMethod::NameDesc => sort_by_name(records, SortOrder::Desc),
        }
    }
}

impl fmt::Display for SortMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apply `filters`, then order by the symbolic `method` name.
///
/// An unrecognized method returns the filtered records in input order.
pub fn filter_and_sort(
    records: &[Wallpaper],
    filters: &Filters,
    method: &str,
    popularity: &PopularityMap,
) -> Vec<Wallpaper> {
    let filtered = filter_records(records, filters);
    match SortMethod::parse(method) {
        Some(method) => method.sort(&filtered, popularity),
        None => filtered,
    }
}
