//! sort handler

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use wallpipe::cli::SortArgs;
use wallpipe::codec;
use wallpipe::{Dispatcher, Filters, PopularityMap, SortMethod, Wallpaper};

use super::read_input;

/// Accepted catalog layouts.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<Wallpaper>),
    Wrapped { wallpapers: Vec<Wallpaper> },
}

impl CatalogFile {
    fn into_records(self) -> Vec<Wallpaper> {
        match self {
            CatalogFile::List(records) | CatalogFile::Wrapped { wallpapers: records } => records,
        }
    }
}

pub async fn handle_sort(dispatcher: &Dispatcher, args: &SortArgs) -> Result<()> {
    let records: Vec<Wallpaper> = load_json::<CatalogFile>(dispatcher, &args.catalog)
        .await?
        .into_records();
    let popularity = match &args.popularity {
        Some(path) => load_json::<PopularityMap>(dispatcher, path).await?,
        None => PopularityMap::new(),
    };

    if SortMethod::parse(&args.method).is_none() {
        warn!(method = %args.method, "unknown sort method, keeping catalog order");
    }

    let filters = build_filters(args);
    let total = records.len();
    let mut sorted = dispatcher
        .filter_and_sort(&records, &filters, &args.method, &popularity)
        .await;
    let matched = sorted.len();
    info!(total, matched, method = %args.method, "catalog sorted");

    if let Some(limit) = args.limit {
        sorted.truncate(limit);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&sorted)?);
    } else {
        print_table(&sorted, matched, total);
    }
    Ok(())
}

fn build_filters(args: &SortArgs) -> Filters {
    let mut filters = Filters::new();
    if let Some(query) = &args.query {
        filters = filters.query(query);
    }
    if let Some(format) = &args.format {
        filters = filters.format(format);
    }
    if let Some(category) = &args.category {
        filters = filters.category(category);
    }
    if let Some(subcategory) = &args.subcategory {
        filters = filters.subcategory(subcategory);
    }
    filters
}

/// Read a JSON file that may be wrapped in a v1 payload.
async fn load_json<T: serde::de::DeserializeOwned>(
    dispatcher: &Dispatcher,
    path: &Path,
) -> Result<T> {
    let raw = read_input(path)?;
    let trimmed = raw.trim();
    let text = if codec::is_encoded(trimmed) {
        dispatcher
            .decode(trimmed)
            .await
            .with_context(|| format!("Failed to decode {}", path.display()))?
    } else {
        raw
    };
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_table(records: &[Wallpaper], matched: usize, total: usize) {
    for record in records {
        println!(
            "{:<40} {:<10} {:>10} {:<5} {}",
            record.filename,
            record.created_at.format("%Y-%m-%d"),
            format_size(record.size),
            record.format,
            record.category.as_deref().unwrap_or("-"),
        );
    }
    println!();
    println!(
        "Showing {} of {} matching wallpapers ({} total)",
        records.len(),
        matched,
        total
    );
}

fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
