//! wallpipe - wallpaper catalog pipeline
//!
//! Decodes obfuscated catalog payloads, filters and orders wallpaper
//! records, and offloads the heavy parts to a background worker with
//! identifier correlation, per-request timeouts and inline fallback.
//!
//! # Module Structure
//!
//! - [`codec`] - versioned payload obfuscation
//! - [`catalog`] - wallpaper records and popularity data
//! - [`sorting`] - filter/sort engine
//! - [`cache`] - LRU cache and batch-evicting bounded map
//! - [`worker`] - background executor and its wire protocol
//! - [`dispatch`] - facade choosing between background and inline work
//! - [`config`] - TOML configuration

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod sorting;
pub mod worker;

pub use cache::{BoundedMap, LruCache};
pub use catalog::{PopularityEntry, PopularityMap, Wallpaper};
pub use codec::CodecError;
pub use config::{Config, ConfigError};
pub use dispatch::{DispatchConfig, DispatchError, Dispatcher};
pub use sorting::{Filters, SortMethod, SortOptions, SortOrder, SortRoutine};
pub use worker::{Executor, ExecutorConfig, ExecutorError};
