//! Namespaced TTL cache.
//!
//! - [`service::Cache`]: memory LRU tier with an optional disk tier
//! - [`entry`]: namespaces, entries and content-hash keys

mod disk;
pub mod entry;
mod memory;
pub mod service;
