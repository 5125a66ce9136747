//! Infrastructure configuration modules.

pub mod aggregator;
pub mod alerts;
pub mod cache;
pub mod discord;
pub mod logging;
pub mod search;
pub mod settings;
pub mod sources;
