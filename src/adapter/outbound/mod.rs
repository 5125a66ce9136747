//! Outbound adapters (driven side).

pub mod catalog;
pub mod notifier;
pub mod source;
pub mod store;
