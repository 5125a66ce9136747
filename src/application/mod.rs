//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod aggregator;
pub mod alert;
pub mod cache;
pub mod history;
pub mod upgrade;
