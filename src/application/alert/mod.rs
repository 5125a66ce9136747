//! Price alerts.
//!
//! - [`service`]: per-owner alert management and limits
//! - [`scheduler`]: periodic checks, triggering and housekeeping

pub mod scheduler;
pub mod service;
