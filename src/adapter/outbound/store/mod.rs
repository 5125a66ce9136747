//! Alert store adapters.

pub mod json;
pub mod memory;
