//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - The command line
//! - [`outbound`] - Price sources, ship catalog, alert stores, notifiers

pub mod inbound;
pub mod outbound;
