//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies such as price
//! sources, the ship catalog, alert storage, notifications and time.

pub mod catalog;
pub mod clock;
pub mod notifier;
pub mod source;
pub mod store;
