//! Notification adapters.
//!
//! Implements the `port::outbound::notifier::Notifier` trait for delivery
//! backends. Logging and no-op notifiers live with the port.

#[cfg(feature = "discord")]
pub mod discord;
pub mod format;
