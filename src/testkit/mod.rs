//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`clock`]: `ManualClock`, a [`Clock`](crate::port::outbound::clock::Clock)
//!   that only moves when told to.
//! - [`source`]: Scripted [`PriceSource`](crate::port::outbound::source::PriceSource)
//!   implementations: `ScriptedSource`, `FailingSource`.
//! - [`notifier`]: `RecordingNotifier` and `FailingNotifier`.
//! - [`domain`]: Builders for ships, edges and listings.

pub mod clock;
pub mod domain;
pub mod notifier;
pub mod source;
