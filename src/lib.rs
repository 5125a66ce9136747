//! Hangar - Star Citizen upgrade path search and price alerts.
//!
//! Collects ship and upgrade prices from several marketplaces, finds the
//! cheapest chains of upgrades between two ships, and watches price
//! alerts that notify their owner over Discord once a target price is
//! reached.
//!
//! # Architecture
//!
//! - [`domain`] - Ships, listings, price indices, upgrade paths, alerts
//! - [`port`] - Traits at the outbound seams (sources, catalog, store,
//!   notifier, clock)
//! - [`application`] - Cache, price aggregation, path search, alert
//!   management and scheduling
//! - [`adapter`] - HTTP and file price sources, JSON alert store, Discord
//!   notifier, the command line
//! - [`infrastructure`] - Configuration and service wiring
//!
//! # Features
//!
//! - `discord` (default) - Deliver alert matches as Discord DMs
//! - `testkit` - In-memory fakes and fixtures for tests
//!
//! # Example
//!
//! ```
//! use hangar::application::upgrade::engine::{SearchRequest, UpgradePathEngine};
//! use hangar::domain::{PriceIndex, Ship, ShipKey, Store, UpgradeEdge};
//! use rust_decimal_macros::dec;
//!
//! let mut index = PriceIndex::new();
//! let (aurora, titan, cutlass) = (
//!     ShipKey::new("Aurora MR"),
//!     ShipKey::new("Avenger Titan"),
//!     ShipKey::new("Cutlass Black"),
//! );
//! index.insert_edge(UpgradeEdge::new(aurora, titan.clone(), Store::StarHangar, dec!(20)));
//! index.insert_edge(UpgradeEdge::new(titan, cutlass, Store::Rsi, dec!(50)));
//!
//! let engine = UpgradePathEngine::default();
//! let request = SearchRequest::new(Ship::new("Aurora MR"), Ship::new("Cutlass Black"));
//! let outcome = engine.search(&index, &request).unwrap();
//! assert_eq!(outcome.best_price(), Some(dec!(70)));
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use error::{Error, Result};
