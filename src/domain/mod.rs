//! Marketplace-agnostic domain types: ships, listings, price indices,
//! upgrade paths and alerts.

pub mod alert;
pub mod error;
pub mod id;
pub mod index;
pub mod listing;
pub mod money;
pub mod path;
pub mod ship;
pub mod store;

pub use alert::PriceAlert;
pub use id::{AlertId, OwnerId, ShipKey};
pub use index::PriceIndex;
pub use listing::{PriceListing, UpgradeEdge};
pub use money::Price;
pub use path::{SearchOutcome, UpgradePath, UpgradeStep};
pub use ship::Ship;
pub use store::Store;
