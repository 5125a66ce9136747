//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new` constructors that validate inputs.
//!
//! # Examples
//!
//! ```
//! use hangar::domain::error::DomainError;
//! use hangar::domain::{PriceListing, ShipKey, Store};
//! use rust_decimal_macros::dec;
//!
//! let result = PriceListing::try_new(ShipKey::new("Cutlass Black"), Store::Rsi, dec!(-1));
//!
//! assert!(matches!(result, Err(DomainError::NegativePrice { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Listings and alert thresholds must not be negative.
    #[error("price must not be negative, got {price}")]
    NegativePrice {
        /// The invalid price that was provided.
        price: rust_decimal::Decimal,
    },

    /// A ship name normalized to nothing.
    #[error("ship name {name:?} has no alphanumeric characters")]
    EmptyShipName {
        /// The raw name that was provided.
        name: String,
    },

    /// Text that does not parse as an alert id.
    #[error("{raw:?} is not a valid alert id")]
    InvalidAlertId {
        /// The text that was provided.
        raw: String,
    },
}
