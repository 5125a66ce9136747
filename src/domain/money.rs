//! Monetary types for price representation.

use rust_decimal::Decimal;

/// Price in USD represented as a Decimal for precision.
pub type Price = Decimal;
