//! Upgrade path search.
//!
//! - [`engine`]: path enumeration, filtering and ranking
//! - [`score`]: risk, time and efficiency scoring weights
//! - [`service`]: ship resolution and cached searches over live prices

pub mod engine;
pub mod score;
pub mod service;
