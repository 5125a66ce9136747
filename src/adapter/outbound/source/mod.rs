//! Price source adapters.
//!
//! - [`feed::HttpFeedSource`] downloads a marketplace's JSON feed.
//! - [`fixture::StaticSource`] serves fixed data from code or a local file.

pub mod dto;
pub mod feed;
pub mod fixture;
