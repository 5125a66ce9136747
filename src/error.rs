use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::id::{AlertId, OwnerId};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// A price source could not produce data.
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    #[error("source {source_name} unavailable: {reason}")]
    Unavailable { source_name: String, reason: String },

    #[error("source {source_name} returned malformed data: {reason}")]
    Malformed { source_name: String, reason: String },
}

/// Aggregation produced nothing usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("no price data available: every source failed and no cached index is valid")]
    NoDataAvailable,
}

/// Errors that abort an upgrade path search before it runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("ship not found: {name}")]
    ShipNotFound { name: String },

    #[error("source and target ship are the same: {name}")]
    SameShip { name: String },

    #[error("max steps must be at least 1")]
    InvalidDepth,
}

/// Alert management policy violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlertError {
    #[error("owner {owner} already has {limit} active alerts")]
    LimitExceeded { owner: OwnerId, limit: usize },

    #[error("alert {id} not found")]
    NotFound { id: AlertId },

    #[error("max price must not be negative, got {price}")]
    InvalidPrice { price: Decimal },
}

/// Notification delivery failures. Logged by callers, never fatal.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("delivery to {owner} failed: {reason}")]
    Delivery { owner: OwnerId, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Disk-tier cache failures. Degrade to memory-only behaviour.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Alert(#[from] AlertError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
