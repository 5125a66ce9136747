//! Marketplaces that sell ship packages and upgrades.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::id::normalize_name;

/// A marketplace selling ship packages or upgrades.
///
/// Parsing is lenient: names are normalized before matching, and anything
/// unrecognized is kept as [`Store::Other`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Store {
    /// The official Roberts Space Industries pledge store.
    Rsi,
    /// Star-Hangar grey market.
    StarHangar,
    /// Space Foundry grey market.
    SpaceFoundry,
    /// Independent grey-market resellers.
    Grey,
    /// Any other marketplace, by normalized name.
    Other(String),
}

impl Store {
    /// Built-in marketplaces. Also the default store set for new alerts.
    #[must_use]
    pub fn known() -> [Store; 4] {
        [Self::Rsi, Self::StarHangar, Self::SpaceFoundry, Self::Grey]
    }

    /// Parse a store name leniently.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match normalize_name(name).as_str() {
            "rsi" | "robertsspaceindustries" | "official" => Self::Rsi,
            "starhangar" => Self::StarHangar,
            "spacefoundry" => Self::SpaceFoundry,
            "grey" | "gray" | "greymarket" | "graymarket" => Self::Grey,
            other => Self::Other(other.to_string()),
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Rsi => "rsi",
            Self::StarHangar => "starhangar",
            Self::SpaceFoundry => "spacefoundry",
            Self::Grey => "grey",
            Self::Other(name) => name,
        }
    }

    /// True for the publisher's own store.
    #[must_use]
    pub fn is_official(&self) -> bool {
        matches!(self, Self::Rsi)
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Store {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for Store {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for Store {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<Store> for String {
    fn from(store: Store) -> Self {
        store.as_str().to_string()
    }
}
