//! Domain identifier types with proper encapsulation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Normalize a ship name into its lookup form: lowercase ASCII
/// alphanumerics only.
///
/// ```
/// use hangar::domain::id::normalize_name;
///
/// assert_eq!(normalize_name("Cutlass Black (LTI)"), "cutlassblacklti");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Normalized ship name used as the lookup key everywhere.
///
/// Every construction path normalizes, including deserialization, so two
/// keys compare equal exactly when their names normalize to the same
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ShipKey(String);

impl ShipKey {
    /// Create a key by normalizing a display name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(normalize_name(name.as_ref()))
    }

    /// Get the normalized key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the source name had no alphanumeric characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ShipKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ShipKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ShipKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<ShipKey> for String {
    fn from(key: ShipKey) -> Self {
        key.0
    }
}

/// Opaque identifier of the user who owns an alert (a Discord user id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    /// Create a new `OwnerId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the owner ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OwnerId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for OwnerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Price alert identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlertId(Uuid);

impl AlertId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for AlertId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for AlertId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_key_normalizes_case_and_punctuation() {
        assert_eq!(ShipKey::new("Avenger Titan"), ShipKey::new("avenger-titan"));
        assert_eq!(ShipKey::new("F7C-M Super Hornet").as_str(), "f7cmsuperhornet");
    }

    #[test]
    fn ship_key_deserialization_normalizes() {
        let key: ShipKey = serde_json::from_str("\"Mercury Star Runner\"").unwrap();
        assert_eq!(key.as_str(), "mercurystarrunner");
    }

    #[test]
    fn ship_key_empty_when_no_alphanumerics() {
        assert!(ShipKey::new(" -- ").is_empty());
    }

    #[test]
    fn alert_id_round_trips_through_display() {
        let id = AlertId::generate();
        let parsed: AlertId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
