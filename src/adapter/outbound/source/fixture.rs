//! Fixed in-process price data.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;

use super::dto::FeedDocument;
use crate::domain::{PriceListing, Store, UpgradeEdge};
use crate::error::SourceError;
use crate::port::outbound::source::PriceSource;

/// Serves the same listings and offers on every fetch.
///
/// Used for offline runs and demos, either built in code or loaded from a
/// feed-format JSON file.
pub struct StaticSource {
    name: String,
    listings: Vec<PriceListing>,
    edges: Vec<UpgradeEdge>,
}

impl StaticSource {
    pub fn new(
        name: impl Into<String>,
        listings: Vec<PriceListing>,
        edges: Vec<UpgradeEdge>,
    ) -> Self {
        Self {
            name: name.into(),
            listings,
            edges,
        }
    }

    /// Load a feed document from disk. Rows without a `store` are tagged
    /// with `store`.
    pub fn from_file(
        name: impl Into<String>,
        path: &Path,
        store: &Store,
    ) -> Result<Self, SourceError> {
        let name = name.into();
        let content = std::fs::read_to_string(path).map_err(|e| SourceError::Unavailable {
            source_name: name.clone(),
            reason: format!("{}: {e}", path.display()),
        })?;
        let doc: FeedDocument = serde_json::from_str(&content).map_err(|e| SourceError::Malformed {
            source_name: name.clone(),
            reason: e.to_string(),
        })?;

        let now = Utc::now();
        let listings = doc.listings(&name, store, now);
        let edges = doc.upgrades(&name, store, now);
        Ok(Self::new(name, listings, edges))
    }
}

#[async_trait]
impl PriceSource for StaticSource {
    async fn fetch_listings(&self) -> Result<Vec<PriceListing>, SourceError> {
        Ok(self.listings.clone())
    }

    async fn fetch_upgrade_edges(&self) -> Result<Vec<UpgradeEdge>, SourceError> {
        Ok(self.edges.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn loads_feed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"upgrades": [{{"from": "Aurora MR", "to": "Avenger Titan", "price": 35}}]}}"#
        )
        .unwrap();

        let source = StaticSource::from_file("fixtures", file.path(), &Store::StarHangar).unwrap();
        let edges = source.fetch_upgrade_edges().await.unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].store, Store::StarHangar);
        assert!(source.fetch_listings().await.unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_unavailable() {
        let result =
            StaticSource::from_file("fixtures", Path::new("/nonexistent/feed.json"), &Store::Grey);
        assert!(matches!(result, Err(SourceError::Unavailable { .. })));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let result = StaticSource::from_file("fixtures", file.path(), &Store::Grey);
        assert!(matches!(result, Err(SourceError::Malformed { .. })));
    }
}
